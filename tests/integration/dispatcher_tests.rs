//! Dispatcher against recording mocks: tokens in, peripheral calls out.

use clickerlink::app::dispatcher::{DispatchError, Dispatcher, Outcome};
use clickerlink::app::identity::Identity;
use clickerlink::protocol::command::Pin;
use clickerlink::protocol::request::RequestError;
use clickerlink::protocol::variant::{ReplyTag, Variant};

use crate::mock_hw::{HwCall, MockFlash, MockHardware};

struct Rig {
    dispatcher: Dispatcher,
    identity: Identity,
    hw: MockHardware,
    flash: MockFlash,
}

impl Rig {
    fn new(variant: Variant) -> Self {
        let mut flash = MockFlash::with_name("Clicker");
        let identity = Identity::load(&mut flash).unwrap();
        Self {
            dispatcher: Dispatcher::new(variant, ReplyTag::Reply),
            identity,
            hw: MockHardware::new(),
            flash,
        }
    }

    fn send(&mut self, message: &str) -> Result<Outcome, DispatchError> {
        self.dispatcher.dispatch_message(
            message.as_bytes(),
            &mut self.identity,
            &mut self.hw,
            &mut self.flash,
        )
    }
}

// ── Reads ─────────────────────────────────────────────────────

#[test]
fn repeated_read_yields_identical_replies() {
    let mut rig = Rig::new(Variant::Tcp);
    rig.hw.read_value = 42;

    let first = rig.send("I2C/READ/12").unwrap();
    let second = rig.send("I2C/READ/12").unwrap();

    assert_eq!(first, Outcome::Reply("REPLY/42".into()));
    assert_eq!(first, second);
    assert_eq!(
        rig.hw.calls,
        [HwCall::I2cRead { address: 12 }, HwCall::I2cRead { address: 12 }]
    );
}

#[test]
fn udp_read_reply_is_bare_value() {
    let mut rig = Rig::new(Variant::Udp);
    rig.hw.read_value = 255;
    assert_eq!(
        rig.send("Clicker/I2C/READ/80").unwrap(),
        Outcome::Reply("255".into())
    );
}

#[test]
fn legacy_reply_tag() {
    let mut rig = Rig::new(Variant::Tcp);
    rig.dispatcher = Dispatcher::new(Variant::Tcp, ReplyTag::Legacy);
    rig.hw.read_value = 7;
    assert_eq!(rig.send("I2C/READ/1").unwrap(), Outcome::Reply("RELPY/7".into()));
}

#[test]
fn failed_read_sends_nothing() {
    let mut rig = Rig::new(Variant::Tcp);
    rig.hw.fail_bus = true;
    assert!(matches!(
        rig.send("I2C/READ/12"),
        Err(DispatchError::Peripheral(_))
    ));
}

// ── I2C bus lifecycle and writes ──────────────────────────────

#[test]
fn i2c_init_write_release() {
    let mut rig = Rig::new(Variant::Tcp);
    rig.send("I2C/INIT").unwrap();
    rig.send("I2C/WRITE/12/0").unwrap();
    rig.send("I2C/RELEASE").unwrap();
    assert_eq!(
        rig.hw.calls,
        [
            HwCall::I2cInit,
            HwCall::I2cWrite { address: 12, value: 0 },
            HwCall::I2cRelease,
        ]
    );
}

#[test]
fn extra_operands_are_ignored() {
    let mut rig = Rig::new(Variant::Tcp);
    rig.send("I2C/WRITE/12/1/2/3").unwrap();
    assert_eq!(rig.hw.calls, [HwCall::I2cWrite { address: 12, value: 1 }]);
}

#[test]
fn malformed_requests_have_no_side_effect() {
    let mut rig = Rig::new(Variant::Tcp);
    for bad in [
        "I2C/WRITE/12",
        "I2C/WRITE/abc/1",
        "I2C/WRITE/12/256",
        "I2C/READ/128",
        "I2C/READ",
        "BOGUS/INIT",
        "I2C/BOGUS",
        "I2C",
        "",
        "///",
    ] {
        assert!(
            matches!(rig.send(bad), Err(DispatchError::Request(_))),
            "{bad:?} should be malformed"
        );
    }
    assert!(rig.hw.calls.is_empty());
}

#[test]
fn non_utf8_is_malformed() {
    let mut rig = Rig::new(Variant::Tcp);
    let result = rig.dispatcher.dispatch_message(
        &[0x49, 0xFF, 0x2F],
        &mut rig.identity,
        &mut rig.hw,
        &mut rig.flash,
    );
    assert_eq!(result, Err(DispatchError::Request(RequestError::NotUtf8)));
}

#[test]
fn undefined_pairs_are_ignored() {
    let mut rig = Rig::new(Variant::Tcp);
    for msg in ["SPI/WRITE/1/2", "UART/READ", "GPIO/READ/LED1", "CORE/READ/DEVICE_NAME"] {
        assert_eq!(rig.send(msg).unwrap(), Outcome::Ignored, "{msg}");
    }
    assert!(rig.hw.calls.is_empty());
    assert!(rig.flash.writes.is_empty());
}

// ── GPIO ──────────────────────────────────────────────────────

#[test]
fn gpio_write_sets_exactly_one_pin() {
    let mut rig = Rig::new(Variant::Tcp);
    rig.send("GPIO/WRITE/LED1/1").unwrap();
    assert_eq!(rig.hw.gpio_calls(), [(Pin::Led1, true)]);

    rig.send("GPIO/WRITE/LED1/0").unwrap();
    assert_eq!(rig.hw.gpio_calls(), [(Pin::Led1, true), (Pin::Led1, false)]);
}

#[test]
fn gpio_nonzero_is_high() {
    let mut rig = Rig::new(Variant::Tcp);
    rig.send("GPIO/WRITE/LED2/-3").unwrap();
    assert_eq!(rig.hw.gpio_calls(), [(Pin::Led2, true)]);
}

#[test]
fn gpio_unknown_port_touches_nothing() {
    let mut rig = Rig::new(Variant::Tcp);
    assert_eq!(rig.send("GPIO/WRITE/LED9/1").unwrap(), Outcome::Ignored);
    assert_eq!(rig.send("GPIO/WRITE/LED9/abc").unwrap(), Outcome::Ignored);
    assert!(rig.hw.gpio_calls().is_empty());
}

// ── CORE rename ───────────────────────────────────────────────

#[test]
fn rename_writes_one_record() {
    let mut rig = Rig::new(Variant::Tcp);
    let outcome = rig.send("CORE/WRITE/DEVICE_NAME/Widget").unwrap();

    assert!(matches!(
        outcome,
        Outcome::Renamed { ref from, ref to } if from == "Clicker" && to == "Widget"
    ));
    assert_eq!(rig.identity.name(), "Widget");
    assert_eq!(rig.flash.writes.len(), 1);
    let (offset, data) = &rig.flash.writes[0];
    assert_eq!(*offset, 0);
    assert_eq!(data[0], 6);
    assert_eq!(&data[1..], b"Widget");
}

#[test]
fn rename_rejects_reserved_and_missing_names() {
    let mut rig = Rig::new(Variant::Tcp);
    for bad in [
        "CORE/WRITE/DEVICE_NAME/All",
        "CORE/WRITE/DEVICE_NAME/Server",
        "CORE/WRITE/DEVICE_NAME",
    ] {
        assert!(rig.send(bad).is_err(), "{bad}");
    }
    let long = format!("CORE/WRITE/DEVICE_NAME/{}", "n".repeat(255));
    assert!(rig.send(&long).is_err());

    assert_eq!(rig.identity.name(), "Clicker");
    assert!(rig.flash.writes.is_empty());
}

#[test]
fn rename_unknown_field_is_ignored() {
    let mut rig = Rig::new(Variant::Tcp);
    assert_eq!(rig.send("CORE/WRITE/COLOUR/blue").unwrap(), Outcome::Ignored);
    assert!(rig.flash.writes.is_empty());
}

#[test]
fn failed_flash_write_keeps_old_name() {
    let mut rig = Rig::new(Variant::Tcp);
    rig.flash.fail_writes = true;
    assert!(matches!(
        rig.send("CORE/WRITE/DEVICE_NAME/Widget"),
        Err(DispatchError::Storage(_))
    ));
    assert_eq!(rig.identity.name(), "Clicker");
}

// ── UDP addressing ────────────────────────────────────────────

#[test]
fn udp_foreign_destination_is_discarded() {
    let mut rig = Rig::new(Variant::Udp);
    assert_eq!(rig.send("Other/GPIO/WRITE/LED1/1").unwrap(), Outcome::Discarded);
    assert_eq!(rig.send("Other/CORE/WRITE/DEVICE_NAME/X").unwrap(), Outcome::Discarded);
    assert!(rig.hw.calls.is_empty());
    assert!(rig.flash.writes.is_empty());
}

#[test]
fn udp_broadcast_and_own_name_are_dispatched() {
    let mut rig = Rig::new(Variant::Udp);
    rig.send("All/GPIO/WRITE/LED1/1").unwrap();
    rig.send("Clicker/GPIO/WRITE/LED2/1").unwrap();
    assert_eq!(rig.hw.gpio_calls(), [(Pin::Led1, true), (Pin::Led2, true)]);
}

#[test]
fn udp_follows_rename() {
    let mut rig = Rig::new(Variant::Udp);
    rig.send("Clicker/CORE/WRITE/DEVICE_NAME/Widget").unwrap();
    assert_eq!(rig.send("Clicker/I2C/INIT").unwrap(), Outcome::Discarded);
    assert!(matches!(rig.send("Widget/I2C/INIT").unwrap(), Outcome::Executed(_)));
}
