//! Session over `embassy-sync` channels, with a fake server task running
//! on the same executor.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use futures_lite::future::{block_on, zip};

use clickerlink::adapters::channel::LinkChannels;
use clickerlink::app::dispatcher::Dispatcher;
use clickerlink::app::identity::Identity;
use clickerlink::link::session::Session;
use clickerlink::link::transport::{CloseReason, TransportEvent};
use clickerlink::protocol::variant::{ReplyTag, Variant};

use crate::mock_hw::{MockFlash, MockHardware, RecordingSink, msg};

static TCP_LINK: LinkChannels<CriticalSectionRawMutex, 4> = LinkChannels::new();
static UDP_LINK: LinkChannels<CriticalSectionRawMutex, 8> = LinkChannels::new();

#[test]
fn server_task_drives_tcp_session() {
    let mut flash = MockFlash::with_name("Bench");
    let identity = Identity::load(&mut flash).unwrap();
    let mut session = Session::new(Dispatcher::new(Variant::Tcp, ReplyTag::Reply), identity);
    let mut hw = MockHardware::new();
    hw.read_value = 99;
    let mut sink = RecordingSink::new();
    let mut transport = TCP_LINK.transport();

    TCP_LINK.try_deliver(TransportEvent::Connected).unwrap();

    let server = async {
        let greeting = TCP_LINK.take_outbound().await;
        TCP_LINK.deliver(msg("HELLO")).await;
        TCP_LINK.deliver(msg("I2C/READ/33")).await;
        let reply = TCP_LINK.take_outbound().await;
        TCP_LINK
            .deliver(TransportEvent::Closed(CloseReason::Closed))
            .await;
        (greeting, reply)
    };

    let (result, (greeting, reply)) = block_on(zip(
        session.run(&mut transport, &mut hw, &mut flash, &mut sink),
        server,
    ));

    assert_eq!(result, Ok(CloseReason::Closed));
    assert_eq!(greeting.as_slice(), b"HELLO/Bench");
    assert_eq!(reply.as_slice(), b"REPLY/99");
}

#[test]
fn preloaded_udp_script() {
    let mut flash = MockFlash::new();
    let identity = Identity::load(&mut flash).unwrap();
    let mut session = Session::new(Dispatcher::new(Variant::Udp, ReplyTag::Reply), identity);
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();

    for event in [
        TransportEvent::Connected,
        msg("Clicker/HELLO"),
        msg("All/GPIO/WRITE/LED1/1"),
        msg("Else/GPIO/WRITE/LED2/1"),
        TransportEvent::Closed(CloseReason::Aborted),
    ] {
        UDP_LINK.try_deliver(event).unwrap();
    }

    let mut transport = UDP_LINK.transport();
    let result = block_on(session.run(&mut transport, &mut hw, &mut flash, &mut sink));

    assert_eq!(result, Ok(CloseReason::Aborted));
    assert_eq!(
        UDP_LINK.try_take_outbound().unwrap().as_slice(),
        b"Server/HELLO/Clicker"
    );
    assert!(UDP_LINK.try_take_outbound().is_none());
    // Two status LEDs on, two off, then the broadcast write.
    assert_eq!(hw.gpio_calls().len(), 5);
}
