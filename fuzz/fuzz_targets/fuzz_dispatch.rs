//! Fuzz target: tokenizer + dispatcher
//!
//! Feeds arbitrary messages through `Dispatcher::dispatch_message` for
//! both dialects and checks the identity invariants afterwards: the name
//! is always valid, and the flash record always decodes to it.
//!
//! cargo fuzz run fuzz_dispatch

#![no_main]

use clickerlink::adapters::flash::FlashAdapter;
use clickerlink::app::dispatcher::Dispatcher;
use clickerlink::app::identity::Identity;
use clickerlink::app::ports::{GpioPort, I2cPort, PeripheralError};
use clickerlink::protocol::command::Pin;
use clickerlink::protocol::name::parse_name;
use clickerlink::protocol::variant::{ReplyTag, Variant};
use libfuzzer_sys::fuzz_target;

struct NullHw;

impl I2cPort for NullHw {
    fn init(&mut self) -> Result<(), PeripheralError> {
        Ok(())
    }
    fn release(&mut self) -> Result<(), PeripheralError> {
        Ok(())
    }
    fn write_byte(&mut self, _: u8, _: u8) -> Result<(), PeripheralError> {
        Ok(())
    }
    fn read_byte(&mut self, _: u8) -> Result<u8, PeripheralError> {
        Ok(0xA5)
    }
}

impl GpioPort for NullHw {
    fn set(&mut self, _: Pin, _: bool) -> Result<(), PeripheralError> {
        Ok(())
    }
}

fuzz_target!(|data: &[u8]| {
    let Some((&selector, message)) = data.split_first() else {
        return;
    };
    let variant = if selector & 1 == 0 { Variant::Udp } else { Variant::Tcp };
    let dispatcher = Dispatcher::new(variant, ReplyTag::Reply);

    let mut flash = FlashAdapter::new();
    let Ok(mut identity) = Identity::load(&mut flash) else {
        return;
    };
    let _ = dispatcher.dispatch_message(message, &mut identity, &mut NullHw, &mut flash);

    assert!(parse_name(identity.name()).is_ok());
    let reloaded = Identity::load(&mut flash).map(|i| i.name() == identity.name());
    assert_eq!(reloaded, Ok(true));
});
