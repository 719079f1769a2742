//! Clicker link firmware entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HalPeripherals    FlashAdapter   LogEventSink                 │
//! │  (I2c + Gpio)      (Storage)      (EventSink)                  │
//! │  UdpTransport / TcpTransport (Transport)                       │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │          Session ─▶ Handshake ─▶ Dispatcher            │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Supervisor: run session, back off, run a fresh session        │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use core::net::SocketAddr;

use anyhow::{Result, anyhow};
use log::{info, warn};

use esp_idf_hal::gpio::PinDriver;
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::modem::Modem;
use esp_idf_hal::prelude::*;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi};

use clickerlink::adapters::flash::FlashAdapter;
use clickerlink::adapters::hal::HalPeripherals;
use clickerlink::adapters::log_sink::LogEventSink;
use clickerlink::adapters::tcp::TcpTransport;
use clickerlink::adapters::udp::UdpTransport;
use clickerlink::app::dispatcher::Dispatcher;
use clickerlink::app::identity::Identity;
use clickerlink::app::ports::{EventSink, GpioPort, I2cPort, StoragePort};
use clickerlink::config::LinkConfig;
use clickerlink::link::session::Session;
use clickerlink::link::transport::CloseReason;
use clickerlink::protocol::variant::Variant;

/// Build-time overrides. Unset values fall back to the defaults.
const CONFIG_JSON: Option<&str> = option_env!("CLICKER_CONFIG");
const WIFI_SSID: Option<&str> = option_env!("CLICKER_WIFI_SSID");
const WIFI_PASSWORD: &str = match option_env!("CLICKER_WIFI_PASSWORD") {
    Some(p) => p,
    None => "",
};

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_sys::link_patches();
    esp_idf_logger::init()?;

    info!("Clicker link v{}", env!("CARGO_PKG_VERSION"));

    let config = match CONFIG_JSON {
        Some(json) => LinkConfig::from_json(json).map_err(clickerlink::Error::from)?,
        None => LinkConfig::default(),
    };
    info!("Config: {:?}", config);
    let server = config.server_endpoint().map_err(clickerlink::Error::from)?;

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs_partition = EspDefaultNvsPartition::take()?;

    // ── 2. Status LEDs: LED1 at boot ──────────────────────────
    let mut led1 = PinDriver::output(peripherals.pins.gpio2)?;
    let mut led2 = PinDriver::output(peripherals.pins.gpio4)?;
    led1.set_high()?;

    // ── 3. Identity (LED2 once loaded) ────────────────────────
    let mut flash = FlashAdapter::new(nvs_partition.clone()).map_err(clickerlink::Error::from)?;
    let identity = Identity::load(&mut flash).unwrap_or_else(|e| {
        warn!("Identity load failed ({}), using default name", e);
        Identity::fallback()
    });
    led2.set_high()?;

    // ── 4. Peripherals ────────────────────────────────────────
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio21,
        peripherals.pins.gpio22,
        &I2cConfig::new().baudrate(100.kHz().into()),
    )?;
    let mut hw = HalPeripherals::new(i2c, led1, led2);
    let mut sink = LogEventSink::new();

    // ── 5. Network ────────────────────────────────────────────
    let _wifi = connect_wifi(peripherals.modem, sysloop, nvs_partition)?;

    // ── 6. Supervisor loop ────────────────────────────────────
    let dispatcher = Dispatcher::new(config.variant, config.reply_tag());
    let mut session = Session::new(dispatcher, identity);
    let executor: edge_executor::LocalExecutor<'_, 4> = edge_executor::LocalExecutor::new();

    loop {
        let result = futures_lite::future::block_on(executor.run(run_session(
            &config,
            server,
            &mut session,
            &mut hw,
            &mut flash,
            &mut sink,
        )));
        match result {
            Ok(reason) => info!("Session over: {}", reason),
            Err(e) => warn!("Session failed: {}", e),
        }

        info!("Reconnecting in {} ms", config.reconnect_delay_ms);
        futures_lite::future::block_on(async_io_mini::Timer::after(config.reconnect_delay()));
    }
}

/// One transport connection, start to finish.
async fn run_session(
    config: &LinkConfig,
    server: SocketAddr,
    session: &mut Session,
    hw: &mut (impl I2cPort + GpioPort),
    storage: &mut impl StoragePort,
    sink: &mut impl EventSink,
) -> clickerlink::Result<CloseReason> {
    match config.variant {
        Variant::Udp => {
            let mut transport = UdpTransport::connect(config.client_port, server)?;
            session.run(&mut transport, hw, storage, sink).await
        }
        Variant::Tcp => {
            let mut transport = TcpTransport::connect(server, config.idle_timeout())?;
            session.run(&mut transport, hw, storage, sink).await
        }
    }
}

fn connect_wifi(
    modem: Modem,
    sysloop: EspSystemEventLoop,
    nvs: EspDefaultNvsPartition,
) -> Result<BlockingWifi<EspWifi<'static>>> {
    let ssid = WIFI_SSID.ok_or_else(|| anyhow!("CLICKER_WIFI_SSID not set at build time"))?;

    let mut wifi = BlockingWifi::wrap(EspWifi::new(modem, sysloop.clone(), Some(nvs))?, sysloop)?;
    wifi.set_configuration(&Configuration::Client(ClientConfiguration {
        ssid: ssid.try_into().map_err(|_| anyhow!("SSID too long"))?,
        password: WIFI_PASSWORD
            .try_into()
            .map_err(|_| anyhow!("Wi-Fi password too long"))?,
        auth_method: if WIFI_PASSWORD.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        },
        ..Default::default()
    }))?;

    wifi.start()?;
    info!("Wi-Fi: connecting to '{}'", ssid);
    wifi.connect()?;
    wifi.wait_netif_up()?;
    info!("Wi-Fi: {:?}", wifi.wifi().sta_netif().get_ip_info()?);
    Ok(wifi)
}
