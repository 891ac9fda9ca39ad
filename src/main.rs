//! Still-Position Detector Firmware — Main Entry Point
//!
//! Hexagonal architecture with a single-threaded, timer-driven event loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter          LogEventSink     MonotonicClock      │
//! │  (Accel+LED+Battery+Radio) (EventSink)     (Clock)             │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  FSM · debounce gate · transmit gate · battery relay   │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Scheduler (delegate-driven) · EventQueue · ButtonDriver (ISR) │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use embedded_hal::i2c::I2c;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::AnyIOPin;
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::uart::{config::Config as UartConfig, UartDriver};
use esp_idf_hal::units::FromValueType;
use log::{error, info, warn};

use stillpos::adapters::hardware::HardwareAdapter;
use stillpos::adapters::log_sink::LogEventSink;
use stillpos::adapters::radio::RadioAdapter;
use stillpos::adapters::time::MonotonicClock;
use stillpos::adapters::transport::{Transport, UartTransport};
use stillpos::app::ports::{Clock, TimerDelegate, TimerId};
use stillpos::app::service::AppService;
use stillpos::config::DetectorConfig;
use stillpos::drivers::accelerometer::Lis2dh12;
use stillpos::drivers::battery::BatteryMonitor;
use stillpos::drivers::button::ButtonDriver;
use stillpos::drivers::status_led::StatusLed;
use stillpos::drivers::watchdog::Watchdog;
use stillpos::drivers::hw_init;
use stillpos::error::Error;
use stillpos::events::{Event, EventQueue};
use stillpos::pins;
use stillpos::scheduler::Scheduler;

/// Upper bound on one loop sleep, so button presses are picked up promptly.
const MAX_IDLE_SLEEP_MS: u64 = 10;

// ── Scheduler delegate ────────────────────────────────────────
//
// Bridges the scheduler (which knows nothing about the event system)
// to the event queue.  The sampling timer reads the accelerometer here
// so the sample and its timestamp travel together.

struct TimerEvents<'a, I: I2c, T: Transport> {
    hw: &'a mut HardwareAdapter<I, T>,
    queue: &'a mut EventQueue,
}

impl<I: I2c, T: Transport> TimerDelegate for TimerEvents<'_, I, T> {
    fn on_timer_fired(&mut self, timer: TimerId) {
        let event = match timer {
            TimerId::Sampling => match self.hw.read_sample() {
                Ok(sample) => Event::SampleReady(sample),
                Err(e) => {
                    warn!("Accelerometer read failed: {}", e);
                    return;
                }
            },
            TimerId::Battery => Event::BatteryUpdate,
            TimerId::Housekeeping => Event::Housekeeping,
        };
        self.queue.push(event);
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Still-Position Detector v{}      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration (compile-time override or defaults) ──
    let config = DetectorConfig::with_override(option_env!("STILLPOS_CONFIG"));
    info!(
        "Config: band=[{:.2}, {:.2}]g sample={}ms debounce={}ms cooldown={}ms",
        config.lower_threshold_g,
        config.upper_threshold_g,
        config.sample_interval_ms,
        config.debounce_window_ms,
        config.transmit_cooldown_ms,
    );

    // Subscribed before peripheral init so a halt below ends in a reset.
    let watchdog = Watchdog::new(config.watchdog_timeout_ms);

    // ── 3. Initialise hardware peripherals ────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    if let Err(e) = hw_init::init_isr_service() {
        error!("ISR service init failed: {} — continuing without button", e);
    }

    let peripherals = Peripherals::take()?;

    // I2C0: SDA on GPIO8, SCL on GPIO9.
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio8,
        peripherals.pins.gpio9,
        &I2cConfig::new().baudrate(pins::I2C_BAUD_HZ.Hz()),
    )?;
    let mut accel = Lis2dh12::new(i2c, pins::LIS2DH12_ADDR);
    if let Err(e) = accel.init().map_err(Error::from) {
        error!("{} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    // UART1 to the radio co-processor: TX on GPIO17, RX on GPIO18.
    let uart = UartDriver::new(
        peripherals.uart1,
        peripherals.pins.gpio17,
        peripherals.pins.gpio18,
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &UartConfig::default().baudrate(pins::RADIO_UART_BAUD.Hz()),
    )?;

    // ── 4. Construct adapters ─────────────────────────────────
    let mut hw = HardwareAdapter::new(
        accel,
        StatusLed::new(pins::LED_GPIO),
        BatteryMonitor::new(pins::BATTERY_ADC_CHANNEL, pins::BATTERY_DIVIDER_RATIO),
        RadioAdapter::new(UartTransport::new(uart)),
    );
    let mut log_sink = LogEventSink::new();
    let clock = MonotonicClock::new();
    let mut button = ButtonDriver::new();
    let mut queue = EventQueue::new();

    // ── 5. Construct app service ──────────────────────────────
    let boot_ms = clock.now_ms();
    let mut sched = Scheduler::new(&config, boot_ms);
    let mut app = AppService::new(config);
    app.start(boot_ms, &mut hw, &mut log_sink);

    info!("System ready. Entering event loop.");

    // ── 6. Event loop ─────────────────────────────────────────
    let mut last_ms = boot_ms;

    loop {
        let now_ms = clock.now_ms();

        if button.poll().is_some() {
            queue.push(Event::ButtonPress);
        }

        sched.tick(
            now_ms,
            &mut TimerEvents {
                hw: &mut hw,
                queue: &mut queue,
            },
        );

        queue.drain(|event| app.dispatch(event, now_ms, &mut hw, &mut log_sink));

        // Arming and detection change the sampling cadence.
        sched.set_sampling(app.sample_interval(), now_ms);

        hw.tick_led(now_ms.saturating_sub(last_ms) as u32);
        last_ms = now_ms;

        watchdog.feed();

        let sleep_ms = sched
            .next_deadline_ms()
            .map_or(MAX_IDLE_SLEEP_MS, |due| due.saturating_sub(clock.now_ms()))
            .min(MAX_IDLE_SLEEP_MS);
        if sleep_ms > 0 {
            FreeRtos::delay_ms(sleep_ms as u32);
        }
    }
}
