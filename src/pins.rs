//! GPIO / peripheral pin assignments for the sensor node board.
//!
//! Pins driven through raw ESP-IDF calls are numbered here.  Pins claimed as
//! typed `Peripherals` fields (I2C0 SDA/SCL on GPIO 8/9, radio UART1 TX/RX on
//! GPIO 17/18) are named where `main` takes them.

// ---------------------------------------------------------------------------
// User interface
// ---------------------------------------------------------------------------

/// Status LED, active HIGH.
pub const LED_GPIO: i32 = 2;
/// Momentary push button.  Pulled down; pressing drives it HIGH.
pub const BUTTON_GPIO: i32 = 0;

// ---------------------------------------------------------------------------
// Accelerometer (LIS2DH12 on I2C0)
// ---------------------------------------------------------------------------

/// 7-bit address with SA0 pulled high.
pub const LIS2DH12_ADDR: u8 = 0x19;
/// I2C bus speed.
pub const I2C_BAUD_HZ: u32 = 400_000;

// ---------------------------------------------------------------------------
// Battery monitor
// ---------------------------------------------------------------------------

/// ADC1 channel of the battery divider tap (GPIO 4 on ESP32-S3).
pub const BATTERY_ADC_CHANNEL: u32 = 3;
/// Divider ratio: V_bat = V_adc * ratio (two 100 kΩ resistors).
pub const BATTERY_DIVIDER_RATIO: f32 = 2.0;

// ---------------------------------------------------------------------------
// Radio co-processor link (UART1)
// ---------------------------------------------------------------------------

pub const RADIO_UART_BAUD: u32 = 115_200;
