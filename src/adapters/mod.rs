//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements         | Connects to               |
//! |-------------|--------------------|---------------------------|
//! | `hardware`  | AccelerometerPort  | LIS2DH12 over I2C         |
//! |             | IndicatorPort      | Status LED GPIO           |
//! |             | BatteryPort        | ADC1 battery divider      |
//! |             | RadioPort          | via `radio`               |
//! | `radio`     | RadioPort          | postcard/COBS `Transport` |
//! | `log_sink`  | EventSink          | Serial log output         |
//! | `time`      | Clock              | ESP32 system timer        |

pub mod hardware;
pub mod log_sink;
pub mod radio;
pub mod time;
pub mod transport;
