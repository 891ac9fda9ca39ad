//! LIS2DH12 3-axis accelerometer driver (I2C, embedded-hal 1.0).
//!
//! Only what the detector needs: identify the part, configure ±2 g
//! high-resolution mode, switch the output data rate on and off, and read
//! one sample in g.  The sampling *cadence* is owned by the scheduler; the
//! sensor just has to be running while the node is armed.
//!
//! | Register   | Addr | Value  | Meaning                          |
//! |------------|------|--------|----------------------------------|
//! | WHO_AM_I   | 0x0F | 0x33   | identity                         |
//! | CTRL_REG1  | 0x20 | 0x57   | 100 Hz ODR, X/Y/Z enabled        |
//! |            |      | 0x07   | power-down, axes enabled         |
//! | CTRL_REG4  | 0x23 | 0x88   | BDU, ±2 g, high resolution       |
//! | OUT_X_L    | 0x28 |        | 6 bytes X/Y/Z, little endian     |

use embedded_hal::i2c::I2c;
use log::info;

use crate::error::SensorError;
use crate::motion::Sample;

const REG_WHO_AM_I: u8 = 0x0F;
const REG_CTRL1: u8 = 0x20;
const REG_CTRL4: u8 = 0x23;
const REG_OUT_X_L: u8 = 0x28;
/// Sub-address MSB enables register auto-increment.
const AUTO_INCREMENT: u8 = 0x80;

const WHO_AM_I_VALUE: u8 = 0x33;
const CTRL1_RUN_100HZ: u8 = 0x57;
const CTRL1_POWER_DOWN: u8 = 0x07;
const CTRL4_BDU_2G_HR: u8 = 0x88;

/// ±2 g high-resolution: 12-bit left-justified, 1 mg per LSB.
pub fn raw_to_g(raw: i16) -> f32 {
    f32::from(raw >> 4) * 0.001
}

pub struct Lis2dh12<I> {
    i2c: I,
    address: u8,
    running: bool,
}

impl<I: I2c> Lis2dh12<I> {
    pub fn new(i2c: I, address: u8) -> Self {
        Self {
            i2c,
            address,
            running: false,
        }
    }

    /// Verify the part and leave it configured but powered down.
    pub fn init(&mut self) -> Result<(), SensorError> {
        let id = self.read_register(REG_WHO_AM_I)?;
        if id != WHO_AM_I_VALUE {
            return Err(SensorError::UnexpectedDevice(id));
        }
        self.write_register(REG_CTRL4, CTRL4_BDU_2G_HR)?;
        self.set_running(false)?;
        info!("LIS2DH12 at 0x{:02x} ready (±2g, HR)", self.address);
        Ok(())
    }

    /// Power the sensor up (100 Hz ODR) or down.
    pub fn set_running(&mut self, running: bool) -> Result<(), SensorError> {
        let ctrl1 = if running {
            CTRL1_RUN_100HZ
        } else {
            CTRL1_POWER_DOWN
        };
        self.write_register(REG_CTRL1, ctrl1)?;
        self.running = running;
        Ok(())
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Read the latest X/Y/Z output in g.
    pub fn read_g(&mut self) -> Result<Sample, SensorError> {
        let mut buf = [0u8; 6];
        self.i2c
            .write_read(self.address, &[REG_OUT_X_L | AUTO_INCREMENT], &mut buf)
            .map_err(|_| SensorError::BusFailed)?;

        let x = i16::from_le_bytes([buf[0], buf[1]]);
        let y = i16::from_le_bytes([buf[2], buf[3]]);
        let z = i16::from_le_bytes([buf[4], buf[5]]);
        Ok(Sample::new(raw_to_g(x), raw_to_g(y), raw_to_g(z)))
    }

    /// Give the bus back.
    #[cfg(test)]
    pub fn release(self) -> I {
        self.i2c
    }

    fn read_register(&mut self, reg: u8) -> Result<u8, SensorError> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[reg], &mut buf)
            .map_err(|_| SensorError::BusFailed)?;
        Ok(buf[0])
    }

    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), SensorError> {
        self.i2c
            .write(self.address, &[reg, value])
            .map_err(|_| SensorError::BusFailed)
    }
}
