//! DS1307 real-time clock over I²C.
//!
//! Register map (subset, all BCD):
//! ```text
//! 0x00 seconds  bit 7 = CH (clock halt / oscillator disable)
//! 0x01 minutes
//! 0x02 hours    24-hour layout
//! 0x03 weekday, 0x04 date, 0x05 month, 0x06 year
//! ```
//!
//! The driver is blocking and generic over `embedded_hal::i2c::I2c` so the
//! same code runs against the nRF TWIM peripheral and the host-side mock.

use crate::config::{DS1307_ADDRESS, DS1307_FIXED_DATE};
use crate::error::{Result, RtcError};
use crate::time::Time;
use embedded_hal::i2c::I2c;

// Register map (subset)
pub mod reg {
    pub const SECONDS: u8 = 0x00;
    pub const MINUTES: u8 = 0x01;
    pub const HOURS: u8 = 0x02;
}

/// Clock-halt flag in the seconds register.
const CLOCK_HALT: u8 = 0x80;

/// Convert a packed BCD byte to its decimal value.
///
/// No digit validation: `0xFF` decodes to 165, which the startup
/// self-check then rejects as out of range.
pub const fn bcd_to_dec(value: u8) -> u8 {
    (value >> 4) * 10 + (value & 0x0F)
}

/// Convert a decimal value (0..=99) to packed BCD.
pub const fn dec_to_bcd(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

/// Source and sink of the current time of day.
pub trait Clock {
    /// Read the current time.
    fn now(&mut self) -> Result<Time>;

    /// Overwrite the current time.
    fn set(&mut self, time: Time) -> Result<()>;
}

/// Minimal DS1307 driver.
pub struct Ds1307<I2C> {
    i2c: I2C,
}

impl<I2C: I2c> Ds1307<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Give the bus back.
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Clear the clock-halt flag if it is set, keeping the seconds count.
    pub fn start_oscillator(&mut self) -> Result<()> {
        let mut raw = [0u8; 1];
        self.i2c
            .write_read(DS1307_ADDRESS, &[reg::SECONDS], &mut raw)
            .map_err(|_| RtcError::Read)?;

        if raw[0] & CLOCK_HALT != 0 {
            info!("RTC: oscillator was halted, restarting");
            self.i2c
                .write(DS1307_ADDRESS, &[reg::SECONDS, raw[0] & !CLOCK_HALT])
                .map_err(|_| RtcError::Write)?;
        }
        Ok(())
    }

    /// Burst-read seconds, minutes and hours.
    pub fn get_time(&mut self) -> Result<Time> {
        let mut raw = [0u8; 3];
        self.i2c
            .write_read(DS1307_ADDRESS, &[reg::SECONDS], &mut raw)
            .map_err(|_| RtcError::Read)?;

        Ok(Time {
            seconds: bcd_to_dec(raw[0] & !CLOCK_HALT),
            minutes: bcd_to_dec(raw[1]),
            hours: bcd_to_dec(raw[2]),
        })
    }

    /// Write a new time.
    ///
    /// The oscillator is halted while the registers are loaded so the
    /// seconds cannot roll over mid-write, then restarted at second zero.
    /// `time.seconds` is ignored.
    pub fn set_time(&mut self, time: Time) -> Result<()> {
        let [weekday, date, month, year] = DS1307_FIXED_DATE;
        let payload = [
            reg::SECONDS,
            CLOCK_HALT,
            dec_to_bcd(time.minutes),
            dec_to_bcd(time.hours),
            weekday,
            date,
            month,
            year,
        ];
        self.i2c
            .write(DS1307_ADDRESS, &payload)
            .map_err(|_| RtcError::Write)?;

        self.i2c
            .write(DS1307_ADDRESS, &[reg::SECONDS, 0x00])
            .map_err(|_| RtcError::Write)?;
        Ok(())
    }
}

impl<I2C: I2c> Clock for Ds1307<I2C> {
    fn now(&mut self) -> Result<Time> {
        self.get_time()
    }

    fn set(&mut self, time: Time) -> Result<()> {
        self.set_time(time)
    }
}

/// Power-on self-check of the clock chip.
///
/// A DS1307 whose backup cell ran flat reports garbage. When any field is
/// out of range the chip is reset to 00:00:00, unless the MCU came out of
/// a brownout: a sagging supply can corrupt the read itself, and rewriting
/// the clock then would destroy a good time.
///
/// Returns the time in effect after the check.
pub fn startup_check<C: Clock>(clock: &mut C, brownout: bool) -> Result<Time> {
    let now = clock.now()?;
    if now.is_valid() {
        info!("RTC: {=u8}:{=u8}:{=u8}", now.hours, now.minutes, now.seconds);
        return Ok(now);
    }

    if brownout {
        warn!("RTC: invalid time after brownout, leaving clock untouched");
        return Ok(now);
    }

    warn!("RTC: invalid time, resetting to 00:00:00");
    clock.set(Time::MIDNIGHT)?;
    Ok(Time::MIDNIGHT)
}
