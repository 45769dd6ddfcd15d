//! Unified error type for light-timer.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Only the I/O adapters can fail; the scheduling and UI core is total.

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // RTC
    /// The two-wire transfer to the clock chip failed.
    Rtc(RtcError),

    // Storage
    /// Flash read/write/erase failed.
    Storage,

    /// A byte offset outside of the EEPROM image was addressed.
    InvalidSlot,
}

/// Subset of RTC bus errors we propagate (keeps the enum `Copy`-friendly).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RtcError {
    /// Register read (write-then-read) failed.
    Read,
    /// Register write failed.
    Write,
}

// Convenience conversions

impl From<RtcError> for Error {
    fn from(e: RtcError) -> Self {
        Error::Rtc(e)
    }
}

pub type Result<T> = core::result::Result<T, Error>;
