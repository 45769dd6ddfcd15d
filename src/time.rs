//! Time-of-day value shared by the clock, the on-time and the off-time.
//!
//! ```text
//! linear = hours << 16 | minutes << 8 | seconds
//! ```
//!
//! The linear form orders like the time of day and fits in one word, which
//! is what lets [`AtomicTime`] hand a whole value across the interrupt /
//! foreground boundary without a lock.

use core::sync::atomic::{AtomicU32, Ordering};

/// Hours, minutes and seconds of a day.
///
/// Fields are not range-checked on construction: a clock chip that lost
/// its backup supply can report garbage, and the poll path passes it through.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Time {
    /// 0..=23
    pub hours: u8,
    /// 0..=59
    pub minutes: u8,
    /// 0..=59
    pub seconds: u8,
}

impl Time {
    pub const MIDNIGHT: Self = Self::new(0, 0, 0);

    pub const fn new(hours: u8, minutes: u8, seconds: u8) -> Self {
        Self {
            hours,
            minutes,
            seconds,
        }
    }

    /// `true` when every field is inside its time-of-day range.
    pub const fn is_valid(&self) -> bool {
        self.hours <= 23 && self.minutes <= 59 && self.seconds <= 59
    }

    /// Linearized value, most significant field first.
    pub const fn linear(&self) -> u32 {
        (self.hours as u32) << 16 | (self.minutes as u32) << 8 | self.seconds as u32
    }

    pub const fn from_linear(value: u32) -> Self {
        Self {
            hours: (value >> 16) as u8,
            minutes: (value >> 8) as u8,
            seconds: value as u8,
        }
    }
}

/// A [`Time`] stored as a single atomic word.
pub struct AtomicTime(AtomicU32);

impl AtomicTime {
    pub const fn new(time: Time) -> Self {
        Self(AtomicU32::new(time.linear()))
    }

    pub fn load(&self) -> Time {
        Time::from_linear(self.0.load(Ordering::Relaxed))
    }

    pub fn store(&self, time: Time) {
        self.0.store(time.linear(), Ordering::Relaxed);
    }
}

impl Default for AtomicTime {
    fn default() -> Self {
        Self::new(Time::MIDNIGHT)
    }
}
