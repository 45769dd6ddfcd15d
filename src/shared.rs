//! State shared between the timer-driven background tasks and the
//! foreground loop.
//!
//! There are no locks. Every field is a single atomic word and no update
//! ever has to cover two fields at once:
//!
//! | field          | written by                    | read by                 |
//! |----------------|-------------------------------|-------------------------|
//! | display        | foreground                    | display refresh         |
//! | edit           | foreground, blink toggle      | display refresh         |
//! | system_time    | RTC task                      | foreground              |
//! | on/off_time    | foreground (commit, boot)     | RTC task                |
//! | idle countdown | foreground (restart), idle    | foreground              |
//! | light_active   | RTC task                      | foreground (sleep LED)  |

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use crate::config::IDLE_TIMEOUT_TICKS;
use crate::display::{DisplayBuffer, EditIndicator};
use crate::time::{AtomicTime, Time};

/// Which of the three time values an operation targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeTarget {
    System,
    On,
    Off,
}

pub struct SharedState {
    pub display: DisplayBuffer,
    pub edit: EditIndicator,
    pub system_time: AtomicTime,
    pub on_time: AtomicTime,
    pub off_time: AtomicTime,
    idle_countdown: AtomicU8,
    light_active: AtomicBool,
}

impl SharedState {
    pub const fn new() -> Self {
        Self {
            display: DisplayBuffer::new(),
            edit: EditIndicator::new(),
            system_time: AtomicTime::new(Time::MIDNIGHT),
            on_time: AtomicTime::new(Time::MIDNIGHT),
            off_time: AtomicTime::new(Time::MIDNIGHT),
            idle_countdown: AtomicU8::new(0),
            light_active: AtomicBool::new(false),
        }
    }

    pub fn time(&self, target: TimeTarget) -> &AtomicTime {
        match target {
            TimeTarget::System => &self.system_time,
            TimeTarget::On => &self.on_time,
            TimeTarget::Off => &self.off_time,
        }
    }

    /// Reload the idle countdown after user activity.
    pub fn restart_idle(&self) {
        self.idle_countdown
            .store(IDLE_TIMEOUT_TICKS, Ordering::Relaxed);
    }

    /// Stop the idle countdown as if the timeout had elapsed.
    pub fn expire_idle(&self) {
        self.idle_countdown.store(0, Ordering::Relaxed);
    }

    pub fn idle_remaining(&self) -> u8 {
        self.idle_countdown.load(Ordering::Relaxed)
    }

    /// The user has been idle for the full timeout.
    pub fn idle_expired(&self) -> bool {
        self.idle_remaining() == 0
    }

    /// One idle-timer period elapsed.
    ///
    /// Returns `true` if the countdown was still running (the timer re-arms),
    /// `false` once it already sat at zero (the timer pauses until
    /// [`restart_idle`](Self::restart_idle)).
    pub fn tick_idle(&self) -> bool {
        self.idle_countdown
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
            .is_ok()
    }

    pub fn light_active(&self) -> bool {
        self.light_active.load(Ordering::Relaxed)
    }

    /// Store the light decision; returns the previous value.
    pub fn set_light_active(&self, active: bool) -> bool {
        self.light_active.swap(active, Ordering::Relaxed)
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}
