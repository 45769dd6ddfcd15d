//! Background task bodies.
//!
//! Three periodic tasks run off their own timers and preempt the
//! foreground loop:
//!
//! - **Display refresh** (fastest): one multiplex pass, see [`refresh_display`].
//! - **RTC / blink** (16 ms tick): every [`RTC_POLL_DIVIDER`] ticks poll the
//!   clock and drive the relay; every [`BLINK_DIVIDER`] ticks flip the edit
//!   cursor's blink phase while an edit runs. See [`ClockTask`].
//! - **Idle countdown** (~4 s tick): see [`SharedState::tick_idle`].
//!
//! Each body runs to completion and is short compared to its period.
//! Only the firmware runtime knows about timers; everything here is plain
//! functions over [`SharedState`] and the HAL traits, so it runs on the
//! host unchanged.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};

use crate::config::{BLINK_DIVIDER, RTC_POLL_DIVIDER};
use crate::display::{self, SegmentPort};
use crate::rtc::Clock;
use crate::shared::SharedState;
use crate::time::Time;
use crate::window::is_light_active;

/// Work handed from the foreground to the task that owns the RTC bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockRequest {
    /// Write a new time to the clock chip.
    Set(Time),
    /// Poll the clock now instead of waiting for the next poll tick.
    Refresh,
}

/// RTC poll, light decision and blink toggle.
pub struct ClockTask {
    poll_ticks: u8,
    blink_ticks: u8,
}

impl ClockTask {
    pub const fn new() -> Self {
        Self {
            poll_ticks: 0,
            blink_ticks: 0,
        }
    }

    /// One scheduler tick.
    pub fn tick<C, R>(&mut self, shared: &SharedState, clock: &mut C, relay: &mut R)
    where
        C: Clock,
        R: OutputPin,
    {
        self.poll_ticks += 1;
        if self.poll_ticks >= RTC_POLL_DIVIDER {
            self.poll_ticks = 0;
            self.poll(shared, clock, relay);
        }

        if shared.edit.is_blinking() {
            self.blink_ticks += 1;
            if self.blink_ticks >= BLINK_DIVIDER {
                self.blink_ticks = 0;
                shared.edit.toggle();
            }
        } else {
            self.blink_ticks = 0;
        }
    }

    /// Read the clock, then re-evaluate the light.
    ///
    /// A failed read keeps the previous time. Out-of-range values are
    /// stored as read; only the startup check corrects them.
    pub fn poll<C, R>(&mut self, shared: &SharedState, clock: &mut C, relay: &mut R)
    where
        C: Clock,
        R: OutputPin,
    {
        match clock.now() {
            Ok(now) => shared.system_time.store(now),
            Err(e) => warn!("RTC: poll failed: {:?}", e),
        }
        self.update_light(shared, relay);
    }

    /// Serve a request from the foreground.
    pub fn handle<C, R>(
        &mut self,
        request: ClockRequest,
        shared: &SharedState,
        clock: &mut C,
        relay: &mut R,
    ) where
        C: Clock,
        R: OutputPin,
    {
        match request {
            ClockRequest::Set(time) => {
                // The chip restarts on the full minute.
                let time = Time::new(time.hours, time.minutes, 0);
                match clock.set(time) {
                    Ok(()) => {
                        info!(
                            "RTC: set to {=u8}:{=u8}:{=u8}",
                            time.hours, time.minutes, time.seconds
                        );
                        shared.system_time.store(time);
                    }
                    Err(e) => warn!("RTC: set failed: {:?}", e),
                }
                self.update_light(shared, relay);
            }
            ClockRequest::Refresh => self.poll(shared, clock, relay),
        }
    }

    /// Recompute the light flag from the shared times and drive the relay.
    pub fn update_light<R: OutputPin>(&mut self, shared: &SharedState, relay: &mut R) {
        let active = is_light_active(
            &shared.system_time.load(),
            &shared.on_time.load(),
            &shared.off_time.load(),
        );

        if shared.set_light_active(active) != active {
            info!("Light: {}", if active { "on" } else { "off" });
        }
        if relay.set_state(PinState::from(active)).is_err() {
            warn!("Relay: drive failed");
        }
    }
}

impl Default for ClockTask {
    fn default() -> Self {
        Self::new()
    }
}

/// One display multiplex pass.
pub fn refresh_display<P, D>(shared: &SharedState, port: &mut P, delay: &mut D)
where
    P: SegmentPort,
    D: DelayNs,
{
    display::render(&shared.display, &shared.edit, port, delay);
}
