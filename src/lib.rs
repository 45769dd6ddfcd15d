//! Host-testable core of the light timer firmware.
//!
//! Everything that does not touch a peripheral register lives here: the
//! time model, the on/off window, the DS1307 driver (generic over
//! `embedded-hal`), the EEPROM slot codec, the display buffer and renderer,
//! the background task bodies and the foreground UI state machine.
//!
//! Usage: `cargo test --lib`
//!
//! Note: The embedded binary uses main.rs with #![no_std] and #![no_main]
//! and wires these pieces to Embassy executors and nRF52840 pins.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod config;
pub mod display;
pub mod error;
pub mod power_logic;
pub mod rtc;
pub mod scheduler;
pub mod shared;
pub mod storage;
pub mod time;
pub mod ui;
pub mod window;

pub use error::{Error, Result};
pub use shared::{SharedState, TimeTarget};
pub use time::Time;

// ═══════════════════════════════════════════════════════════════════════════
// Boot
// ═══════════════════════════════════════════════════════════════════════════

/// Load the persisted on/off times into `shared`.
///
/// Erased bytes come back as zero, so a blank store yields a window that
/// never switches the light on.
pub fn load_window<E: storage::Eeprom>(store: &E, shared: &SharedState) -> Result<()> {
    let on = storage::load_time(store, storage::TimeSlot::OnTime)?;
    let off = storage::load_time(store, storage::TimeSlot::OffTime)?;
    shared.on_time.store(on);
    shared.off_time.store(off);
    info!(
        "Window: on {=u8}:{=u8}, off {=u8}:{=u8}",
        on.hours, on.minutes, off.hours, off.minutes
    );
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════
