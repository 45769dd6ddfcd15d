//! Durable on-time / off-time storage.
//!
//! Layout of the byte image:
//! ```text
//! offset 0..=2  on-time   seconds, minutes, hours
//! offset 4..=6  off-time  seconds, minutes, hours
//! ```
//!
//! An erased cell reads `0xFF`; [`load_time`] turns those into `0` so a
//! factory-fresh device starts with a 00:00:00 / 00:00:00 window (never on).

use crate::config::{EEPROM_SIZE, OFF_TIME_OFFSET, ON_TIME_OFFSET};
use crate::error::{Error, Result};
use crate::time::Time;

/// Value of an erased EEPROM / flash byte.
pub const ERASED: u8 = 0xFF;

/// Byte-addressed non-volatile store.
pub trait Eeprom {
    fn read_byte(&self, offset: u8) -> Result<u8>;
    fn write_byte(&mut self, offset: u8, value: u8) -> Result<()>;
}

/// The two persisted time values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeSlot {
    OnTime,
    OffTime,
}

impl TimeSlot {
    pub const fn offset(self) -> u8 {
        match self {
            TimeSlot::OnTime => ON_TIME_OFFSET,
            TimeSlot::OffTime => OFF_TIME_OFFSET,
        }
    }
}

/// Write `time` into `slot` (seconds first).
pub fn save_time(store: &mut impl Eeprom, time: Time, slot: TimeSlot) -> Result<()> {
    let base = slot.offset();
    store.write_byte(base, time.seconds)?;
    store.write_byte(base + 1, time.minutes)?;
    store.write_byte(base + 2, time.hours)?;
    debug!(
        "Storage: {} <- {=u8}:{=u8}:{=u8}",
        slot, time.hours, time.minutes, time.seconds
    );
    Ok(())
}

/// Read `slot` back, normalizing erased bytes to zero.
pub fn load_time(store: &impl Eeprom, slot: TimeSlot) -> Result<Time> {
    let base = slot.offset();
    let raw = [
        store.read_byte(base)?,
        store.read_byte(base + 1)?,
        store.read_byte(base + 2)?,
    ];
    if raw.contains(&ERASED) {
        info!("Storage: {} has erased bytes, reading as zero", slot);
    }
    Ok(Time {
        seconds: normalize(raw[0]),
        minutes: normalize(raw[1]),
        hours: normalize(raw[2]),
    })
}

fn normalize(value: u8) -> u8 {
    if value == ERASED {
        0
    } else {
        value
    }
}

/// RAM image of the EEPROM, mirrored to flash by the firmware.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EepromImage {
    bytes: [u8; EEPROM_SIZE],
    /// True if the image differs from what was last persisted.
    dirty: bool,
}

impl EepromImage {
    /// An erased image (every byte `0xFF`).
    pub const fn erased() -> Self {
        Self {
            bytes: [ERASED; EEPROM_SIZE],
            dirty: false,
        }
    }

    /// Restore from persisted bytes. Short input leaves the tail erased.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut image = Self::erased();
        let len = data.len().min(EEPROM_SIZE);
        image.bytes[..len].copy_from_slice(&data[..len]);
        image
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the current contents as persisted.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }
}

impl Default for EepromImage {
    fn default() -> Self {
        Self::erased()
    }
}

impl Eeprom for EepromImage {
    fn read_byte(&self, offset: u8) -> Result<u8> {
        self.bytes
            .get(usize::from(offset))
            .copied()
            .ok_or(Error::InvalidSlot)
    }

    fn write_byte(&mut self, offset: u8, value: u8) -> Result<()> {
        let cell = self
            .bytes
            .get_mut(usize::from(offset))
            .ok_or(Error::InvalidSlot)?;
        if *cell != value {
            *cell = value;
            self.dirty = true;
        }
        Ok(())
    }
}
