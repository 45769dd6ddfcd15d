//! Application-wide constants and compile-time configuration.
//!
//! All timing parameters, storage layout and bus addresses live here so
//! they can be tuned in one place.

// Background scheduler

/// Gap between two display multiplex passes (µs).
pub const DISPLAY_REFRESH_GAP_US: u64 = 1_536;

/// How long each digit stays selected during a multiplex pass (µs).
pub const DIGIT_DWELL_US: u32 = 400;

/// Period of the RTC/blink scheduler tick (ms).
pub const SCHEDULER_TICK_MS: u64 = 16;

/// Scheduler ticks between two RTC polls (~330 ms).
pub const RTC_POLL_DIVIDER: u8 = 20;

/// Scheduler ticks between two blink toggles (~160 ms).
pub const BLINK_DIVIDER: u8 = 10;

/// Period of the idle countdown tick (ms).
pub const IDLE_TICK_MS: u64 = 4_194;

/// Idle ticks without a button click before the UI falls back to blank.
pub const IDLE_TIMEOUT_TICKS: u8 = 5;

// Buttons / foreground loop
//
//   Button OPTION → P0.11
//   Button UP     → P0.12
//   Button DOWN   → P0.24
//
// All three are active-low with internal pull-ups.

/// Consecutive polling iterations with OPTION held that open the menu.
pub const LONG_PRESS_LIMIT: u8 = 21;

/// Main display loop delay per iteration (ms).
pub const DISPLAY_LOOP_DELAY_MS: u64 = 60;

/// Menu and time-edit loop delay per iteration (ms).
pub const MENU_LOOP_DELAY_MS: u64 = 50;

/// Poll period while waiting for all buttons to be released (ms).
pub const RELEASE_POLL_MS: u64 = 50;

/// Settle time once all buttons read released (ms).
pub const RELEASE_SETTLE_MS: u64 = 500;

/// Extra guard time after the release settle (ms).
pub const RELEASE_GUARD_MS: u64 = 150;

// Seven-segment display
//
//   Segments a..g, dp → P1.01 ..= P1.08
//   Digit select 0..3 → P0.03, P0.04, P0.28, P0.29 (active-high)
//   Light relay       → P0.30
//   Sleep LED         → P0.31

/// Number of cells on the display module.
pub const CELL_COUNT: usize = 4;

// RTC (DS1307 on TWIM0: SDA P0.26, SCL P0.27)

/// DS1307 7-bit bus address.
pub const DS1307_ADDRESS: u8 = 0x68;

/// Calendar registers written by `set_time`; the timer only tracks time of day.
/// Order: weekday, date, month, year (BCD).
pub const DS1307_FIXED_DATE: [u8; 4] = [0x01, 0x01, 0x01, 0x15];

// Durable storage

/// Size of the emulated EEPROM image.
pub const EEPROM_SIZE: usize = 8;

/// Byte offset of the on-time slot inside the image.
pub const ON_TIME_OFFSET: u8 = 0;

/// Byte offset of the off-time slot inside the image.
pub const OFF_TIME_OFFSET: u8 = 4;

/// Flash page size for nRF52840 (4 KB).
pub const FLASH_PAGE_SIZE: u32 = 4096;

/// Flash page index where the EEPROM image is kept. `memory.x` ends the
/// application's FLASH region here.
pub const STORAGE_FLASH_PAGE_START: u32 = 252;

/// Number of flash pages reserved for the image.
pub const STORAGE_FLASH_PAGE_COUNT: u32 = 2;
