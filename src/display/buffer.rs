//! Display buffer and edit indicator.
//!
//! Every field is its own atomic word. The foreground writes cells one at
//! a time and the refresh task reads them one at a time; a half-written
//! buffer shows for at most one multiplex pass, which the eye never sees.

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use crate::config::CELL_COUNT;
use crate::time::Time;

/// Cell value that lights no segment.
pub const BLANK: u8 = 0xFF;

/// Marker value for "no decimal point" / "no edit cursor".
const NONE: u8 = 0xFF;

/// Cell index that carries the hours/minutes separator dot.
const SEPARATOR_CELL: usize = 1;

/// Content of the four display cells.
///
/// A cell holds a digit value `0..=9`, an ASCII character, or [`BLANK`].
pub struct DisplayBuffer {
    cells: [AtomicU8; CELL_COUNT],
    decimal_point: AtomicU8,
}

impl DisplayBuffer {
    pub const fn new() -> Self {
        Self {
            cells: [
                AtomicU8::new(BLANK),
                AtomicU8::new(BLANK),
                AtomicU8::new(BLANK),
                AtomicU8::new(BLANK),
            ],
            decimal_point: AtomicU8::new(NONE),
        }
    }

    pub fn cell(&self, index: usize) -> u8 {
        self.cells
            .get(index)
            .map_or(BLANK, |c| c.load(Ordering::Relaxed))
    }

    pub fn set_cell(&self, index: usize, value: u8) {
        if let Some(c) = self.cells.get(index) {
            c.store(value, Ordering::Relaxed);
        }
    }

    pub fn decimal_point(&self) -> Option<usize> {
        match self.decimal_point.load(Ordering::Relaxed) {
            NONE => None,
            index => Some(usize::from(index)),
        }
    }

    pub fn set_decimal_point(&self, index: Option<usize>) {
        let raw = index.map_or(NONE, |i| i as u8);
        self.decimal_point.store(raw, Ordering::Relaxed);
    }

    /// All four cells, left to right.
    pub fn cells(&self) -> [u8; CELL_COUNT] {
        core::array::from_fn(|i| self.cell(i))
    }

    pub fn show_digits(&self, digits: [u8; CELL_COUNT], decimal_point: Option<usize>) {
        for (i, d) in digits.into_iter().enumerate() {
            self.set_cell(i, d);
        }
        self.set_decimal_point(decimal_point);
    }

    /// `hh.mm` with the separator dot lit on odd seconds, so it blinks
    /// at 0.5 Hz as the clock is polled.
    pub fn show_time(&self, time: &Time) {
        let dot = (time.seconds % 2 != 0).then_some(SEPARATOR_CELL);
        self.show_digits(time_digits(time), dot);
    }

    /// `hh.mm` with the separator dot always lit (configured on/off times).
    pub fn show_time_marked(&self, time: &Time) {
        self.show_digits(time_digits(time), Some(SEPARATOR_CELL));
    }

    /// Four ASCII characters, no decimal point.
    pub fn show_text(&self, text: &[u8; CELL_COUNT]) {
        self.show_digits(*text, None);
    }

    pub fn clear(&self) {
        self.show_digits([BLANK; CELL_COUNT], None);
    }
}

impl Default for DisplayBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// `[h tens, h units, m tens, m units]`
pub fn time_digits(time: &Time) -> [u8; CELL_COUNT] {
    [
        time.hours / 10,
        time.hours % 10,
        time.minutes / 10,
        time.minutes % 10,
    ]
}

/// Which cell is being edited and whether it is in the lit blink phase.
pub struct EditIndicator {
    cursor: AtomicU8,
    /// Blink toggling enabled (an edit is running).
    blinking: AtomicBool,
    /// Current blink phase; `false` withholds the cursor cell.
    visible: AtomicBool,
}

impl EditIndicator {
    pub const fn new() -> Self {
        Self {
            cursor: AtomicU8::new(NONE),
            blinking: AtomicBool::new(false),
            visible: AtomicBool::new(true),
        }
    }

    pub fn cursor(&self) -> Option<usize> {
        match self.cursor.load(Ordering::Relaxed) {
            NONE => None,
            index => Some(usize::from(index)),
        }
    }

    /// Start an edit on `cursor`, blink phase lit.
    pub fn begin(&self, cursor: usize) {
        self.visible.store(true, Ordering::Relaxed);
        self.move_to(cursor);
        self.blinking.store(true, Ordering::Relaxed);
    }

    pub fn move_to(&self, cursor: usize) {
        self.cursor.store(cursor as u8, Ordering::Relaxed);
    }

    /// Stop blinking and release the cursor.
    pub fn end(&self) {
        self.blinking.store(false, Ordering::Relaxed);
        self.cursor.store(NONE, Ordering::Relaxed);
        self.visible.store(false, Ordering::Relaxed);
    }

    /// Back to the idle defaults: no cursor, every cell lit.
    pub fn reset(&self) {
        self.end();
        self.visible.store(true, Ordering::Relaxed);
    }

    pub fn is_blinking(&self) -> bool {
        self.blinking.load(Ordering::Relaxed)
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::Relaxed)
    }

    pub fn toggle(&self) {
        self.visible.fetch_xor(true, Ordering::Relaxed);
    }

    /// Whether the digit-select line of `index` may be asserted.
    pub fn cell_visible(&self, index: usize) -> bool {
        self.cursor() != Some(index) || self.is_visible()
    }
}

impl Default for EditIndicator {
    fn default() -> Self {
        Self::new()
    }
}
