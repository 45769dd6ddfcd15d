//! Multiplexed rendering of the display buffer.
//!
//! One pass lights each cell in turn, left to right:
//!
//! 1. drive the cell's segment pattern (plus the dot if marked)
//! 2. assert that cell's digit-select line, unless it is the edit cursor
//!    in its dark blink phase
//! 3. dwell, then release every select line
//!
//! Repeated fast enough, four single digits read as one steady display.

use embedded_hal::delay::DelayNs;

use super::buffer::{DisplayBuffer, EditIndicator};
use super::segments::{self, DECIMAL_POINT};
use crate::config::{CELL_COUNT, DIGIT_DWELL_US};

/// Output side of the display module.
pub trait SegmentPort {
    /// Drive the segment lines with `pattern` (see [`segments`] for bits).
    fn set_segments(&mut self, pattern: u8);

    /// Assert exactly one digit-select line, or none.
    fn select(&mut self, digit: Option<usize>);
}

/// Draw one full multiplex pass.
pub fn render<P, D>(buffer: &DisplayBuffer, edit: &EditIndicator, port: &mut P, delay: &mut D)
where
    P: SegmentPort,
    D: DelayNs,
{
    let decimal_point = buffer.decimal_point();

    for index in 0..CELL_COUNT {
        let mut pattern = segments::pattern(buffer.cell(index));
        if decimal_point == Some(index) {
            pattern |= DECIMAL_POINT;
        }
        port.set_segments(pattern);

        if edit.cell_visible(index) {
            port.select(Some(index));
        }

        delay.delay_us(DIGIT_DWELL_US);
        port.select(None);
    }
}
