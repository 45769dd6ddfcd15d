//! Four-digit `hh.mm` time editor.
//!
//! The editor works on a copy of the target time. Nothing outside the
//! display buffer changes until the last digit is confirmed; an aborted
//! edit leaves the target exactly as it was.

use super::input_logic::{digit_down, digit_up};
use crate::config::CELL_COUNT;
use crate::display::buffer::time_digits;
use crate::shared::{SharedState, TimeTarget};
use crate::time::Time;

const SEPARATOR_CELL: usize = 1;
const LAST_CURSOR: usize = CELL_COUNT - 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeEditor {
    target: TimeTarget,
    cursor: usize,
    digits: [u8; CELL_COUNT],
    saved_seconds: u8,
}

impl TimeEditor {
    /// Start editing `time`: cursor on the tens-of-hour digit, blinking.
    ///
    /// Out-of-range fields (a corrupted stored slot, a clock that lost its
    /// backup cell) start from the nearest digits the editor can produce.
    pub fn begin(target: TimeTarget, time: Time, shared: &SharedState) -> Self {
        let mut editor = Self {
            target,
            cursor: 0,
            digits: time_digits(&time),
            saved_seconds: if time.seconds < 60 { time.seconds } else { 0 },
        };
        for cursor in 0..CELL_COUNT {
            editor.digits[cursor] = editor.digits[cursor].min(editor.max_digit(cursor));
        }
        shared.edit.begin(0);
        editor.show(shared);
        debug!(
            "Edit: {:?} from {=u8}:{=u8}",
            target, time.hours, time.minutes
        );
        editor
    }

    pub fn target(&self) -> TimeTarget {
        self.target
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn digits(&self) -> [u8; CELL_COUNT] {
        self.digits
    }

    /// Largest value the digit under `cursor` may take.
    fn max_digit(&self, cursor: usize) -> u8 {
        match cursor {
            0 => 2,
            1 if self.digits[0] == 2 => 3,
            1 => 9,
            2 => 5,
            _ => 9,
        }
    }

    pub fn increment(&mut self, shared: &SharedState) {
        let max = self.max_digit(self.cursor);
        self.digits[self.cursor] = digit_up(self.digits[self.cursor], max);
        self.show(shared);
    }

    pub fn decrement(&mut self, shared: &SharedState) {
        let max = self.max_digit(self.cursor);
        self.digits[self.cursor] = digit_down(self.digits[self.cursor], max);
        self.show(shared);
    }

    /// Confirm the digit under the cursor.
    ///
    /// Returns the edited time once the last digit is confirmed, `None`
    /// while there are digits left.
    pub fn advance(&mut self, shared: &SharedState) -> Option<Time> {
        if self.cursor >= LAST_CURSOR {
            shared.edit.end();
            let time = self.committed();
            info!(
                "Edit: {:?} committed {=u8}:{=u8}",
                self.target, time.hours, time.minutes
            );
            return Some(time);
        }

        self.cursor += 1;
        if self.cursor == 1 && self.digits[0] == 2 && self.digits[1] > 3 {
            self.digits[1] = 3;
            self.show(shared);
        }
        shared.edit.move_to(self.cursor);
        None
    }

    /// Drop the edit without touching the target.
    pub fn abort(&self, shared: &SharedState) {
        shared.edit.end();
        info!("Edit: {:?} aborted", self.target);
    }

    fn committed(&self) -> Time {
        let [h1, h0, m1, m0] = self.digits;
        Time::new(h1 * 10 + h0, m1 * 10 + m0, self.saved_seconds)
    }

    fn show(&self, shared: &SharedState) {
        shared.display.show_digits(self.digits, Some(SEPARATOR_CELL));
    }
}
