//! Seven-segment character table.
//!
//! Bit layout of a pattern (common-cathode, 1 = lit):
//! ```text
//!    aaa        bit 0 = a   bit 4 = e
//!   f   b       bit 1 = b   bit 5 = f
//!    ggg        bit 2 = c   bit 6 = g
//!   e   c       bit 3 = d   bit 7 = dp
//!    ddd  dp
//! ```

/// Decimal point segment.
pub const DECIMAL_POINT: u8 = 0x80;

const DIGITS: [u8; 10] = [0x3F, 0x06, 0x5B, 0x4F, 0x66, 0x6D, 0x7D, 0x07, 0x7F, 0x6F];

/// Segment pattern for a cell value.
///
/// Digit values `0..=9` and ASCII `'0'..='9'` map to numerals; a small set
/// of ASCII letters is supported for menu labels. Anything else, including
/// [`super::BLANK`], lights nothing.
pub fn pattern(value: u8) -> u8 {
    match value {
        0..=9 => DIGITS[usize::from(value)],
        b'0'..=b'9' => DIGITS[usize::from(value - b'0')],
        b'S' => DIGITS[5],
        b'O' => DIGITS[0],
        b'D' => 0x5E,
        b'E' => 0x79,
        b'F' => 0x71,
        b'I' => 0x04,
        b'M' | b'N' => 0x54,
        b'T' => 0x78,
        b'X' => 0x76,
        b'Y' => 0x6E,
        b'-' => 0x40,
        _ => 0x00,
    }
}
