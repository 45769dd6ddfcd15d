/// Move selection one item back, wrapping from the first item to the last.
pub fn select_prev(selected: usize, item_count: usize) -> usize {
    if selected == 0 {
        item_count.saturating_sub(1)
    } else {
        selected - 1
    }
}

/// Move selection one item forward, wrapping from the last item to the first.
pub fn select_next(selected: usize, item_count: usize) -> usize {
    if selected + 1 < item_count {
        selected + 1
    } else {
        0
    }
}

/// Step a digit up within `0..=max`, wrapping to zero.
pub fn digit_up(value: u8, max: u8) -> u8 {
    if value < max {
        value + 1
    } else {
        0
    }
}

/// Step a digit down within `0..=max`, wrapping to `max`.
pub fn digit_down(value: u8, max: u8) -> u8 {
    if value != 0 {
        value - 1
    } else {
        max
    }
}
