//! Button sampling and edge detection.
//!
//! Three physical buttons (active-low with internal pull-up), read as one
//! 3-bit vector per loop iteration:
//!   - OPTION (bit 0) - show clock / advance cursor / choose menu item
//!   - UP     (bit 1) - show on-time / increment / next menu item
//!   - DOWN   (bit 2) - show off-time / decrement / previous menu item
//!
//! A bit reads `1` while its button is up. A click is registered when a
//! bit goes from `0` in the previous sample to `1` now, i.e. when the press
//! completes. Holding OPTION therefore never fires a click before the long
//! press opens the menu.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    Option,
    Up,
    Down,
}

impl Button {
    const fn mask(self) -> u8 {
        match self {
            Button::Option => 0x01,
            Button::Up => 0x02,
            Button::Down => 0x04,
        }
    }
}

/// One raw, active-low sample of the button port.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonSample(u8);

impl ButtonSample {
    const MASK: u8 = 0x07;

    /// Every button up.
    pub const RELEASED: Self = Self(Self::MASK);

    /// From the raw port bits; anything above bit 2 is ignored.
    pub const fn from_port(raw: u8) -> Self {
        Self(raw & Self::MASK)
    }

    /// From individual pin levels (`true` = high = button up).
    pub const fn from_levels(option: bool, up: bool, down: bool) -> Self {
        Self((option as u8) | (up as u8) << 1 | (down as u8) << 2)
    }

    /// A sample with exactly `held` pressed.
    pub fn holding(held: &[Button]) -> Self {
        let mut raw = Self::MASK;
        for b in held {
            raw &= !b.mask();
        }
        Self(raw)
    }

    pub const fn raw(self) -> u8 {
        self.0
    }

    pub const fn is_held(self, button: Button) -> bool {
        self.0 & button.mask() == 0
    }

    pub const fn all_released(self) -> bool {
        self.0 == Self::MASK
    }

    /// `button` was held in `previous` and is up now.
    pub const fn clicked(self, previous: Self, button: Button) -> bool {
        let m = button.mask();
        self.0 & m == m && previous.0 & m == 0
    }
}

impl Default for ButtonSample {
    fn default() -> Self {
        Self::RELEASED
    }
}
