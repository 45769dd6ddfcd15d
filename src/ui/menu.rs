//! Configuration menu items.

use super::input_logic::{select_next, select_prev};
use crate::shared::TimeTarget;

/// Entries of the configuration menu, arranged as a ring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuItem {
    SystemTime,
    OnTime,
    OffTime,
    Exit,
}

impl MenuItem {
    const RING: [MenuItem; 4] = [
        MenuItem::SystemTime,
        MenuItem::OnTime,
        MenuItem::OffTime,
        MenuItem::Exit,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Self {
        Self::RING[select_next(self.index(), Self::RING.len())]
    }

    pub fn prev(self) -> Self {
        Self::RING[select_prev(self.index(), Self::RING.len())]
    }

    /// Four-character label shown while the item is selected.
    pub const fn label(self) -> &'static [u8; 4] {
        match self {
            MenuItem::SystemTime => b"SYS ",
            MenuItem::OnTime => b"ON  ",
            MenuItem::OffTime => b"OFF ",
            MenuItem::Exit => b" -- ",
        }
    }

    /// Time value edited by this item, `None` for Exit.
    pub const fn target(self) -> Option<TimeTarget> {
        match self {
            MenuItem::SystemTime => Some(TimeTarget::System),
            MenuItem::OnTime => Some(TimeTarget::On),
            MenuItem::OffTime => Some(TimeTarget::Off),
            MenuItem::Exit => None,
        }
    }
}
