//! Four-digit seven-segment display - shared buffer and multiplexer.
//!
//! ## Components
//!
//! - **Buffer**: four cells plus a decimal-point marker, written by the
//!   foreground and read by the refresh task
//! - **Edit indicator**: cursor cell and blink phase while a time is edited
//! - **Segments**: symbol to segment-pattern table
//! - **Render**: one multiplex pass onto a [`render::SegmentPort`]

pub mod buffer;
pub mod render;
pub mod segments;

pub use buffer::{DisplayBuffer, EditIndicator, BLANK};
pub use render::{render, SegmentPort};
