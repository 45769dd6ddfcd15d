//! nRF52840 pin adapters for the display, buttons and reset probe.
//!
//! Pin assignments are listed in `config.rs`.

use defmt::{debug, info};
use embassy_nrf::gpio::{Input, Level, Output};
use embassy_nrf::pac;
use embassy_time::{Duration, Timer};
use embedded_hal::delay::DelayNs;

use light_timer::config::{CELL_COUNT, RELEASE_GUARD_MS, RELEASE_POLL_MS, RELEASE_SETTLE_MS};
use light_timer::display::SegmentPort;
use light_timer::ui::ButtonSample;

/// Segment lines a..g + dp and the four digit-select lines.
pub struct SegmentPins {
    segments: [Output<'static>; 8],
    digits: [Output<'static>; CELL_COUNT],
}

impl SegmentPins {
    pub fn new(segments: [Output<'static>; 8], digits: [Output<'static>; CELL_COUNT]) -> Self {
        Self { segments, digits }
    }
}

impl SegmentPort for SegmentPins {
    fn set_segments(&mut self, pattern: u8) {
        for (bit, pin) in self.segments.iter_mut().enumerate() {
            pin.set_level(Level::from(pattern & (1 << bit) != 0));
        }
    }

    fn select(&mut self, digit: Option<usize>) {
        for (index, pin) in self.digits.iter_mut().enumerate() {
            pin.set_level(Level::from(digit == Some(index)));
        }
    }
}

/// The OPTION / UP / DOWN buttons (active-low, pulled up).
pub struct ButtonPanel {
    option: Input<'static>,
    up: Input<'static>,
    down: Input<'static>,
}

impl ButtonPanel {
    pub fn new(option: Input<'static>, up: Input<'static>, down: Input<'static>) -> Self {
        Self { option, up, down }
    }

    pub fn read(&self) -> ButtonSample {
        ButtonSample::from_levels(self.option.is_high(), self.up.is_high(), self.down.is_high())
    }

    /// Block until every button is up, then let contacts settle.
    pub async fn wait_for_release(&self) {
        while !self.read().all_released() {
            Timer::after(Duration::from_millis(RELEASE_POLL_MS)).await;
        }
        Timer::after(Duration::from_millis(RELEASE_SETTLE_MS + RELEASE_GUARD_MS)).await;
        debug!("Buttons: released");
    }
}

/// POWER.RESETREAS reads zero after a power-on or brownout reset.
const RESETREAS_NONE: u32 = 0;

/// Report whether this boot followed a supply dip.
///
/// The nRF52840 does not tell a brownout reset apart from a power-on
/// reset, so the probe also arms the power-failure comparator and checks
/// whether the supply is below its threshold right now.
pub fn brownout_detected<D: DelayNs>(delay: &mut D) -> bool {
    let power = pac::POWER;
    let reason = power.resetreas().read().0;
    // Reset reasons are sticky until written back.
    power.resetreas().write_value(pac::power::regs::Resetreas(reason));

    power.events_pofwarn().write_value(0);
    power.pofcon().write(|w| {
        w.set_pof(true);
        w.set_threshold(pac::power::vals::Threshold::V28);
    });
    delay.delay_us(100);
    let sagging = power.events_pofwarn().read() != 0;
    power.pofcon().write(|w| w.set_pof(false));

    info!("Reset: reason={=u32:#x} supply_low={}", reason, sagging);
    reason == RESETREAS_NONE && sagging
}
