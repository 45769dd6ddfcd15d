//! Integration tests for light-timer host-testable logic.
//!
//! `Device` wires the UI, the clock task and the renderer together the way
//! the firmware does, with fakes standing in for the pins, the RTC and flash.

use std::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin};
use embedded_hal::i2c::ErrorKind;
use embedded_hal_mock::eh1::delay::NoopDelay;
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

use light_timer::config::{BLINK_DIVIDER, DS1307_ADDRESS, LONG_PRESS_LIMIT, RTC_POLL_DIVIDER};
use light_timer::display::SegmentPort;
use light_timer::rtc::{reg, startup_check, Clock, Ds1307};
use light_timer::scheduler::{refresh_display, ClockRequest, ClockTask};
use light_timer::storage::{save_time, Eeprom, EepromImage, TimeSlot};
use light_timer::ui::{Button, ButtonSample, DisplayMode, Effect, Mode, Ui};
use light_timer::{load_window, Result, SharedState, Time};

// ═══════════════════════════════════════════════════════════════════════════
// Fakes
// ═══════════════════════════════════════════════════════════════════════════

struct FakeClock {
    now: Time,
}

impl Clock for FakeClock {
    fn now(&mut self) -> Result<Time> {
        Ok(self.now)
    }

    fn set(&mut self, time: Time) -> Result<()> {
        self.now = time;
        Ok(())
    }
}

#[derive(Default)]
struct Relay {
    high: bool,
}

impl ErrorType for Relay {
    type Error = Infallible;
}

impl OutputPin for Relay {
    fn set_low(&mut self) -> core::result::Result<(), Infallible> {
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Infallible> {
        self.high = true;
        Ok(())
    }
}

/// Remembers which digit-select lines were asserted in the last pass.
#[derive(Default)]
struct SelectLog {
    selected: Vec<usize>,
}

impl SegmentPort for SelectLog {
    fn set_segments(&mut self, _pattern: u8) {}

    fn select(&mut self, digit: Option<usize>) {
        if let Some(d) = digit {
            self.selected.push(d);
        }
    }
}

struct Device {
    shared: SharedState,
    ui: Ui,
    clock_task: ClockTask,
    clock: FakeClock,
    relay: Relay,
    eeprom: EepromImage,
    effects: Vec<Effect>,
}

impl Device {
    fn boot(now: Time, eeprom: EepromImage) -> Self {
        let shared = SharedState::new();
        load_window(&eeprom, &shared).unwrap();
        shared.system_time.store(now);
        Self {
            shared,
            ui: Ui::new(),
            clock_task: ClockTask::new(),
            clock: FakeClock { now },
            relay: Relay::default(),
            eeprom,
            effects: Vec::new(),
        }
    }

    /// One foreground iteration, effects carried out like the firmware does.
    fn step(&mut self, sample: ButtonSample) {
        let step = self.ui.step(sample, &self.shared);
        let Some(effect) = step.effect else {
            return;
        };
        self.effects.push(effect);
        match effect {
            Effect::WaitForRelease => self.shared.restart_idle(),
            Effect::SetClock(time) => self.request(ClockRequest::Set(time)),
            Effect::RefreshClock => self.request(ClockRequest::Refresh),
            Effect::Persist(slot, time) => save_time(&mut self.eeprom, time, slot).unwrap(),
        }
    }

    fn request(&mut self, request: ClockRequest) {
        self.clock_task
            .handle(request, &self.shared, &mut self.clock, &mut self.relay);
    }

    fn press(&mut self, button: Button) {
        self.step(ButtonSample::holding(&[button]));
        self.step(ButtonSample::RELEASED);
    }

    fn long_press_option(&mut self) {
        let held = ButtonSample::holding(&[Button::Option]);
        for _ in 0..=LONG_PRESS_LIMIT {
            self.step(held);
        }
        self.step(ButtonSample::RELEASED);
    }

    fn background_ticks(&mut self, n: u32) {
        for _ in 0..n {
            self.clock_task
                .tick(&self.shared, &mut self.clock, &mut self.relay);
        }
    }

    fn render(&self) -> Vec<usize> {
        let mut log = SelectLog::default();
        refresh_display(&self.shared, &mut log, &mut NoopDelay::new());
        log.selected
    }

    /// From the menu's SYS item, move to `item_steps` items forward and
    /// open the editor.
    fn edit_item(&mut self, item_steps: usize) {
        for _ in 0..item_steps {
            self.press(Button::Up);
        }
        self.press(Button::Option);
    }

    /// Key in `hh:mm` digit by digit from an editor that started at 00:00.
    fn key_in(&mut self, digits: [u8; 4]) {
        for d in digits {
            for _ in 0..d {
                self.press(Button::Up);
            }
            self.press(Button::Option);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Programming the window
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn programmed_on_time_is_persisted_and_survives_reboot() {
    let mut dev = Device::boot(Time::new(12, 0, 0), EepromImage::erased());

    dev.long_press_option();
    assert_eq!(&dev.shared.display.cells(), b"SYS ");

    dev.edit_item(1);
    dev.key_in([1, 8, 3, 0]);

    assert_eq!(dev.shared.on_time.load(), Time::new(18, 30, 0));
    assert_eq!(
        dev.effects.last(),
        Some(&Effect::Persist(TimeSlot::OnTime, Time::new(18, 30, 0)))
    );
    assert!(dev.eeprom.is_dirty());

    let rebooted = Device::boot(
        Time::new(12, 0, 0),
        EepromImage::from_bytes(dev.eeprom.as_bytes()),
    );
    assert_eq!(rebooted.shared.on_time.load(), Time::new(18, 30, 0));
    assert_eq!(rebooted.shared.off_time.load(), Time::MIDNIGHT);
}

#[test]
fn window_switches_relay_and_sleep_led() {
    let mut eeprom = EepromImage::erased();
    save_time(&mut eeprom, Time::new(18, 0, 0), TimeSlot::OnTime).unwrap();
    save_time(&mut eeprom, Time::new(23, 0, 0), TimeSlot::OffTime).unwrap();
    let mut dev = Device::boot(Time::new(17, 59, 59), eeprom);

    dev.step(ButtonSample::RELEASED);
    dev.background_ticks(u32::from(RTC_POLL_DIVIDER));
    assert!(!dev.relay.high);
    assert!(dev.ui.sleep_led(&dev.shared));

    dev.clock.now = Time::new(18, 0, 0);
    dev.background_ticks(u32::from(RTC_POLL_DIVIDER));
    assert!(dev.relay.high);
    assert!(dev.shared.light_active());
    assert!(!dev.ui.sleep_led(&dev.shared));
}

#[test]
fn setting_system_time_goes_through_clock_task() {
    let mut eeprom = EepromImage::erased();
    save_time(&mut eeprom, Time::new(6, 0, 0), TimeSlot::OnTime).unwrap();
    save_time(&mut eeprom, Time::new(8, 0, 0), TimeSlot::OffTime).unwrap();
    let mut dev = Device::boot(Time::new(0, 0, 42), eeprom);

    dev.long_press_option();
    dev.edit_item(0);
    dev.key_in([0, 7, 1, 5]);

    assert_eq!(dev.clock.now, Time::new(7, 15, 0));
    assert_eq!(dev.shared.system_time.load(), Time::new(7, 15, 0));
    assert!(dev.relay.high);
}

#[test]
fn hour_entry_is_clamped_to_twenty_three() {
    let mut dev = Device::boot(Time::new(19, 0, 0), EepromImage::erased());
    dev.shared.off_time.store(Time::new(19, 45, 0));

    dev.long_press_option();
    dev.edit_item(2);
    // 19 -> 29 on the tens digit, then advancing clamps the units to 3.
    dev.press(Button::Up);
    dev.press(Button::Option);
    assert_eq!(dev.shared.display.cells()[..2], [2, 3]);
    dev.press(Button::Option);
    dev.press(Button::Option);
    dev.press(Button::Option);

    assert_eq!(dev.shared.off_time.load(), Time::new(23, 45, 0));
}

#[test]
fn corrupted_stored_hour_is_edited_back_into_range() {
    let mut eeprom = EepromImage::erased();
    save_time(&mut eeprom, Time::new(6, 30, 0), TimeSlot::OnTime).unwrap();
    eeprom.write_byte(2, 0xFE).unwrap();
    let mut dev = Device::boot(Time::new(12, 0, 0), eeprom);
    assert_eq!(dev.shared.on_time.load(), Time::new(254, 30, 0));

    dev.long_press_option();
    dev.edit_item(1);
    assert_eq!(dev.shared.display.cells(), [2, 3, 3, 0]);

    dev.press(Button::Option);
    for _ in 0..5 {
        dev.press(Button::Up);
    }
    for _ in 0..3 {
        dev.press(Button::Option);
    }

    assert_eq!(dev.shared.on_time.load(), Time::new(20, 30, 0));
    assert_eq!(dev.eeprom.as_bytes()[..3], [0, 30, 20]);
}

// ═══════════════════════════════════════════════════════════════════════════
// Idle timeout
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn idle_timeout_abandons_edit_without_writing() {
    let mut eeprom = EepromImage::erased();
    save_time(&mut eeprom, Time::new(20, 15, 9), TimeSlot::OffTime).unwrap();
    eeprom.mark_clean();
    let mut dev = Device::boot(Time::new(12, 0, 0), eeprom);

    dev.long_press_option();
    dev.edit_item(2);
    dev.press(Button::Down);
    dev.press(Button::Option);
    dev.press(Button::Up);

    while dev.shared.tick_idle() {}
    dev.step(ButtonSample::RELEASED);
    assert_eq!(&dev.shared.display.cells(), b"OFF ");

    dev.step(ButtonSample::RELEASED);
    assert_eq!(dev.ui.mode(), Mode::Display(DisplayMode::Blank));
    dev.step(ButtonSample::RELEASED);
    assert_eq!(dev.shared.display.cells(), [0xFF; 4]);

    assert_eq!(dev.shared.off_time.load(), Time::new(20, 15, 9));
    assert!(!dev.eeprom.is_dirty());
    assert!(!dev
        .effects
        .iter()
        .any(|e| matches!(e, Effect::Persist(..) | Effect::SetClock(_))));
}

// ═══════════════════════════════════════════════════════════════════════════
// Rendering
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn edit_cursor_blinks_on_display() {
    let mut dev = Device::boot(Time::new(10, 0, 0), EepromImage::erased());
    dev.long_press_option();
    dev.edit_item(1);
    assert_eq!(dev.render(), vec![0, 1, 2, 3]);

    dev.background_ticks(u32::from(BLINK_DIVIDER));
    assert_eq!(dev.render(), vec![1, 2, 3]);

    dev.press(Button::Option);
    assert_eq!(dev.render(), vec![0, 2, 3]);
}

#[test]
fn menu_exit_restores_steady_display() {
    let mut dev = Device::boot(Time::new(10, 0, 0), EepromImage::erased());
    dev.press(Button::Option);
    dev.long_press_option();
    dev.press(Button::Down);
    assert_eq!(&dev.shared.display.cells(), b" -- ");

    dev.press(Button::Option);
    assert_eq!(dev.effects.last(), Some(&Effect::RefreshClock));
    assert_eq!(dev.ui.mode(), Mode::Display(DisplayMode::ShowTime));

    dev.step(ButtonSample::RELEASED);
    assert_eq!(dev.shared.display.cells(), [1, 0, 0, 0]);
    assert_eq!(dev.render(), vec![0, 1, 2, 3]);
}

// ═══════════════════════════════════════════════════════════════════════════
// Startup against the DS1307
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn flat_backup_cell_resets_clock_at_boot() {
    let expectations = [
        I2cTransaction::write_read(DS1307_ADDRESS, vec![reg::SECONDS], vec![0x80]),
        I2cTransaction::write(DS1307_ADDRESS, vec![reg::SECONDS, 0x00]),
        I2cTransaction::write_read(DS1307_ADDRESS, vec![reg::SECONDS], vec![0x00, 0xA5, 0x45]),
        I2cTransaction::write(
            DS1307_ADDRESS,
            vec![reg::SECONDS, 0x80, 0x00, 0x00, 0x01, 0x01, 0x01, 0x15],
        ),
        I2cTransaction::write(DS1307_ADDRESS, vec![reg::SECONDS, 0x00]),
    ];
    let mut rtc = Ds1307::new(I2cMock::new(&expectations));

    rtc.start_oscillator().unwrap();
    assert_eq!(startup_check(&mut rtc, false), Ok(Time::MIDNIGHT));
    rtc.release().done();
}

#[test]
fn dead_bus_keeps_last_time_on_display() {
    let expectations = [
        I2cTransaction::write_read(DS1307_ADDRESS, vec![reg::SECONDS], vec![0, 0, 0])
            .with_error(ErrorKind::Other),
    ];
    let mut rtc = Ds1307::new(I2cMock::new(&expectations));
    let shared = SharedState::new();
    shared.system_time.store(Time::new(9, 41, 0));
    let mut relay = Relay::default();

    ClockTask::new().poll(&shared, &mut rtc, &mut relay);
    assert_eq!(shared.system_time.load(), Time::new(9, 41, 0));
    rtc.release().done();
}
