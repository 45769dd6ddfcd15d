//! User interface subsystem - seven-segment display + three buttons.
//!
//! The foreground loop samples the buttons, feeds the sample to
//! [`Ui::step`] and carries out whatever [`Effect`] comes back. The state
//! machine itself does no I/O apart from writing the shared display buffer,
//! so it runs unchanged on the host.
//!
//! ## Modes
//!
//! - **Display**: clock, on-time, off-time or blank; long OPTION press opens
//!   the menu
//! - **Menu**: `SYS` / `ON` / `OFF` / `--` ring
//! - **Edit**: four-digit editor on the time picked in the menu
//!
//! Idle timeout blanks the display mode, aborts an edit and closes the menu.

pub mod buttons;
pub mod editor;
pub mod input_logic;
pub mod menu;

use crate::config::{DISPLAY_LOOP_DELAY_MS, LONG_PRESS_LIMIT, MENU_LOOP_DELAY_MS};
use crate::power_logic::sleep_led_should_be_on;
use crate::shared::{SharedState, TimeTarget};
use crate::storage::TimeSlot;
use crate::time::Time;

pub use buttons::{Button, ButtonSample};
pub use editor::TimeEditor;
pub use menu::MenuItem;

/// What the display shows outside the menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayMode {
    ShowTime,
    ShowOnTime,
    ShowOffTime,
    Blank,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    Display(DisplayMode),
    /// `resume` is the display mode restored when the menu closes.
    Menu { item: MenuItem, resume: DisplayMode },
    Edit {
        editor: TimeEditor,
        item: MenuItem,
        resume: DisplayMode,
    },
}

/// I/O the foreground loop performs on behalf of the state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Effect {
    /// Block until every button is up, then restart the idle countdown.
    WaitForRelease,
    /// Write a new system time to the RTC.
    SetClock(Time),
    /// Re-read the RTC now.
    RefreshClock,
    /// Write an on/off time to durable storage.
    Persist(TimeSlot, Time),
}

/// Outcome of one [`Ui::step`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Step {
    pub effect: Option<Effect>,
    /// The idle countdown was reloaded and the idle timer must run again.
    pub idle_restarted: bool,
}

pub struct Ui {
    mode: Mode,
    last: ButtonSample,
    hold_cycles: u8,
    idle_restarted: bool,
}

impl Ui {
    pub const fn new() -> Self {
        Self {
            mode: Mode::Display(DisplayMode::Blank),
            last: ButtonSample::RELEASED,
            hold_cycles: 0,
            idle_restarted: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn hold_cycles(&self) -> u8 {
        self.hold_cycles
    }

    /// Delay between two loop iterations in the current mode.
    pub fn poll_interval_ms(&self) -> u64 {
        match self.mode {
            Mode::Display(_) => DISPLAY_LOOP_DELAY_MS,
            Mode::Menu { .. } | Mode::Edit { .. } => MENU_LOOP_DELAY_MS,
        }
    }

    /// Level of the sleep indicator LED for the current mode.
    pub fn sleep_led(&self, shared: &SharedState) -> bool {
        sleep_led_should_be_on(
            self.mode == Mode::Display(DisplayMode::Blank),
            shared.light_active(),
        )
    }

    /// One foreground iteration.
    pub fn step(&mut self, sample: ButtonSample, shared: &SharedState) -> Step {
        self.idle_restarted = false;
        let effect = match self.mode {
            Mode::Display(mode) => self.display_step(mode, sample, shared),
            Mode::Menu { item, resume } => self.menu_step(item, resume, sample, shared),
            Mode::Edit {
                editor,
                item,
                resume,
            } => self.edit_step(editor, item, resume, sample, shared),
        };

        // A step that waits for release starts the next one from a clean
        // sample, so the press that triggered it is never seen as a click.
        if effect == Some(Effect::WaitForRelease) {
            self.last = ButtonSample::RELEASED;
        } else {
            self.last = sample;
        }

        Step {
            effect,
            idle_restarted: self.idle_restarted,
        }
    }

    fn restart_idle(&mut self, shared: &SharedState) {
        shared.restart_idle();
        self.idle_restarted = true;
    }

    fn display_step(
        &mut self,
        mut mode: DisplayMode,
        sample: ButtonSample,
        shared: &SharedState,
    ) -> Option<Effect> {
        for (button, next) in [
            (Button::Option, DisplayMode::ShowTime),
            (Button::Up, DisplayMode::ShowOnTime),
            (Button::Down, DisplayMode::ShowOffTime),
        ] {
            if sample.clicked(self.last, button) {
                self.hold_cycles = 0;
                mode = next;
                self.restart_idle(shared);
            }
        }

        if shared.idle_expired() {
            mode = DisplayMode::Blank;
        }

        if sample.is_held(Button::Option) {
            self.hold_cycles = self.hold_cycles.saturating_add(1);
        }

        if self.hold_cycles > LONG_PRESS_LIMIT {
            self.hold_cycles = 0;
            self.open_menu(mode, shared);
            return Some(Effect::WaitForRelease);
        }

        self.mode = Mode::Display(mode);
        match mode {
            DisplayMode::ShowTime => shared.display.show_time(&shared.system_time.load()),
            DisplayMode::ShowOnTime => shared.display.show_time_marked(&shared.on_time.load()),
            DisplayMode::ShowOffTime => {
                shared.display.show_time_marked(&shared.off_time.load())
            }
            DisplayMode::Blank => shared.display.clear(),
        }
        None
    }

    fn open_menu(&mut self, resume: DisplayMode, shared: &SharedState) {
        info!("Menu: open");
        let item = MenuItem::SystemTime;
        shared.display.show_text(item.label());
        self.mode = Mode::Menu { item, resume };
        self.restart_idle(shared);
    }

    /// Leave the menu: back to `resume` with a fresh clock reading and the
    /// edit indicator at its defaults.
    fn close_menu(&mut self, resume: DisplayMode, shared: &SharedState) -> Option<Effect> {
        info!("Menu: close");
        shared.edit.reset();
        self.mode = Mode::Display(resume);
        Some(Effect::RefreshClock)
    }

    fn menu_step(
        &mut self,
        mut item: MenuItem,
        resume: DisplayMode,
        sample: ButtonSample,
        shared: &SharedState,
    ) -> Option<Effect> {
        if shared.idle_expired() {
            return self.close_menu(resume, shared);
        }

        if sample.clicked(self.last, Button::Option) {
            self.restart_idle(shared);
            let Some(target) = item.target() else {
                return self.close_menu(resume, shared);
            };
            let editor = TimeEditor::begin(target, shared.time(target).load(), shared);
            self.mode = Mode::Edit {
                editor,
                item,
                resume,
            };
            return Some(Effect::WaitForRelease);
        }

        if sample.clicked(self.last, Button::Up) {
            self.restart_idle(shared);
            item = item.next();
        }
        if sample.clicked(self.last, Button::Down) {
            self.restart_idle(shared);
            item = item.prev();
        }

        shared.display.show_text(item.label());
        self.mode = Mode::Menu { item, resume };
        None
    }

    fn edit_step(
        &mut self,
        mut editor: TimeEditor,
        item: MenuItem,
        resume: DisplayMode,
        sample: ButtonSample,
        shared: &SharedState,
    ) -> Option<Effect> {
        if shared.idle_expired() {
            editor.abort(shared);
            return self.back_to_menu(item, resume, shared, None);
        }

        if sample.clicked(self.last, Button::Option) {
            self.restart_idle(shared);
            if let Some(time) = editor.advance(shared) {
                let effect = self.commit(editor.target(), time, shared);
                return self.back_to_menu(item, resume, shared, Some(effect));
            }
        }

        if sample.clicked(self.last, Button::Up) {
            self.restart_idle(shared);
            editor.increment(shared);
        }
        if sample.clicked(self.last, Button::Down) {
            self.restart_idle(shared);
            editor.decrement(shared);
        }

        self.mode = Mode::Edit {
            editor,
            item,
            resume,
        };
        None
    }

    fn commit(&self, target: TimeTarget, time: Time, shared: &SharedState) -> Effect {
        match target {
            TimeTarget::System => Effect::SetClock(time),
            TimeTarget::On => {
                shared.on_time.store(time);
                Effect::Persist(TimeSlot::OnTime, time)
            }
            TimeTarget::Off => {
                shared.off_time.store(time);
                Effect::Persist(TimeSlot::OffTime, time)
            }
        }
    }

    fn back_to_menu(
        &mut self,
        item: MenuItem,
        resume: DisplayMode,
        shared: &SharedState,
        effect: Option<Effect>,
    ) -> Option<Effect> {
        shared.display.show_text(item.label());
        self.mode = Mode::Menu { item, resume };
        effect
    }
}

impl Default for Ui {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::BLANK;

    fn press(ui: &mut Ui, shared: &SharedState, button: Button) -> Step {
        ui.step(ButtonSample::holding(&[button]), shared);
        ui.step(ButtonSample::RELEASED, shared)
    }

    #[test]
    fn starts_blank_with_sleep_led() {
        let shared = SharedState::new();
        let mut ui = Ui::new();
        assert_eq!(ui.step(ButtonSample::RELEASED, &shared), Step::default());
        assert_eq!(ui.mode(), Mode::Display(DisplayMode::Blank));
        assert_eq!(shared.display.cells(), [BLANK; 4]);
        assert!(ui.sleep_led(&shared));

        shared.set_light_active(true);
        assert!(!ui.sleep_led(&shared));
    }

    #[test]
    fn buttons_pick_display_mode_and_restart_idle() {
        let shared = SharedState::new();
        shared.system_time.store(Time::new(12, 34, 1));
        shared.on_time.store(Time::new(18, 0, 0));
        shared.off_time.store(Time::new(6, 30, 0));
        let mut ui = Ui::new();

        let step = press(&mut ui, &shared, Button::Option);
        assert!(step.idle_restarted);
        assert!(!shared.idle_expired());
        assert_eq!(ui.mode(), Mode::Display(DisplayMode::ShowTime));
        assert_eq!(shared.display.cells(), [1, 2, 3, 4]);
        assert_eq!(shared.display.decimal_point(), Some(1));
        assert!(!ui.sleep_led(&shared));

        press(&mut ui, &shared, Button::Up);
        assert_eq!(ui.mode(), Mode::Display(DisplayMode::ShowOnTime));
        assert_eq!(shared.display.cells(), [1, 8, 0, 0]);
        assert_eq!(shared.display.decimal_point(), Some(1));

        press(&mut ui, &shared, Button::Down);
        assert_eq!(ui.mode(), Mode::Display(DisplayMode::ShowOffTime));
        assert_eq!(shared.display.cells(), [0, 6, 3, 0]);
    }

    #[test]
    fn holding_a_button_does_not_switch_mode() {
        let shared = SharedState::new();
        let mut ui = Ui::new();
        let step = ui.step(ButtonSample::holding(&[Button::Up]), &shared);
        assert!(!step.idle_restarted);
        assert_eq!(ui.mode(), Mode::Display(DisplayMode::Blank));
    }

    #[test]
    fn idle_timeout_blanks_display() {
        let shared = SharedState::new();
        let mut ui = Ui::new();
        press(&mut ui, &shared, Button::Option);
        assert_eq!(ui.mode(), Mode::Display(DisplayMode::ShowTime));

        shared.expire_idle();
        ui.step(ButtonSample::RELEASED, &shared);
        assert_eq!(ui.mode(), Mode::Display(DisplayMode::Blank));
        assert_eq!(shared.display.cells(), [BLANK; 4]);
        assert_eq!(shared.display.decimal_point(), None);
    }

    #[test]
    fn long_press_opens_menu_after_limit() {
        let shared = SharedState::new();
        let mut ui = Ui::new();
        let held = ButtonSample::holding(&[Button::Option]);

        for _ in 0..LONG_PRESS_LIMIT {
            assert_eq!(ui.step(held, &shared).effect, None);
        }
        assert_eq!(ui.hold_cycles(), LONG_PRESS_LIMIT);

        let step = ui.step(held, &shared);
        assert_eq!(step.effect, Some(Effect::WaitForRelease));
        assert!(step.idle_restarted);
        assert_eq!(ui.hold_cycles(), 0);
        assert_eq!(
            ui.mode(),
            Mode::Menu {
                item: MenuItem::SystemTime,
                resume: DisplayMode::Blank,
            }
        );
        assert_eq!(&shared.display.cells(), b"SYS ");
        assert_eq!(ui.poll_interval_ms(), MENU_LOOP_DELAY_MS);
        assert!(!ui.sleep_led(&shared));
    }

    #[test]
    fn release_after_long_press_is_not_a_click() {
        let shared = SharedState::new();
        let mut ui = Ui::new();
        let held = ButtonSample::holding(&[Button::Option]);
        for _ in 0..=LONG_PRESS_LIMIT {
            ui.step(held, &shared);
        }

        ui.step(ButtonSample::RELEASED, &shared);
        assert!(matches!(ui.mode(), Mode::Menu { .. }));
    }

    #[test]
    fn click_resets_hold_count() {
        let shared = SharedState::new();
        let mut ui = Ui::new();
        let held = ButtonSample::holding(&[Button::Option]);
        for _ in 0..10 {
            ui.step(held, &shared);
        }
        ui.step(ButtonSample::RELEASED, &shared);
        assert_eq!(ui.hold_cycles(), 0);
    }

    #[test]
    fn menu_ring_and_exit() {
        let shared = SharedState::new();
        let mut ui = Ui::new();
        press(&mut ui, &shared, Button::Up);
        let held = ButtonSample::holding(&[Button::Option]);
        for _ in 0..=LONG_PRESS_LIMIT {
            ui.step(held, &shared);
        }

        press(&mut ui, &shared, Button::Down);
        assert_eq!(&shared.display.cells(), b" -- ");
        press(&mut ui, &shared, Button::Up);
        press(&mut ui, &shared, Button::Up);
        assert_eq!(&shared.display.cells(), b"ON  ");
        press(&mut ui, &shared, Button::Down);
        press(&mut ui, &shared, Button::Down);

        let step = press(&mut ui, &shared, Button::Option);
        assert_eq!(step.effect, Some(Effect::RefreshClock));
        assert_eq!(ui.mode(), Mode::Display(DisplayMode::ShowOnTime));
        assert_eq!(shared.edit.cursor(), None);
        assert!(shared.edit.is_visible());
    }

    #[test]
    fn idle_closes_menu() {
        let shared = SharedState::new();
        let mut ui = Ui::new();
        let held = ButtonSample::holding(&[Button::Option]);
        for _ in 0..=LONG_PRESS_LIMIT {
            ui.step(held, &shared);
        }

        shared.expire_idle();
        let step = ui.step(ButtonSample::RELEASED, &shared);
        assert_eq!(step.effect, Some(Effect::RefreshClock));
        assert_eq!(ui.mode(), Mode::Display(DisplayMode::Blank));
    }

    #[test]
    fn edit_commit_returns_effect_per_target() {
        let shared = SharedState::new();
        shared.system_time.store(Time::new(9, 15, 30));
        let mut ui = Ui::new();
        let held = ButtonSample::holding(&[Button::Option]);
        for _ in 0..=LONG_PRESS_LIMIT {
            ui.step(held, &shared);
        }

        let step = press(&mut ui, &shared, Button::Option);
        assert_eq!(step.effect, Some(Effect::WaitForRelease));
        assert!(matches!(ui.mode(), Mode::Edit { .. }));
        press(&mut ui, &shared, Button::Up);
        for _ in 0..3 {
            press(&mut ui, &shared, Button::Option);
        }
        let step = press(&mut ui, &shared, Button::Option);
        assert_eq!(step.effect, Some(Effect::SetClock(Time::new(19, 15, 30))));
        assert_eq!(&shared.display.cells(), b"SYS ");
        // The RTC task owns the system time; the foreground only asks.
        assert_eq!(shared.system_time.load(), Time::new(9, 15, 30));
    }

    #[test]
    fn entering_edit_waits_for_release() {
        let shared = SharedState::new();
        let mut ui = Ui::new();
        let held = ButtonSample::holding(&[Button::Option]);
        for _ in 0..=LONG_PRESS_LIMIT {
            ui.step(held, &shared);
        }

        ui.step(held, &shared);
        let step = ui.step(ButtonSample::RELEASED, &shared);
        assert_eq!(step.effect, Some(Effect::WaitForRelease));

        ui.step(ButtonSample::RELEASED, &shared);
        ui.step(held, &shared);
        match ui.mode() {
            Mode::Edit { editor, .. } => assert_eq!(editor.cursor(), 0),
            other => panic!("expected edit mode, got {other:?}"),
        }
    }

    #[test]
    fn idle_aborts_edit_and_keeps_target() {
        let shared = SharedState::new();
        shared.off_time.store(Time::new(22, 45, 7));
        let mut ui = Ui::new();
        let held = ButtonSample::holding(&[Button::Option]);
        for _ in 0..=LONG_PRESS_LIMIT {
            ui.step(held, &shared);
        }
        press(&mut ui, &shared, Button::Up);
        press(&mut ui, &shared, Button::Up);
        press(&mut ui, &shared, Button::Option);
        press(&mut ui, &shared, Button::Down);

        shared.expire_idle();
        let step = ui.step(ButtonSample::RELEASED, &shared);
        assert_eq!(step.effect, None);
        assert_eq!(shared.off_time.load(), Time::new(22, 45, 7));
        assert_eq!(&shared.display.cells(), b"OFF ");
        assert!(!shared.edit.is_blinking());
    }
}
