/// Decide whether the sleep indicator LED should be lit.
///
/// The LED marks "display asleep, load off": it is lit only while the
/// display is blanked by the idle timeout and the light window is closed.
pub fn sleep_led_should_be_on(display_blank: bool, light_active: bool) -> bool {
    if !display_blank {
        return false;
    }

    !light_active
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lit_only_when_blank_and_dark() {
        assert!(sleep_led_should_be_on(true, false));
        assert!(!sleep_led_should_be_on(true, true));
        assert!(!sleep_led_should_be_on(false, false));
        assert!(!sleep_led_should_be_on(false, true));
    }
}
