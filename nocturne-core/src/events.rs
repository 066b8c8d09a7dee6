//! Input events raised from interrupt context

/// Input events from the buttons and the real-time clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputEvent {
    /// Up button pressed
    ButtonUp,
    /// Down button pressed
    ButtonDown,
    /// Select button pressed
    ButtonSelect,
    /// RTC interrupt fired (second tick or alarm match)
    ClockTick,
}

impl InputEvent {
    /// Returns true if this came from a button
    pub fn is_button(&self) -> bool {
        !matches!(self, InputEvent::ClockTick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buttons_and_clock() {
        assert!(InputEvent::ButtonUp.is_button());
        assert!(InputEvent::ButtonDown.is_button());
        assert!(InputEvent::ButtonSelect.is_button());
        assert!(!InputEvent::ClockTick.is_button());
    }
}
