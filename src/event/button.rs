//! Button classification carried by PUSH actions.

/// Physical key group, including shift chords.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonType {
    /// Numeric / navigation keypad.
    Keypad,
    /// Dedicated survey key.
    Survey,
    /// Shift pressed and released on its own.
    Shift,
    /// Keypad key with shift held.
    ShiftKeypad,
    /// Survey key with shift held.
    ShiftSurvey,
}

impl ButtonType {
    pub const fn is_shifted(self) -> bool {
        matches!(self, ButtonType::ShiftKeypad | ButtonType::ShiftSurvey)
    }
}

/// How long the key was held.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DepressType {
    Short,
    Long,
}

/// ASCII identity of a key (plain or shift-modified).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonValue(pub u8);

impl ButtonValue {
    pub const UP: ButtonValue = ButtonValue(b'U');
    pub const DOWN: ButtonValue = ButtonValue(b'D');
    pub const ENTER: ButtonValue = ButtonValue(b'E');
    pub const ESCAPE: ButtonValue = ButtonValue(b'X');
    pub const SURVEY: ButtonValue = ButtonValue(b'S');
    pub const SHIFT: ButtonValue = ButtonValue(b'^');
}
