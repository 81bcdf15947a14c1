//! User interface collaborator - what the core needs from the hardware.
//!
//! Frame handlers never touch the LCD, buzzer or LEDs directly; they go
//! through `Ui`, implemented by the board glue on target and by a
//! recorder in tests.
//!
//! ## Components
//!
//! - **LCD**: 128×64 monochrome panel with switchable backlight
//! - **Buzzer**: PWM-driven piezo, one tone per cue
//! - **Alarm LED**: lit while an alarm is on screen

use crate::event::AlertEvent;
use crate::frame::{Area, FrameId, FrameState};

/// Audible cues.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tone {
    /// Key press accepted.
    Click,
    /// Confirmation requested / acknowledged.
    Confirm,
    Reminder,
    Alarm,
}

/// Side effects available to frame handlers.
pub trait Ui {
    /// Paint a frame's content into its area.
    fn paint_frame(&mut self, frame: FrameId, area: Area, state: &FrameState);

    /// Paint the alert pop-up.
    fn show_alert(&mut self, area: Area, alert: &AlertEvent);

    fn set_backlight(&mut self, on: bool);

    fn beep(&mut self, tone: Tone);

    fn set_alarm_led(&mut self, on: bool);
}
