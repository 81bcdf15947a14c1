//! Keypad press classification.
//!
//! The board samples the key lines every `KEY_SCAN_MS`; `KeyScanner`
//! turns those samples into classified presses:
//!
//!   - short press → reported on release
//!   - long press  → reported once, as soon as the hold crosses the
//!     threshold; the release is then swallowed
//!   - SHIFT held during a keypad/survey press → chorded type and the
//!     shifted ASCII value
//!   - SHIFT pressed and released alone → `ButtonType::Shift`
//!
//! Sampling at the scan period doubles as debouncing.

use crate::event::{ButtonType, ButtonValue, DepressType, PeriodicEvent};
use crate::frame::FrameId;
use crate::time::TickTime;

/// Number of keypad keys (shift and survey excluded).
pub const KEY_COUNT: usize = 14;

/// ASCII identity of a keypad key, plain and with SHIFT held.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyDef {
    pub plain: u8,
    pub shifted: u8,
}

const fn key(plain: u8, shifted: u8) -> KeyDef {
    KeyDef { plain, shifted }
}

/// Keypad layout, indexed by bit position in `ScanSample::keys`.
pub const KEYMAP: [KeyDef; KEY_COUNT] = [
    key(b'1', b'A'),
    key(b'2', b'B'),
    key(b'3', b'C'),
    key(b'4', b'F'),
    key(b'5', b'G'),
    key(b'6', b'H'),
    key(b'7', b'I'),
    key(b'8', b'J'),
    key(b'9', b'K'),
    key(b'0', b'.'),
    key(b'U', b'+'),
    key(b'D', b'-'),
    key(b'E', b'='),
    key(b'X', b'<'),
];

/// Raw key line state at one scan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanSample {
    /// Bit `n` set while keypad key `n` is down.
    pub keys: u16,
    pub shift: bool,
    pub survey: bool,
}

/// A classified press, ready to be enqueued.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonPress {
    pub button_type: ButtonType,
    pub depress: DepressType,
    pub value: ButtonValue,
}

impl ButtonPress {
    pub const fn into_event(self, frame: Option<FrameId>, at: TickTime) -> PeriodicEvent {
        PeriodicEvent::button(self.button_type, self.depress, self.value, frame, at)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Held {
    Key(usize),
    Survey,
    Shift,
}

#[derive(Clone, Copy, Debug)]
struct Hold {
    key: Held,
    shifted: bool,
    since_ms: u32,
    long_sent: bool,
}

pub struct KeyScanner {
    hold: Option<Hold>,
    long_press_ms: u32,
}

impl KeyScanner {
    pub const fn new(long_press_ms: u32) -> Self {
        Self {
            hold: None,
            long_press_ms,
        }
    }

    /// Feed one sample taken at `now_ms` (free-running, may wrap).
    pub fn scan(&mut self, sample: ScanSample, now_ms: u32) -> Option<ButtonPress> {
        let Some(mut hold) = self.hold else {
            self.hold = first_down(sample).map(|key| Hold {
                key,
                shifted: sample.shift && key != Held::Shift,
                since_ms: now_ms,
                long_sent: false,
            });
            return None;
        };

        // A key pressed while SHIFT is held turns the hold into a chord.
        if hold.key == Held::Shift {
            if let Some(key) = first_down(ScanSample { shift: false, ..sample }) {
                self.hold = Some(Hold {
                    key,
                    shifted: true,
                    since_ms: now_ms,
                    long_sent: false,
                });
                return None;
            }
        }

        if !is_down(hold.key, sample) {
            self.hold = None;
            return (!hold.long_sent).then(|| classify(hold, DepressType::Short));
        }

        hold.shifted |= sample.shift && hold.key != Held::Shift;
        let held_ms = now_ms.wrapping_sub(hold.since_ms);
        let press = if !hold.long_sent && held_ms >= self.long_press_ms {
            hold.long_sent = true;
            Some(classify(hold, DepressType::Long))
        } else {
            None
        };
        self.hold = Some(hold);
        press
    }

    /// True while a key is being tracked.
    pub fn is_holding(&self) -> bool {
        self.hold.is_some()
    }
}

fn first_down(sample: ScanSample) -> Option<Held> {
    let keys = sample.keys & ((1 << KEY_COUNT) - 1);
    if keys != 0 {
        Some(Held::Key(keys.trailing_zeros() as usize))
    } else if sample.survey {
        Some(Held::Survey)
    } else if sample.shift {
        Some(Held::Shift)
    } else {
        None
    }
}

fn is_down(key: Held, sample: ScanSample) -> bool {
    match key {
        Held::Key(index) => sample.keys & (1 << index) != 0,
        Held::Survey => sample.survey,
        Held::Shift => sample.shift,
    }
}

fn classify(hold: Hold, depress: DepressType) -> ButtonPress {
    let (button_type, value) = match (hold.key, hold.shifted) {
        (Held::Key(index), false) => (ButtonType::Keypad, KEYMAP[index].plain),
        (Held::Key(index), true) => (ButtonType::ShiftKeypad, KEYMAP[index].shifted),
        (Held::Survey, false) => (ButtonType::Survey, ButtonValue::SURVEY.0),
        (Held::Survey, true) => (ButtonType::ShiftSurvey, b's'),
        (Held::Shift, _) => (ButtonType::Shift, ButtonValue::SHIFT.0),
    };
    ButtonPress {
        button_type,
        depress,
        value: ButtonValue(value),
    }
}
