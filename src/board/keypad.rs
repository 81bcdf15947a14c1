//! Keypad scanning.
//!
//! Sixteen keys, all active-low with internal pull-up:
//!   - 14 keypad keys (digits, UP, DOWN, ENTER, ESCAPE) in `KEYMAP` order
//!   - SHIFT
//!   - SURVEY
//!
//! The task samples every `KEY_SCAN_MS`, lets `KeyScanner` classify the
//! presses and sends them to the UI through its own event ring.

use defmt::{debug, info, warn};
use embassy_nrf::gpio::{AnyPin, Input, Pull};
use embassy_time::{Duration, Instant, Ticker};
use mwd_uphole::config::{KEY_LONG_PRESS_MS, KEY_SCAN_MS};
use mwd_uphole::keypad::{KeyScanner, ScanSample, KEY_COUNT};
use mwd_uphole::source::EventSink;
use mwd_uphole::Error;

use super::{wake_ui, Sender};

pub struct KeypadPins {
    pub keys: [AnyPin; KEY_COUNT],
    pub shift: AnyPin,
    pub survey: AnyPin,
}

/// Run the keypad scan loop forever.
pub async fn run(pins: KeypadPins, mut sender: Sender) -> ! {
    let keys = pins.keys.map(|pin| Input::new(pin, Pull::Up));
    let shift = Input::new(pins.shift, Pull::Up);
    let survey = Input::new(pins.survey, Pull::Up);

    let mut scanner = KeyScanner::new(KEY_LONG_PRESS_MS);
    let mut ticker = Ticker::every(Duration::from_millis(KEY_SCAN_MS));

    loop {
        ticker.next().await;

        let sample = ScanSample {
            keys: keys
                .iter()
                .enumerate()
                .filter(|(_, key)| key.is_low())
                .fold(0u16, |mask, (index, _)| mask | (1 << index)),
            shift: shift.is_low(),
            survey: survey.is_low(),
        };

        let now_ms = Instant::now().as_millis() as u32;
        let Some(press) = scanner.scan(sample, now_ms) else {
            continue;
        };

        info!("Keypad: {}", press);
        match sender.add_button_event(press.button_type, press.depress, press.value) {
            Ok(()) => wake_ui(),
            Err(Error::KeypadDisabled) => debug!("Keypad: locked, press ignored"),
            Err(e) => warn!("Keypad: press dropped: {}", e),
        }
    }
}
