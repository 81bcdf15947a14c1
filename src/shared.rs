//! State shared between interrupt-side producers and the UI consumer.
//!
//! Every field is a single scalar with one writer, so plain atomic
//! load/store is all the synchronisation needed. One instance is created
//! at boot (a `static` in the firmware, a local in tests) and handed to
//! producers and the core by reference.

use core::sync::atomic::{AtomicBool, AtomicU16, Ordering};

use crate::time::{ticks_from_millis, TickClock, TickTime};

pub struct UiShared {
    pub clock: TickClock,
    keypad_allowed: AtomicBool,
    event_flag: AtomicBool,
    key_seen: AtomicBool,
    last_key: AtomicU16,
}

impl UiShared {
    pub const fn new() -> Self {
        Self {
            clock: TickClock::new(),
            keypad_allowed: AtomicBool::new(true),
            event_flag: AtomicBool::new(false),
            key_seen: AtomicBool::new(false),
            last_key: AtomicU16::new(0),
        }
    }

    pub fn now(&self) -> TickTime {
        self.clock.now()
    }

    /// Gate for new button events (cleared during calibration etc.).
    pub fn allow_keypad_actions(&self, allowed: bool) {
        self.keypad_allowed.store(allowed, Ordering::Release);
    }

    pub fn keypad_allowed(&self) -> bool {
        self.keypad_allowed.load(Ordering::Acquire)
    }

    pub fn set_event_flag(&self) {
        self.event_flag.store(true, Ordering::Release);
    }

    pub fn reset_event_flag(&self) {
        self.event_flag.store(false, Ordering::Release);
    }

    pub fn event_flag(&self) -> bool {
        self.event_flag.load(Ordering::Acquire)
    }

    /// Remember when the last button event was accepted.
    pub fn record_key(&self, at: TickTime) {
        self.last_key.store(at.0, Ordering::Release);
        self.key_seen.store(true, Ordering::Release);
    }

    /// When the last button event was accepted; `None` if no key since boot.
    pub fn last_key(&self) -> Option<TickTime> {
        self.key_seen
            .load(Ordering::Acquire)
            .then(|| TickTime(self.last_key.load(Ordering::Acquire)))
    }

    /// Ticks since the last accepted key; `None` if no key since boot.
    pub fn idle_ticks(&self, now: TickTime) -> Option<u16> {
        self.last_key().map(|last| now.since(last))
    }

    /// True if a key was accepted within `window_ms` of `now`.
    pub fn ui_key_activity(&self, now: TickTime, window_ms: u32) -> bool {
        self.idle_ticks(now)
            .is_some_and(|idle| idle < ticks_from_millis(window_ms))
    }
}

impl Default for UiShared {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keypad_gate_defaults_open() {
        let shared = UiShared::new();
        assert!(shared.keypad_allowed());
        shared.allow_keypad_actions(false);
        assert!(!shared.keypad_allowed());
    }

    #[test]
    fn event_flag_toggles() {
        let shared = UiShared::new();
        assert!(!shared.event_flag());
        shared.set_event_flag();
        assert!(shared.event_flag());
        shared.reset_event_flag();
        assert!(!shared.event_flag());
    }

    #[test]
    fn key_activity_window() {
        let shared = UiShared::new();
        assert!(!shared.ui_key_activity(TickTime(0), 1_000));
        shared.record_key(TickTime(0xFFF0));
        // 0xFFF0 -> 0x0010 is 32 ticks (320 ms) across the wrap.
        assert!(shared.ui_key_activity(TickTime(0x0010), 1_000));
        assert!(!shared.ui_key_activity(TickTime(0x0100), 1_000));
        assert_eq!(shared.idle_ticks(TickTime(0x0010)), Some(32));
        assert_eq!(shared.last_key(), Some(TickTime(0xFFF0)));
    }
}
