//! Backlight auto-off.
//!
//! Every accepted key arms a check one timeout later and nothing ever
//! cancels those checks. When one fires it measures from the most recent
//! activity instead of from the key that armed it, so checks overtaken by
//! a newer key find the panel still in use and leave it lit.

use crate::time::TickTime;

/// True when the panel has been idle for at least `timeout_ticks`.
///
/// `last_activity` is the last accepted key, or boot if there was none.
/// Idle spans are measured on the wrapping tick counter and stay correct
/// across a wrap.
pub fn backlight_expired(last_activity: TickTime, now: TickTime, timeout_ticks: u16) -> bool {
    now.since(last_activity) >= timeout_ticks
}

#[cfg(test)]
mod tests {
    use super::backlight_expired;
    use crate::time::TickTime;

    const TIMEOUT: u16 = 3_000;

    #[test]
    fn expires_exactly_at_timeout() {
        let key = TickTime(1_000);
        assert!(!backlight_expired(key, TickTime(3_999), TIMEOUT));
        assert!(backlight_expired(key, TickTime(4_000), TIMEOUT));
    }

    #[test]
    fn check_armed_by_older_key_is_stale() {
        // First key at 1000 armed a check for 4000; a second key at 2500
        // moved the activity forward.
        let newest = TickTime(2_500);
        assert!(!backlight_expired(newest, TickTime(4_000), TIMEOUT));
        assert!(backlight_expired(newest, TickTime(5_500), TIMEOUT));
    }

    #[test]
    fn idle_span_survives_counter_wrap() {
        let key = TickTime(0xFF00);
        // 0xFF00 + 2816 ticks wraps to 0x0A00.
        assert!(!backlight_expired(key, TickTime(0x0A00), TIMEOUT));
        // 0xFF00 + 3072 ticks wraps to 0x0B00.
        assert!(backlight_expired(key, TickTime(0x0B00), TIMEOUT));
    }

    #[test]
    fn key_at_check_time_keeps_light() {
        let now = TickTime(0x8000);
        assert!(!backlight_expired(now, now, TIMEOUT));
    }
}
