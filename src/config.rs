//! Application-wide constants and compile-time configuration.
//!
//! All timing parameters, queue sizes, scheduling policies and link
//! constants live here so they can be tuned in one place.

use crate::alert::PreemptionRule;
use crate::queue::PriorityPolicy;
use crate::time::TickMask;

// Event queue

/// Total number of events the core queue holds (pending + ready).
pub const EVENT_QUEUE_CAPACITY: usize = 32;

/// Backing size of each producer ring (`heapless::spsc` keeps one slot free,
/// so a ring holds `SOURCE_RING_SIZE - 1` events).
pub const SOURCE_RING_SIZE: usize = 8;

/// Ordering among ready events of different action types.
pub const EVENT_PRIORITY_POLICY: PriorityPolicy = PriorityPolicy::LastDeclaredFirst;

/// Upper bound of events dispatched per call to `UiCore::run_ready`.
pub const MAX_EVENTS_PER_POLL: usize = 16;

/// Follow-up events a single frame handler may schedule.
pub const MAX_FOLLOW_UPS: usize = 4;

// Timebase

/// Length of one low-resolution tick (ms). The `u16` tick counter wraps
/// after 65536 ticks, so scheduling delays must stay below ~327 s.
pub const TICK_RESOLUTION_MS: u32 = 10;

/// Timer boundaries that are turned into TIMER_ELAPSED events.
pub const TIMER_EVENT_MASK: TickMask = TickMask::MS_1000;

// Alerts

/// What happens to the active alert when a more urgent one arrives.
pub const ALERT_PREEMPTION: PreemptionRule = PreemptionRule::QueueBehind;

/// Alerts waiting behind the active one.
pub const MAX_DEFERRED_ALERTS: usize = 4;

/// Drop already-due UI events when an ALARM takes the screen.
pub const ALARM_FLUSHES_READY_QUEUE: bool = true;

// Display

/// Enable automatic backlight power-off after inactivity.
pub const BACKLIGHT_AUTO_OFF_ENABLED: bool = true;

/// Inactivity timeout before the backlight is switched off (ms).
pub const BACKLIGHT_TIMEOUT_MS: u32 = 30_000;

/// Cursor blink half-period on value frames (ms).
pub const CURSOR_BLINK_MS: u32 = 500;

/// Seconds the startup splash stays up before the home frame.
pub const STARTUP_SPLASH_SECS: u16 = 3;

// Keypad

/// Hold time that turns a press into a long press (ms).
pub const KEY_LONG_PRESS_MS: u32 = 1_000;

/// Keypad scan period (ms). Also acts as debounce interval.
pub const KEY_SCAN_MS: u64 = 10;

/// Window in which a key press counts as recent activity (ms).
pub const KEY_ACTIVITY_WINDOW_MS: u32 = 30_000;

// Downhole link (UARTE0)

/// Downhole link baud rate.
pub const LINK_BAUD: u32 = 9_600;

/// Longest line accepted from the downhole unit (bytes).
pub const LINK_LINE_MAX: usize = 128;

// Buzzer

/// Tone frequencies (Hz) and durations (ms).
pub const TONE_CLICK: (u32, u64) = (4_000, 15);
pub const TONE_CONFIRM: (u32, u64) = (2_500, 120);
pub const TONE_REMINDER: (u32, u64) = (2_000, 250);
pub const TONE_ALARM: (u32, u64) = (3_200, 800);

// GPIO pin assignments (uphole board)
//
// These are logical names; the actual `embassy_nrf::peripherals::*` pins
// are selected in `main.rs`.  Adjust for your PCB revision.
//
//   Keypad keys 1..0     → P0.02 .. P0.05, P0.28 .. P0.31, P1.01, P1.02
//   Keypad UP/DOWN       → P1.03, P1.04
//   Keypad ENTER/ESCAPE  → P1.05, P1.06
//   SHIFT key            → P1.07
//   SURVEY key           → P1.08
//   LCD I²C SDA / SCL    → P0.26 / P0.27
//   Downhole link RX/TX  → P0.08 / P0.06
//   Buzzer (PWM0 ch0)    → P0.13
//   Alarm LED            → P0.14
