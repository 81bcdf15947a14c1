//! Library interface for the uphole unit.
//!
//! Everything here is pure logic: the event queue, the producers, the
//! dispatcher and frame machine, and the alert policy. It builds for the
//! target (`no_std`) and for the host, where `cargo test` exercises it
//! without any hardware.
//!
//! Note: the embedded binary (`main.rs`, `#![no_std]` + `#![no_main]`)
//! links against this crate and adds the board glue under `board/`.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod log;

pub mod alert;
pub mod backlight;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod frame;
pub mod keypad;
pub mod queue;
pub mod shared;
pub mod source;
pub mod time;
pub mod ui;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports
// ═══════════════════════════════════════════════════════════════════════════

pub use alert::{AlertManager, AlertOutcome, PreemptionRule};
pub use dispatch::{DispatchStats, UiCore};
pub use error::Error;
pub use event::{Action, ActionType, PeriodicEvent};
pub use frame::{FrameId, FrameRegistry};
pub use queue::{EventQueue, PriorityPolicy};
pub use shared::UiShared;
pub use source::{EventSender, EventSink, TimerSource};
pub use time::TickTime;
pub use ui::{Tone, Ui};
