//! Unified error type for the uphole firmware.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.
//!
//! Nothing here is fatal: every error path ends in "drop the event,
//! skip the frame, keep looping".

use crate::frame::FrameId;

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Scheduling
    /// The event queue (or a producer ring) has no free slot.
    QueueFull,

    /// Button events are currently not accepted.
    KeypadDisabled,

    /// No handler is registered for the frame.
    UnknownFrame(FrameId),

    // Downhole link
    /// UART transfer to/from the downhole unit failed.
    Link,

    // Generic
    /// Buffer too small for the requested operation.
    BufferOverflow,
}
