//! Downhole link receiver (UARTE0).
//!
//! The downhole unit sends newline-terminated records. Parsing them is
//! someone else's job; here each complete line only tells the UI that
//! fresh telemetry arrived, as a repaint of the home frame.

use defmt::{debug, warn};
use embassy_nrf::peripherals::UARTE0;
use embassy_nrf::uarte::UarteRx;
use heapless::Vec;
use mwd_uphole::config::LINK_LINE_MAX;
use mwd_uphole::event::ScreenTask;
use mwd_uphole::source::EventSink;
use mwd_uphole::{Error, FrameId};

use super::{wake_ui, Sender};

/// Collects bytes until a line terminator.
struct LineBuffer {
    line: Vec<u8, LINK_LINE_MAX>,
    overflowed: bool,
}

impl LineBuffer {
    const fn new() -> Self {
        Self {
            line: Vec::new(),
            overflowed: false,
        }
    }

    /// Feed one byte; returns the line length once a line is complete.
    fn push(&mut self, byte: u8) -> Result<Option<usize>, Error> {
        match byte {
            b'\r' => Ok(None),
            b'\n' => {
                let len = self.line.len();
                let overflowed = core::mem::replace(&mut self.overflowed, false);
                self.line.clear();
                if overflowed {
                    Err(Error::BufferOverflow)
                } else {
                    Ok((len > 0).then_some(len))
                }
            }
            _ if self.overflowed => Ok(None),
            _ => {
                if self.line.push(byte).is_err() {
                    self.overflowed = true;
                }
                Ok(None)
            }
        }
    }
}

/// Receive loop - must be spawned as a dedicated Embassy task.
pub async fn run(mut rx: UarteRx<'static, UARTE0>, mut sender: Sender) -> ! {
    let mut buffer = LineBuffer::new();
    let mut byte = [0u8; 1];

    loop {
        if rx.read(&mut byte).await.is_err() {
            warn!("Link: {}", Error::Link);
            continue;
        }

        match buffer.push(byte[0]) {
            Ok(Some(len)) => {
                debug!("Link: {} byte record", len);
                let now = sender.shared().now();
                match sender.add_screen_event(ScreenTask::Repaint, Some(FrameId::Home), now) {
                    Ok(()) => wake_ui(),
                    Err(e) => warn!("Link: notification dropped: {}", e),
                }
            }
            Ok(None) => {}
            Err(e) => warn!("Link: record discarded: {}", e),
        }
    }
}
