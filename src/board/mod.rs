//! Board glue for the uphole unit (nRF52840).
//!
//! Each producer task owns the sending half of its own ring and pokes
//! `WAKE` after enqueueing; the UI task owns the receiving halves.

pub mod display;
pub mod keypad;
pub mod link;
pub mod tick;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use heapless::spsc::{Consumer, Producer};
use mwd_uphole::config::SOURCE_RING_SIZE;
use mwd_uphole::source::EventSender;
use mwd_uphole::PeriodicEvent;

pub type RingProducer = Producer<'static, PeriodicEvent, SOURCE_RING_SIZE>;
pub type RingConsumer = Consumer<'static, PeriodicEvent, SOURCE_RING_SIZE>;
pub type Sender = EventSender<'static, SOURCE_RING_SIZE>;

/// Raised by any producer that enqueued something.
pub static WAKE: Signal<CriticalSectionRawMutex, ()> = Signal::new();

pub fn wake_ui() {
    WAKE.signal(());
}
