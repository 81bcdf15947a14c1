//! Event producers.
//!
//! Each interrupt-side source owns the producer half of its own
//! `heapless::spsc` ring; the UI task owns the consumer halves and merges
//! them into the core queue. No locks, no shared queue storage.
//!
//! ```text
//!   tick ISR ──► TimerSource ──► ring ─┐
//!   keypad   ──► EventSender ──► ring ─┼─► UiCore::merge_from ─► EventQueue
//!   link RX  ──► EventSender ──► ring ─┘
//! ```

use heapless::spsc::Producer;

use crate::error::Error;
use crate::event::{AlertEvent, ButtonType, ButtonValue, DepressType, PeriodicEvent, ScreenTask};
use crate::frame::FrameId;
use crate::shared::UiShared;
use crate::time::{TickDivider, TickMask, TickPeriod, TickTime};

/// Anything that accepts periodic events.
///
/// Implemented by the producer rings and by `UiCore` itself, so frame
/// code and producers share the same helpers.
pub trait EventSink {
    fn add_periodic_event(&mut self, event: PeriodicEvent) -> Result<(), Error>;

    fn shared(&self) -> &UiShared;

    /// Enqueue a key press for the active frame.
    fn add_button_event(
        &mut self,
        button_type: ButtonType,
        depress: DepressType,
        value: ButtonValue,
    ) -> Result<(), Error> {
        self.add_button_event_with_frame(button_type, depress, value, None)
    }

    /// Enqueue a key press for a specific frame.
    ///
    /// Refused while the keypad gate is closed. On success the activity
    /// flag is raised and the key time recorded.
    fn add_button_event_with_frame(
        &mut self,
        button_type: ButtonType,
        depress: DepressType,
        value: ButtonValue,
        frame: Option<FrameId>,
    ) -> Result<(), Error> {
        let (allowed, now) = {
            let shared = self.shared();
            (shared.keypad_allowed(), shared.now())
        };
        if !allowed {
            return Err(Error::KeypadDisabled);
        }
        self.add_periodic_event(PeriodicEvent::button(
            button_type,
            depress,
            value,
            frame,
            now,
        ))?;
        let shared = self.shared();
        shared.set_event_flag();
        shared.record_key(now);
        Ok(())
    }

    fn add_screen_event(
        &mut self,
        task: ScreenTask,
        frame: Option<FrameId>,
        trigger_time: TickTime,
    ) -> Result<(), Error> {
        self.add_periodic_event(PeriodicEvent::screen(task, frame, trigger_time))
    }

    fn add_alert_event(&mut self, alert: AlertEvent) -> Result<(), Error> {
        let now = self.shared().now();
        self.add_periodic_event(PeriodicEvent::alert(alert, now))
    }

    fn add_timer_event(&mut self, period: TickPeriod, frame: Option<FrameId>) -> Result<(), Error> {
        let now = self.shared().now();
        self.add_periodic_event(PeriodicEvent::timer(period, frame, now))
    }
}

/// Producer half of one source ring.
pub struct EventSender<'a, const N: usize> {
    producer: Producer<'a, PeriodicEvent, N>,
    shared: &'a UiShared,
}

impl<'a, const N: usize> EventSender<'a, N> {
    pub fn new(producer: Producer<'a, PeriodicEvent, N>, shared: &'a UiShared) -> Self {
        Self { producer, shared }
    }

    pub fn is_full(&self) -> bool {
        !self.producer.ready()
    }
}

impl<const N: usize> EventSink for EventSender<'_, N> {
    fn add_periodic_event(&mut self, event: PeriodicEvent) -> Result<(), Error> {
        self.producer.enqueue(event).map_err(|_| Error::QueueFull)
    }

    fn shared(&self) -> &UiShared {
        self.shared
    }
}

/// Turns 1 ms hardware ticks into clock advances and TIMER_ELAPSED events.
pub struct TimerSource<'a, const N: usize> {
    sender: EventSender<'a, N>,
    divider: TickDivider,
    mask: TickMask,
    dropped: u32,
}

impl<'a, const N: usize> TimerSource<'a, N> {
    pub fn new(sender: EventSender<'a, N>, mask: TickMask) -> Self {
        Self {
            sender,
            divider: TickDivider::new(),
            mask,
            dropped: 0,
        }
    }

    /// Call once per millisecond. Returns the boundaries crossed.
    pub fn on_millisecond(&mut self) -> TickMask {
        let crossed = self.divider.on_millisecond();
        if crossed.contains(TickPeriod::Ms10) {
            self.sender.shared().clock.advance();
        }
        for period in TickPeriod::ALL {
            if !(crossed.contains(period) && self.mask.contains(period)) {
                continue;
            }
            if self.sender.add_timer_event(period, None).is_err() {
                self.dropped = self.dropped.wrapping_add(1);
            }
        }
        crossed
    }

    /// Timer events lost to a full ring.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use heapless::spsc::Queue;

    use super::*;
    use crate::dispatch::UiCore;
    use crate::event::{Action, AlarmPriority, AlertType};
    use crate::frame::FrameRegistry;

    #[test]
    fn closed_keypad_gate_rejects_pushes() {
        let shared = UiShared::new();
        let mut ring: Queue<PeriodicEvent, 4> = Queue::new();
        let (producer, consumer) = ring.split();
        let mut sender = EventSender::new(producer, &shared);

        shared.allow_keypad_actions(false);
        assert_eq!(
            sender.add_button_event(ButtonType::Keypad, DepressType::Short, ButtonValue(b'1')),
            Err(Error::KeypadDisabled)
        );
        assert_eq!(consumer.len(), 0);
        assert!(!shared.event_flag());
        assert_eq!(shared.idle_ticks(shared.now()), None);
    }

    #[test]
    fn accepted_push_is_stamped_and_recorded() {
        let shared = UiShared::new();
        shared.clock.set(TickTime(42));
        let mut ring: Queue<PeriodicEvent, 4> = Queue::new();
        let (producer, mut consumer) = ring.split();
        let mut sender = EventSender::new(producer, &shared);

        sender
            .add_button_event_with_frame(
                ButtonType::Survey,
                DepressType::Long,
                ButtonValue::SURVEY,
                Some(FrameId::Home),
            )
            .unwrap();

        let event = consumer.dequeue().unwrap();
        assert_eq!(event.trigger_time, TickTime(42));
        assert!(matches!(event.action, Action::Push(p) if p.frame == Some(FrameId::Home)));
        assert!(shared.event_flag());
        assert_eq!(shared.idle_ticks(TickTime(50)), Some(8));
    }

    #[test]
    fn full_ring_reports_queue_full() {
        let shared = UiShared::new();
        // spsc keeps one slot free: capacity 2 for N = 3.
        let mut ring: Queue<PeriodicEvent, 3> = Queue::new();
        let (producer, _consumer) = ring.split();
        let mut sender = EventSender::new(producer, &shared);
        let alert = AlertEvent::new(AlertType::Reminder, AlarmPriority::Low, 0, 0);

        assert_eq!(sender.add_alert_event(alert), Ok(()));
        assert_eq!(sender.add_alert_event(alert), Ok(()));
        assert!(sender.is_full());
        assert_eq!(sender.add_alert_event(alert), Err(Error::QueueFull));
    }

    #[test]
    fn timer_source_advances_clock_and_emits_masked_periods() {
        let shared = UiShared::new();
        let mut ring: Queue<PeriodicEvent, 8> = Queue::new();
        let (producer, mut consumer) = ring.split();
        let mut timer = TimerSource::new(EventSender::new(producer, &shared), TickMask::MS_1000);

        for _ in 0..1000 {
            timer.on_millisecond();
        }
        assert_eq!(shared.now(), TickTime(100));
        assert_eq!(
            consumer.dequeue(),
            Some(PeriodicEvent::timer(TickPeriod::Ms1000, None, TickTime(100)))
        );
        assert_eq!(consumer.dequeue(), None);
        assert_eq!(timer.dropped(), 0);
    }

    #[test]
    fn timer_source_counts_drops() {
        let shared = UiShared::new();
        let mut ring: Queue<PeriodicEvent, 2> = Queue::new();
        let (producer, _consumer) = ring.split();
        let mut timer = TimerSource::new(EventSender::new(producer, &shared), TickMask::MS_10);

        for _ in 0..30 {
            timer.on_millisecond();
        }
        // One slot usable: first 10 ms event fits, the next two are lost.
        assert_eq!(timer.dropped(), 2);
    }

    #[test]
    fn ring_hands_events_across_threads_exactly_once() {
        const COUNT: u16 = 5_000;
        let expected = |at: u16| {
            let frame = FrameId::from_index(at as usize % FrameId::COUNT);
            PeriodicEvent::screen(ScreenTask::Repaint, frame, TickTime(at))
        };

        let shared = UiShared::new();
        // Every trigger below is already due.
        shared.clock.set(TickTime(COUNT));
        let mut ring: Queue<PeriodicEvent, 8> = Queue::new();
        let (producer, mut consumer) = ring.split();
        let mut core = UiCore::<16>::new(FrameRegistry::standard(), &shared);
        let mut received = std::vec::Vec::new();

        std::thread::scope(|scope| {
            let shared = &shared;
            scope.spawn(move || {
                let mut sender = EventSender::new(producer, shared);
                for at in 0..COUNT {
                    while sender.add_periodic_event(expected(at)).is_err() {
                        std::thread::yield_now();
                    }
                }
            });

            while received.len() < COUNT as usize {
                core.merge_from(&mut consumer);
                while let Some(event) = core.get_next_periodic_event() {
                    received.push(event);
                }
            }
        });

        assert_eq!(received.len(), COUNT as usize);
        for (at, event) in received.iter().enumerate() {
            assert_eq!(*event, expected(at as u16));
        }
        assert_eq!(consumer.len(), 0);
        assert_eq!(core.stats().dropped, 0);
    }
}
