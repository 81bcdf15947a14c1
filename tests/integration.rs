//! Integration tests for the uphole UI core, through the public API only.

use heapless::spsc::Queue;
use mwd_uphole::event::{
    AlarmPriority, AlertEvent, AlertType, ButtonType, ButtonValue, DepressType, ScreenTask,
};
use mwd_uphole::frame::{Area, FrameState};
use mwd_uphole::keypad::{KeyScanner, ScanSample};
use mwd_uphole::time::{TickMask, TickPeriod};
use mwd_uphole::{
    ActionType, Error, EventQueue, EventSender, EventSink, FrameId, FrameRegistry, PeriodicEvent,
    PriorityPolicy, TickTime, TimerSource, Tone, Ui, UiCore, UiShared,
};

#[derive(Default)]
struct Screen {
    painted: Vec<FrameId>,
    alerts: Vec<AlertEvent>,
    tones: Vec<Tone>,
}

impl Ui for Screen {
    fn paint_frame(&mut self, frame: FrameId, _area: Area, _state: &FrameState) {
        self.painted.push(frame);
    }
    fn show_alert(&mut self, _area: Area, alert: &AlertEvent) {
        self.alerts.push(*alert);
    }
    fn set_backlight(&mut self, _on: bool) {}
    fn beep(&mut self, tone: Tone) {
        self.tones.push(tone);
    }
    fn set_alarm_led(&mut self, _on: bool) {}
}

#[test]
fn mixed_batch_pops_in_declared_order() {
    let mut queue = EventQueue::<8>::new(PriorityPolicy::LastDeclaredFirst);
    let key = |value| {
        PeriodicEvent::button(
            ButtonType::Keypad,
            DepressType::Short,
            ButtonValue(value),
            None,
            TickTime(3),
        )
    };
    let screen = PeriodicEvent::screen(ScreenTask::Repaint, None, TickTime(5));
    let timer = PeriodicEvent::timer(TickPeriod::Ms1000, None, TickTime(10));

    for event in [screen, key(b'1'), key(b'2'), timer] {
        queue.add_periodic_event(event).unwrap();
    }

    let order: Vec<PeriodicEvent> =
        std::iter::from_fn(|| queue.get_next_periodic_event(TickTime(10))).collect();
    assert_eq!(order, [timer, key(b'1'), key(b'2'), screen]);
    assert_eq!(order[0].action_type(), ActionType::TimerElapsed);
}

#[test]
fn keypad_lock_blocks_ring_and_core_alike() {
    let shared = UiShared::new();
    let mut ring: Queue<PeriodicEvent, 4> = Queue::new();
    let (producer, consumer) = ring.split();
    let mut sender = EventSender::new(producer, &shared);
    let mut core = UiCore::<8>::new(FrameRegistry::standard(), &shared);

    shared.allow_keypad_actions(false);
    let press = (ButtonType::Keypad, DepressType::Short, ButtonValue::ENTER);
    assert_eq!(
        sender.add_button_event(press.0, press.1, press.2),
        Err(Error::KeypadDisabled)
    );
    assert_eq!(
        core.add_button_event(press.0, press.1, press.2),
        Err(Error::KeypadDisabled)
    );
    assert_eq!(consumer.len(), 0);
    assert!(core.queue().is_empty());

    shared.allow_keypad_actions(true);
    assert_eq!(sender.add_button_event(press.0, press.1, press.2), Ok(()));
    assert_eq!(consumer.len(), 1);
}

#[test]
fn timer_event_fires_across_counter_wrap() {
    let shared = UiShared::new();
    shared.clock.set(TickTime(0xFFFD));
    let mut core = UiCore::<4>::new(FrameRegistry::standard(), &shared);
    core.add_screen_event(ScreenTask::Repaint, Some(FrameId::Home), TickTime(0xFFFE))
        .unwrap();

    assert_eq!(core.get_next_periodic_event(), None);
    let mut fired_at = None;
    for _ in 0..4 {
        shared.clock.advance();
        if core.get_next_periodic_event().is_some() {
            fired_at = Some(shared.now());
            break;
        }
    }
    assert_eq!(fired_at, Some(TickTime(0xFFFE)));
}

#[test]
fn flush_leaves_nothing_ready() {
    let shared = UiShared::new();
    let mut core = UiCore::<8>::new(FrameRegistry::standard(), &shared);
    for at in [0_u16, 50, 0x8000] {
        core.add_screen_event(ScreenTask::Repaint, None, TickTime(at))
            .unwrap();
    }
    core.flush_both_event_queues();
    for now in [0_u16, 50, 0x8000, 0xFFFF] {
        shared.clock.set(TickTime(now));
        assert_eq!(core.get_next_periodic_event(), None);
    }
}

#[test]
fn producers_to_screen_end_to_end() {
    let shared = UiShared::new();
    let mut timer_ring: Queue<PeriodicEvent, 8> = Queue::new();
    let mut key_ring: Queue<PeriodicEvent, 8> = Queue::new();
    let (timer_tx, mut timer_rx) = timer_ring.split();
    let (key_tx, mut key_rx) = key_ring.split();

    let mut timer = TimerSource::new(EventSender::new(timer_tx, &shared), TickMask::MS_1000);
    let mut keys = EventSender::new(key_tx, &shared);
    let mut scanner = KeyScanner::new(1_000);
    let mut screen = Screen::default();
    let mut core = UiCore::<16>::new(FrameRegistry::standard(), &shared);

    core.start(&mut screen);
    core.run_ready(&mut screen);
    assert_eq!(core.active_frame(), FrameId::Startup);

    // Splash runs out after three seconds of ticks.
    for _ in 0..3_000 {
        timer.on_millisecond();
        core.merge_from(&mut timer_rx);
        core.run_ready(&mut screen);
    }
    assert_eq!(core.active_frame(), FrameId::Home);

    // ENTER pressed and released on the keypad.
    let enter = ScanSample {
        keys: 1 << 12,
        ..ScanSample::default()
    };
    assert_eq!(scanner.scan(enter, 0), None);
    let press = scanner.scan(ScanSample::default(), 80).unwrap();
    keys.add_button_event(press.button_type, press.depress, press.value)
        .unwrap();
    core.merge_from(&mut key_rx);
    core.run_ready(&mut screen);
    assert_eq!(core.active_frame(), FrameId::Tab1);
    assert!(screen.painted.contains(&FrameId::Tab1));
    assert!(screen.tones.contains(&Tone::Click));
}

#[test]
fn alarm_during_navigation_returns_to_same_frame() {
    let shared = UiShared::new();
    let mut screen = Screen::default();
    let mut core = UiCore::<16>::new(FrameRegistry::standard(), &shared);
    core.start(&mut screen);
    core.run_ready(&mut screen);

    for value in [ButtonValue(b'1'), ButtonValue::ENTER, ButtonValue::DOWN] {
        core.add_button_event(ButtonType::Keypad, DepressType::Short, value)
            .unwrap();
        core.run_ready(&mut screen);
    }
    assert_eq!(core.active_frame(), FrameId::Tab2);

    let alarm = AlertEvent::new(AlertType::Alarm, AlarmPriority::High, 40, 41);
    core.add_alert_event(alarm).unwrap();
    core.run_ready(&mut screen);
    assert_eq!(core.active_frame(), FrameId::Alert);
    assert_eq!(screen.alerts, [alarm]);
    assert!(screen.tones.contains(&Tone::Alarm));

    core.add_button_event(ButtonType::Keypad, DepressType::Long, ButtonValue::ENTER)
        .unwrap();
    core.run_ready(&mut screen);
    assert_eq!(core.active_frame(), FrameId::Tab2);
    assert_eq!(core.active_alert(), None);
}
