//! The UI core: queue, dispatcher and frame machine in one owner.
//!
//! `UiCore` is the single consumer. It merges the producer rings into its
//! queue, pops ready events, routes each to a frame handler by `FrameId`
//! (falling back to the active frame) and applies the handler's
//! `Response` afterwards. The active frame only ever changes here, after
//! the handler has returned.
//!
//! Alerts bypass the frame table: they are arbitrated by the
//! `AlertManager` first and only then shown on the alert frame.


use heapless::spsc::Consumer;

use crate::alert::{AlertManager, AlertOutcome, PreemptionRule};
use crate::config::{
    ALARM_FLUSHES_READY_QUEUE, ALERT_PREEMPTION, BACKLIGHT_AUTO_OFF_ENABLED,
    BACKLIGHT_TIMEOUT_MS, EVENT_PRIORITY_POLICY, MAX_DEFERRED_ALERTS, MAX_EVENTS_PER_POLL,
};
use crate::error::Error;
use crate::event::{Action, AlertEvent, AlertType, PeriodicEvent, ScreenTask};
use crate::frame::{FrameContext, FrameEntry, FrameId, FrameRegistry, FrameState, Response};
use crate::queue::{EventQueue, PriorityPolicy};
use crate::shared::UiShared;
use crate::source::EventSink;
use crate::time::TickTime;
use crate::ui::{Tone, Ui};

/// Counters for everything the core drops or skips.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DispatchStats {
    pub dispatched: u32,
    /// Events refused by a full queue (follow-ups, frame switches).
    pub dropped: u32,
    /// Events addressed to a frame with no registry row.
    pub unknown_frames: u32,
    /// Follow-ups a handler could not fit in its response.
    pub follow_ups_overflowed: u32,
    pub alerts_dropped: u32,
}

pub struct UiCore<'a, const N: usize> {
    queue: EventQueue<N>,
    registry: FrameRegistry<'a>,
    shared: &'a UiShared,
    active: FrameId,
    /// Frame to go back to once the last alert is acknowledged.
    return_frame: FrameId,
    /// Idle reference until the first key is accepted.
    booted_at: TickTime,
    states: [FrameState; FrameId::COUNT],
    alerts: AlertManager<MAX_DEFERRED_ALERTS>,
    stats: DispatchStats,
}

impl<'a, const N: usize> UiCore<'a, N> {
    /// Core with the configured ordering and pre-emption policies.
    pub fn new(registry: FrameRegistry<'a>, shared: &'a UiShared) -> Self {
        Self::with_policies(registry, shared, EVENT_PRIORITY_POLICY, ALERT_PREEMPTION)
    }

    pub fn with_policies(
        registry: FrameRegistry<'a>,
        shared: &'a UiShared,
        policy: PriorityPolicy,
        rule: PreemptionRule,
    ) -> Self {
        Self {
            queue: EventQueue::new(policy),
            registry,
            shared,
            active: FrameId::Startup,
            return_frame: FrameId::Home,
            booted_at: TickTime::default(),
            states: [FrameState::default(); FrameId::COUNT],
            alerts: AlertManager::new(rule),
            stats: DispatchStats::default(),
        }
    }

    /// Boot sequence: light the panel, show the splash and arm the first
    /// backlight check.
    pub fn start(&mut self, ui: &mut dyn Ui) {
        let now = self.shared.now();
        ui.set_backlight(true);
        self.booted_at = now;
        self.active = FrameId::Startup;
        self.enqueue(PeriodicEvent::screen(
            ScreenTask::Show,
            Some(FrameId::Startup),
            now,
        ));
        self.enqueue(PeriodicEvent::screen(
            ScreenTask::Show,
            Some(FrameId::Status),
            now,
        ));
        if BACKLIGHT_AUTO_OFF_ENABLED {
            self.enqueue(PeriodicEvent::screen(
                ScreenTask::BacklightOff,
                Some(FrameId::Status),
                now.after_millis(BACKLIGHT_TIMEOUT_MS),
            ));
        }
    }

    // ── Queue surface ───────────────────────────────────────────────────

    pub fn add_periodic_event(&mut self, event: PeriodicEvent) -> Result<(), Error> {
        self.queue.add_periodic_event(event)
    }

    pub fn get_next_periodic_event(&mut self) -> Option<PeriodicEvent> {
        self.queue.get_next_periodic_event(self.shared.now())
    }

    pub fn clear_pending_events_queue(&mut self) {
        self.queue.clear_pending_events_queue();
    }

    pub fn remove_all_events_queue(&mut self) {
        self.queue.remove_all_events_queue();
    }

    pub fn flush_both_event_queues(&mut self) {
        self.queue.flush_both_event_queues();
    }

    /// Move events from a producer ring into the queue. Stops when the
    /// queue is full; whatever is left stays in the ring for next time.
    pub fn merge_from<const R: usize>(
        &mut self,
        ring: &mut Consumer<'_, PeriodicEvent, R>,
    ) -> usize {
        let mut merged = 0;
        while !self.queue.is_full() {
            let Some(event) = ring.dequeue() else {
                break;
            };
            self.enqueue(event);
            merged += 1;
        }
        merged
    }

    // ── Dispatch ────────────────────────────────────────────────────────

    /// Dispatch up to `MAX_EVENTS_PER_POLL` ready events. Returns how
    /// many were handled.
    pub fn run_ready(&mut self, ui: &mut dyn Ui) -> usize {
        let mut handled = 0;
        while handled < MAX_EVENTS_PER_POLL {
            let Some(event) = self.get_next_periodic_event() else {
                break;
            };
            // Unroutable events are already counted and logged.
            let _ = self.process_periodic_event(event, ui);
            handled += 1;
        }
        handled
    }

    /// Route one event to its frame and apply the outcome.
    pub fn process_periodic_event(
        &mut self,
        event: PeriodicEvent,
        ui: &mut dyn Ui,
    ) -> Result<(), Error> {
        self.stats.dispatched = self.stats.dispatched.wrapping_add(1);
        let action = event.action;
        let target = match action {
            Action::NoAction => return Ok(()),
            Action::Alert(alert) => {
                self.raise_alert(alert, ui);
                return Ok(());
            }
            other => other.frame().unwrap_or(self.active),
        };

        let registry = self.registry;
        let Some(entry) = registry.get(target) else {
            self.stats.unknown_frames = self.stats.unknown_frames.wrapping_add(1);
            warn!("no frame registered for {:?}", target);
            return Err(Error::UnknownFrame(target));
        };

        // Drawing requests for a frame that is not on screen are stale: a
        // Show overtaken by a later switch, or a repaint of a covered frame.
        if let Action::Screen(screen) = action {
            let draws = matches!(screen.task, ScreenTask::Show | ScreenTask::Repaint);
            if draws && target != self.active && !entry.kind.is_overlay() {
                debug!("{:?} for hidden {:?} skipped", screen.task, target);
                return Ok(());
            }
        }

        if let Action::Push(_) = action {
            ui.beep(Tone::Click);
        }
        let response = self.invoke(entry, &action, ui);
        self.apply(response, ui);

        if matches!(action, Action::Push(_) | Action::TimerElapsed(_)) {
            for overlay in registry
                .iter()
                .filter(|e| e.kind.is_overlay() && e.id != target)
            {
                let response = self.invoke(overlay, &action, ui);
                self.apply(response, ui);
            }
        }
        Ok(())
    }

    pub fn active_frame(&self) -> FrameId {
        self.active
    }

    pub fn frame_state(&self, id: FrameId) -> &FrameState {
        &self.states[id.index()]
    }

    pub fn active_alert(&self) -> Option<&AlertEvent> {
        self.alerts.active()
    }

    pub fn deferred_alerts(&self) -> usize {
        self.alerts.deferred_len()
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    pub fn queue(&self) -> &EventQueue<N> {
        &self.queue
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn invoke(&mut self, entry: &FrameEntry, action: &Action, ui: &mut dyn Ui) -> Response {
        let now = self.shared.now();
        let last_activity = self.shared.last_key().unwrap_or(self.booted_at);
        let alert = self.alerts.active().copied();
        let mut ctx = FrameContext {
            entry,
            state: &mut self.states[entry.id.index()],
            ui: &mut *ui,
            now,
            last_activity,
            alert: alert.as_ref(),
        };
        entry.kind.handle(&mut ctx, action)
    }

    fn apply(&mut self, response: Response, ui: &mut dyn Ui) {
        if response.overflowed > 0 {
            self.stats.follow_ups_overflowed = self
                .stats
                .follow_ups_overflowed
                .wrapping_add(response.overflowed as u32);
            warn!("{} follow-up events dropped", response.overflowed);
        }
        for event in response.follow_ups {
            self.enqueue(event);
        }
        if response.acknowledge_alert {
            self.acknowledge_alert(ui);
        }
        if let Some(next) = response.next_frame {
            self.switch_frame(next);
        }
    }

    fn enqueue(&mut self, event: PeriodicEvent) {
        if self.queue.add_periodic_event(event).is_err() {
            self.stats.dropped = self.stats.dropped.wrapping_add(1);
            warn!("event queue full, {:?} dropped", event.action_type());
        }
    }

    fn switch_frame(&mut self, next: FrameId) {
        if next != self.active {
            debug!("frame {:?} -> {:?}", self.active, next);
            self.states[self.active.index()].visible = false;
            self.active = next;
        }
        self.enqueue(PeriodicEvent::screen(
            ScreenTask::Show,
            Some(next),
            self.shared.now(),
        ));
    }

    fn raise_alert(&mut self, alert: AlertEvent, ui: &mut dyn Ui) {
        match self.alerts.raise(alert) {
            AlertOutcome::Shown { .. } => {
                ui.beep(tone_for(alert.alert_type));
                ui.set_alarm_led(alert.is_alarm());
                if alert.is_alarm() && ALARM_FLUSHES_READY_QUEUE {
                    self.queue.remove_all_events_queue();
                }
                if self.active != FrameId::Alert {
                    self.return_frame = self.active;
                }
                self.switch_frame(FrameId::Alert);
            }
            AlertOutcome::Deferred | AlertOutcome::Suppressed => {}
            AlertOutcome::Dropped => {
                self.stats.alerts_dropped = self.stats.alerts_dropped.wrapping_add(1);
            }
        }
    }

    fn acknowledge_alert(&mut self, ui: &mut dyn Ui) {
        ui.beep(Tone::Confirm);
        match self.alerts.acknowledge() {
            Some(next) => {
                info!("next alert {:?}", next.alert_type);
                ui.set_alarm_led(next.is_alarm());
                ui.beep(tone_for(next.alert_type));
                self.switch_frame(FrameId::Alert);
            }
            None => {
                ui.set_alarm_led(false);
                self.switch_frame(self.return_frame);
            }
        }
    }
}

impl<const N: usize> EventSink for UiCore<'_, N> {
    fn add_periodic_event(&mut self, event: PeriodicEvent) -> Result<(), Error> {
        self.queue.add_periodic_event(event)
    }

    fn shared(&self) -> &UiShared {
        self.shared
    }
}

fn tone_for(alert_type: AlertType) -> Tone {
    match alert_type {
        AlertType::Reminder => Tone::Reminder,
        AlertType::Confirmation => Tone::Confirm,
        AlertType::Alarm => Tone::Alarm,
    }
}
