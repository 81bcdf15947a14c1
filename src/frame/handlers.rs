//! Per-frame behaviour.
//!
//! Each `FrameKind` answers four capabilities: paint, show, key pressed
//! and timer elapsed (plus the screen-task hooks for blink and backlight
//! checks). Handlers only see their own `FrameState` and the `Ui`; they
//! never change the active frame themselves. Instead they return a
//! `Response` that the core applies once the handler is done.

use heapless::Vec;

use super::nav::{label_next, label_of, label_prev, tab_next, tab_prev, value_of};
use super::{FrameEntry, FrameId, FrameKind, FrameState};
use crate::backlight::backlight_expired;
use crate::config::{
    BACKLIGHT_AUTO_OFF_ENABLED, BACKLIGHT_TIMEOUT_MS, CURSOR_BLINK_MS, MAX_FOLLOW_UPS,
    STARTUP_SPLASH_SECS,
};
use crate::event::{
    Action, AlertEvent, ButtonValue, DepressType, PeriodicEvent, PushEvent, ScreenTask,
};
use crate::time::{ticks_from_millis, TickPeriod, TickTime};
use crate::ui::Ui;

/// Everything a handler may look at or touch during one call.
pub struct FrameContext<'c> {
    pub entry: &'c FrameEntry,
    pub state: &'c mut FrameState,
    pub ui: &'c mut dyn Ui,
    pub now: TickTime,
    /// Last accepted key, or boot if there was none yet.
    pub last_activity: TickTime,
    /// Alert currently owning the pop-up.
    pub alert: Option<&'c AlertEvent>,
}

/// What the core should do after a handler returns.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Response {
    pub next_frame: Option<FrameId>,
    pub follow_ups: Vec<PeriodicEvent, MAX_FOLLOW_UPS>,
    pub acknowledge_alert: bool,
    /// Follow-ups that did not fit.
    pub overflowed: u8,
}

impl Response {
    pub fn switch_to(frame: FrameId) -> Self {
        Self {
            next_frame: Some(frame),
            ..Self::default()
        }
    }

    pub fn schedule(&mut self, event: PeriodicEvent) {
        if self.follow_ups.push(event).is_err() {
            self.overflowed = self.overflowed.saturating_add(1);
        }
    }
}

impl FrameKind {
    /// Status bar runs alongside whatever frame is active and also sees
    /// key presses and timer ticks addressed elsewhere.
    pub const fn is_overlay(self) -> bool {
        matches!(self, FrameKind::Status)
    }

    /// Route one action to the matching capability.
    pub fn handle(self, ctx: &mut FrameContext<'_>, action: &Action) -> Response {
        match action {
            Action::Screen(screen) => match screen.task {
                ScreenTask::Show => self.show(ctx),
                ScreenTask::Repaint => {
                    self.paint(ctx);
                    Response::default()
                }
                ScreenTask::Blink => self.blink(ctx),
                ScreenTask::BacklightOff => self.backlight_check(ctx),
            },
            Action::Push(push) => self.key_pressed(ctx, push),
            Action::TimerElapsed(timer) => self.timer_elapsed(ctx, timer.period),
            // Alerts are arbitrated by the core before any frame sees them.
            Action::Alert(_) | Action::NoAction => Response::default(),
        }
    }

    /// Draw the frame. Frames that are off screen keep their state but
    /// draw nothing.
    pub fn paint(self, ctx: &mut FrameContext<'_>) {
        if !ctx.state.visible {
            return;
        }
        match (self, ctx.alert) {
            (FrameKind::Alert, Some(alert)) => ctx.ui.show_alert(ctx.entry.area, alert),
            _ => ctx.ui.paint_frame(ctx.entry.id, ctx.entry.area, &*ctx.state),
        }
    }

    /// Frame became active: reset its visual state and paint it.
    pub fn show(self, ctx: &mut FrameContext<'_>) -> Response {
        *ctx.state = FrameState {
            visible: true,
            cursor_on: true,
            ..FrameState::default()
        };
        self.paint(ctx);

        let mut response = Response::default();
        if let FrameKind::Value(_) = self {
            response.schedule(PeriodicEvent::screen(
                ScreenTask::Blink,
                Some(ctx.entry.id),
                ctx.now.after_millis(CURSOR_BLINK_MS),
            ));
        }
        response
    }

    pub fn key_pressed(self, ctx: &mut FrameContext<'_>, push: &PushEvent) -> Response {
        let value = push.value;
        match self {
            FrameKind::Startup => Response::switch_to(FrameId::Home),
            FrameKind::Home => match value {
                ButtonValue::ENTER => Response::switch_to(FrameId::Tab1),
                _ => Response::default(),
            },
            FrameKind::Tab(tab) => match value {
                ButtonValue::UP => Response::switch_to(tab_prev(tab)),
                ButtonValue::DOWN => Response::switch_to(tab_next(tab)),
                ButtonValue::ENTER => Response::switch_to(label_of(0)),
                ButtonValue::ESCAPE => Response::switch_to(FrameId::Home),
                _ => Response::default(),
            },
            FrameKind::Label(field) => match value {
                ButtonValue::UP => Response::switch_to(label_prev(field)),
                ButtonValue::DOWN => Response::switch_to(label_next(field)),
                ButtonValue::ENTER => Response::switch_to(value_of(field)),
                ButtonValue::ESCAPE => Response::switch_to(FrameId::Home),
                _ => Response::default(),
            },
            FrameKind::Value(field) => match value {
                ButtonValue::UP | ButtonValue::DOWN => {
                    let step = if value == ButtonValue::UP { 1 } else { -1 };
                    ctx.state.edit_delta = ctx.state.edit_delta.saturating_add(step);
                    ctx.state.cursor_on = true;
                    self.paint(ctx);
                    Response::default()
                }
                ButtonValue::ENTER | ButtonValue::ESCAPE => Response::switch_to(label_of(field)),
                _ => Response::default(),
            },
            FrameKind::Status => {
                ctx.ui.set_backlight(true);
                let mut response = Response::default();
                if BACKLIGHT_AUTO_OFF_ENABLED {
                    response.schedule(PeriodicEvent::screen(
                        ScreenTask::BacklightOff,
                        Some(ctx.entry.id),
                        ctx.now.after_millis(BACKLIGHT_TIMEOUT_MS),
                    ));
                }
                response
            }
            FrameKind::Alert => {
                let Some(alert) = ctx.alert else {
                    return Response::default();
                };
                let needed = if alert.is_alarm() {
                    DepressType::Long
                } else {
                    DepressType::Short
                };
                Response {
                    acknowledge_alert: value == ButtonValue::ENTER && push.depress == needed,
                    ..Response::default()
                }
            }
        }
    }

    pub fn timer_elapsed(self, ctx: &mut FrameContext<'_>, period: TickPeriod) -> Response {
        if period != TickPeriod::Ms1000 {
            return Response::default();
        }
        match self {
            FrameKind::Startup => {
                ctx.state.seconds = ctx.state.seconds.saturating_add(1);
                if ctx.state.seconds >= STARTUP_SPLASH_SECS {
                    Response::switch_to(FrameId::Home)
                } else {
                    Response::default()
                }
            }
            FrameKind::Home | FrameKind::Status => {
                ctx.state.seconds = ctx.state.seconds.wrapping_add(1);
                self.paint(ctx);
                Response::default()
            }
            _ => Response::default(),
        }
    }

    /// Cursor phase toggle; keeps itself going while the frame is shown.
    fn blink(self, ctx: &mut FrameContext<'_>) -> Response {
        let mut response = Response::default();
        if !matches!(self, FrameKind::Value(_)) || !ctx.state.visible {
            return response;
        }
        ctx.state.cursor_on = !ctx.state.cursor_on;
        self.paint(ctx);
        response.schedule(PeriodicEvent::screen(
            ScreenTask::Blink,
            Some(ctx.entry.id),
            ctx.now.after_millis(CURSOR_BLINK_MS),
        ));
        response
    }

    /// A check scheduled by an earlier key press. Checks made stale by a
    /// newer press measure from that press and leave the backlight alone.
    fn backlight_check(self, ctx: &mut FrameContext<'_>) -> Response {
        let timeout = ticks_from_millis(BACKLIGHT_TIMEOUT_MS);
        if BACKLIGHT_AUTO_OFF_ENABLED && backlight_expired(ctx.last_activity, ctx.now, timeout) {
            debug!(
                "backlight off after {} idle ticks",
                ctx.now.since(ctx.last_activity)
            );
            ctx.ui.set_backlight(false);
        }
        Response::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{AlarmPriority, AlertType, ButtonType};
    use crate::frame::{Area, FrameRegistry};
    use crate::ui::Tone;

    #[derive(Default)]
    struct Calls {
        painted: std::vec::Vec<FrameId>,
        alerts: usize,
        backlight: std::vec::Vec<bool>,
    }

    impl Ui for Calls {
        fn paint_frame(&mut self, frame: FrameId, _area: Area, _state: &FrameState) {
            self.painted.push(frame);
        }
        fn show_alert(&mut self, _area: Area, _alert: &AlertEvent) {
            self.alerts += 1;
        }
        fn set_backlight(&mut self, on: bool) {
            self.backlight.push(on);
        }
        fn beep(&mut self, _tone: Tone) {}
        fn set_alarm_led(&mut self, _on: bool) {}
    }

    fn key(value: ButtonValue, depress: DepressType) -> PushEvent {
        PushEvent {
            button_type: ButtonType::Keypad,
            depress,
            value,
            frame: None,
        }
    }

    const NOW: TickTime = TickTime(5_000);

    fn with_ctx<R>(
        id: FrameId,
        state: &mut FrameState,
        alert: Option<&AlertEvent>,
        last_activity: TickTime,
        f: impl FnOnce(&mut FrameContext<'_>) -> R,
    ) -> (R, Calls) {
        let registry = FrameRegistry::standard();
        let entry = registry.get(id).unwrap();
        let mut calls = Calls::default();
        let out = {
            let mut ctx = FrameContext {
                entry,
                state,
                ui: &mut calls,
                now: NOW,
                last_activity,
                alert,
            };
            f(&mut ctx)
        };
        (out, calls)
    }

    #[test]
    fn tab_navigation_wraps() {
        let mut state = FrameState::default();
        let up = key(ButtonValue::UP, DepressType::Short);
        let (response, _) = with_ctx(FrameId::Tab1, &mut state, None, NOW, |ctx| {
            FrameKind::Tab(0).key_pressed(ctx, &up)
        });
        assert_eq!(response.next_frame, Some(FrameId::Tab4));
    }

    #[test]
    fn value_show_starts_blinking() {
        let mut state = FrameState::default();
        let (response, calls) = with_ctx(FrameId::Value2, &mut state, None, NOW, |ctx| {
            FrameKind::Value(1).show(ctx)
        });
        assert!(state.visible && state.cursor_on);
        assert_eq!(calls.painted, [FrameId::Value2]);
        assert_eq!(
            response.follow_ups.as_slice(),
            [PeriodicEvent::screen(
                ScreenTask::Blink,
                Some(FrameId::Value2),
                NOW.after_millis(CURSOR_BLINK_MS)
            )]
        );
    }

    #[test]
    fn blink_stops_once_hidden() {
        let mut state = FrameState::default();
        let (response, calls) = with_ctx(FrameId::Value1, &mut state, None, NOW, |ctx| {
            FrameKind::Value(0).blink(ctx)
        });
        assert!(response.follow_ups.is_empty());
        assert!(calls.painted.is_empty());
    }

    #[test]
    fn value_edit_accumulates() {
        let mut state = FrameState {
            visible: true,
            ..FrameState::default()
        };
        let down = key(ButtonValue::DOWN, DepressType::Short);
        for _ in 0..3 {
            with_ctx(FrameId::Value1, &mut state, None, NOW, |ctx| {
                FrameKind::Value(0).key_pressed(ctx, &down)
            });
        }
        assert_eq!(state.edit_delta, -3);
    }

    #[test]
    fn status_key_rearms_backlight_check() {
        let mut state = FrameState::default();
        let any = key(ButtonValue(b'7'), DepressType::Short);
        let (response, calls) = with_ctx(FrameId::Status, &mut state, None, NOW, |ctx| {
            FrameKind::Status.key_pressed(ctx, &any)
        });
        assert_eq!(calls.backlight, [true]);
        assert_eq!(
            response.follow_ups[0],
            PeriodicEvent::screen(
                ScreenTask::BacklightOff,
                Some(FrameId::Status),
                NOW.after_millis(BACKLIGHT_TIMEOUT_MS)
            )
        );
    }

    #[test]
    fn stale_backlight_check_leaves_light_on() {
        let mut state = FrameState::default();
        let timeout = ticks_from_millis(BACKLIGHT_TIMEOUT_MS);
        let recent = TickTime(NOW.0 - (timeout - 1));
        let (_, calls) = with_ctx(FrameId::Status, &mut state, None, recent, |ctx| {
            FrameKind::Status.backlight_check(ctx)
        });
        assert!(calls.backlight.is_empty());

        let idle = TickTime(NOW.0 - timeout);
        let (_, calls) = with_ctx(FrameId::Status, &mut state, None, idle, |ctx| {
            FrameKind::Status.backlight_check(ctx)
        });
        assert_eq!(calls.backlight, [false]);
    }

    #[test]
    fn alarm_needs_long_enter() {
        let alarm = AlertEvent::new(AlertType::Alarm, AlarmPriority::High, 1, 2);
        let mut state = FrameState::default();
        let short = key(ButtonValue::ENTER, DepressType::Short);
        let long = key(ButtonValue::ENTER, DepressType::Long);

        let (response, _) = with_ctx(FrameId::Alert, &mut state, Some(&alarm), NOW, |ctx| {
            FrameKind::Alert.key_pressed(ctx, &short)
        });
        assert!(!response.acknowledge_alert);

        let (response, _) = with_ctx(FrameId::Alert, &mut state, Some(&alarm), NOW, |ctx| {
            FrameKind::Alert.key_pressed(ctx, &long)
        });
        assert!(response.acknowledge_alert);
    }

    #[test]
    fn alert_frame_paints_active_alert() {
        let reminder = AlertEvent::new(AlertType::Reminder, AlarmPriority::Low, 3, 4);
        let mut state = FrameState::default();
        let (_, calls) = with_ctx(FrameId::Alert, &mut state, Some(&reminder), NOW, |ctx| {
            FrameKind::Alert.show(ctx)
        });
        assert_eq!(calls.alerts, 1);
        assert!(calls.painted.is_empty());
    }

    #[test]
    fn hidden_frame_keeps_counting_without_painting() {
        let mut state = FrameState::default();
        let (_, calls) = with_ctx(FrameId::Home, &mut state, None, NOW, |ctx| {
            FrameKind::Home.timer_elapsed(ctx, TickPeriod::Ms1000)
        });
        assert!(calls.painted.is_empty());
        assert_eq!(state.seconds, 1);

        state.visible = true;
        let (_, calls) = with_ctx(FrameId::Home, &mut state, None, NOW, |ctx| {
            FrameKind::Home.timer_elapsed(ctx, TickPeriod::Ms1000)
        });
        assert_eq!(calls.painted, [FrameId::Home]);
    }

    #[test]
    fn startup_times_out_to_home() {
        let mut state = FrameState::default();
        let mut last = None;
        for _ in 0..STARTUP_SPLASH_SECS {
            let (response, _) = with_ctx(FrameId::Startup, &mut state, None, NOW, |ctx| {
                FrameKind::Startup.timer_elapsed(ctx, TickPeriod::Ms1000)
            });
            last = response.next_frame;
        }
        assert_eq!(last, Some(FrameId::Home));
    }

    #[test]
    fn follow_up_overflow_is_counted() {
        let mut response = Response::default();
        let event = PeriodicEvent::screen(ScreenTask::Repaint, None, TickTime(0));
        for _ in 0..MAX_FOLLOW_UPS + 2 {
            response.schedule(event);
        }
        assert_eq!(response.follow_ups.len(), MAX_FOLLOW_UPS);
        assert_eq!(response.overflowed, 2);
    }
}
