//! Actions and periodic events.
//!
//! A `PeriodicEvent` is an `Action` stamped with the low-resolution time
//! at which it becomes due. Producers copy events into the queue by value
//! and the dispatcher copies them out by value; nothing keeps a reference
//! into queue storage.

pub mod button;

pub use crate::alert::{AlarmPriority, AlertEvent, AlertType, TextId};
pub use button::{ButtonType, ButtonValue, DepressType};

use crate::frame::FrameId;
use crate::time::{TickPeriod, TickTime};

/// Action kinds in declaration order.
///
/// The numeric order is what `PriorityPolicy` ranks on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ActionType {
    NoAction = 0,
    Screen = 1,
    Push = 2,
    Alert = 3,
    TimerElapsed = 4,
}

/// A debounced, classified key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PushEvent {
    pub button_type: ButtonType,
    pub depress: DepressType,
    pub value: ButtonValue,
    /// Target frame; `None` routes to the active frame.
    pub frame: Option<FrameId>,
}

/// Screen-layer work items.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScreenTask {
    /// Frame just became active: reset and paint.
    Show,
    /// Repaint contents (new link data, edited value).
    Repaint,
    /// Toggle the cursor of a value frame.
    Blink,
    /// Backlight inactivity check.
    BacklightOff,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScreenEvent {
    pub task: ScreenTask,
    pub frame: Option<FrameId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerEvent {
    pub period: TickPeriod,
    pub frame: Option<FrameId>,
}

/// What an event asks the UI to do. The variant is the action type, so
/// payload and tag can never disagree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    NoAction,
    Screen(ScreenEvent),
    Push(PushEvent),
    Alert(AlertEvent),
    TimerElapsed(TimerEvent),
}

impl Action {
    pub const fn action_type(&self) -> ActionType {
        match self {
            Action::NoAction => ActionType::NoAction,
            Action::Screen(_) => ActionType::Screen,
            Action::Push(_) => ActionType::Push,
            Action::Alert(_) => ActionType::Alert,
            Action::TimerElapsed(_) => ActionType::TimerElapsed,
        }
    }

    /// Frame the action is addressed to, if any.
    pub const fn frame(&self) -> Option<FrameId> {
        match self {
            Action::Screen(screen) => screen.frame,
            Action::Push(push) => push.frame,
            Action::TimerElapsed(timer) => timer.frame,
            Action::Alert(_) => Some(FrameId::Alert),
            Action::NoAction => None,
        }
    }
}

/// An action and the time it becomes due.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PeriodicEvent {
    pub action: Action,
    pub trigger_time: TickTime,
}

impl PeriodicEvent {
    pub const fn new(action: Action, trigger_time: TickTime) -> Self {
        Self {
            action,
            trigger_time,
        }
    }

    pub const fn button(
        button_type: ButtonType,
        depress: DepressType,
        value: ButtonValue,
        frame: Option<FrameId>,
        trigger_time: TickTime,
    ) -> Self {
        Self::new(
            Action::Push(PushEvent {
                button_type,
                depress,
                value,
                frame,
            }),
            trigger_time,
        )
    }

    pub const fn screen(task: ScreenTask, frame: Option<FrameId>, trigger_time: TickTime) -> Self {
        Self::new(Action::Screen(ScreenEvent { task, frame }), trigger_time)
    }

    pub const fn alert(alert: AlertEvent, trigger_time: TickTime) -> Self {
        Self::new(Action::Alert(alert), trigger_time)
    }

    pub const fn timer(period: TickPeriod, frame: Option<FrameId>, trigger_time: TickTime) -> Self {
        Self::new(
            Action::TimerElapsed(TimerEvent { period, frame }),
            trigger_time,
        )
    }

    pub const fn action_type(&self) -> ActionType {
        self.action.action_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_order_matches_repr() {
        assert!(ActionType::NoAction < ActionType::Screen);
        assert!(ActionType::Screen < ActionType::Push);
        assert!(ActionType::Push < ActionType::Alert);
        assert!(ActionType::Alert < ActionType::TimerElapsed);
        assert_eq!(ActionType::TimerElapsed as u8, 4);
    }

    #[test]
    fn action_type_follows_variant() {
        let ev = PeriodicEvent::screen(ScreenTask::Repaint, Some(FrameId::Home), TickTime(3));
        assert_eq!(ev.action_type(), ActionType::Screen);
        assert_eq!(ev.action.frame(), Some(FrameId::Home));

        let ev = PeriodicEvent::timer(TickPeriod::Ms1000, None, TickTime(0));
        assert_eq!(ev.action_type(), ActionType::TimerElapsed);
        assert_eq!(ev.action.frame(), None);

        assert_eq!(Action::NoAction.action_type(), ActionType::NoAction);
    }

    #[test]
    fn alerts_route_to_alert_frame() {
        let alert = AlertEvent::new(AlertType::Alarm, AlarmPriority::High, 1, 2);
        assert_eq!(Action::Alert(alert).frame(), Some(FrameId::Alert));
    }
}
