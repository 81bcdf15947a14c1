//! Alert / alarm arbitration.
//!
//! Only one alert owns the pop-up at a time. A strictly more urgent alert
//! pre-empts the active one; what happens to the pre-empted alert is
//! selected by `PreemptionRule`. Everything else waits in a bounded
//! deferred list, most urgent first, FIFO among equals.

use heapless::Vec;

/// Index into the firmware's string table.
pub type TextId = u16;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlertType {
    /// Informational nag; dismissed with a short ENTER.
    Reminder,
    /// Operator must confirm an action; short ENTER.
    Confirmation,
    /// Hazard; long ENTER to acknowledge.
    Alarm,
}

impl AlertType {
    const fn rank(self) -> u8 {
        match self {
            AlertType::Reminder => 0,
            AlertType::Confirmation => 1,
            AlertType::Alarm => 2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmPriority {
    Low,
    Normal,
    High,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlertEvent {
    pub alert_type: AlertType,
    pub priority: AlarmPriority,
    pub header: TextId,
    pub message: TextId,
}

impl AlertEvent {
    pub const fn new(
        alert_type: AlertType,
        priority: AlarmPriority,
        header: TextId,
        message: TextId,
    ) -> Self {
        Self {
            alert_type,
            priority,
            header,
            message,
        }
    }

    /// Type first, then priority.
    pub const fn urgency(&self) -> (u8, u8) {
        (self.alert_type.rank(), self.priority as u8)
    }

    pub fn outranks(&self, other: &AlertEvent) -> bool {
        self.urgency() > other.urgency()
    }

    fn same_content(&self, other: &AlertEvent) -> bool {
        self.alert_type == other.alert_type
            && self.header == other.header
            && self.message == other.message
    }

    pub const fn is_alarm(&self) -> bool {
        matches!(self.alert_type, AlertType::Alarm)
    }
}

/// Fate of the active alert when a more urgent one arrives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PreemptionRule {
    /// Pre-empted alert is discarded.
    Replace,
    /// Pre-empted alert goes back to the head of the deferred list.
    QueueBehind,
}

/// Result of raising an alert.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlertOutcome {
    /// Alert is now on screen. Carries the alert it pushed aside, if any.
    Shown { preempted: Option<AlertEvent> },
    /// Waiting behind the active alert.
    Deferred,
    /// Identical alert already active or waiting.
    Suppressed,
    /// Deferred list full and the alert was the least urgent.
    Dropped,
}

pub struct AlertManager<const N: usize> {
    active: Option<AlertEvent>,
    deferred: Vec<AlertEvent, N>,
    rule: PreemptionRule,
}

impl<const N: usize> AlertManager<N> {
    pub const fn new(rule: PreemptionRule) -> Self {
        Self {
            active: None,
            deferred: Vec::new(),
            rule,
        }
    }

    pub fn active(&self) -> Option<&AlertEvent> {
        self.active.as_ref()
    }

    pub fn deferred_len(&self) -> usize {
        self.deferred.len()
    }

    pub fn raise(&mut self, alert: AlertEvent) -> AlertOutcome {
        let duplicate = self
            .active
            .iter()
            .chain(self.deferred.iter())
            .any(|known| known.same_content(&alert));
        if duplicate {
            debug!("alert suppressed: duplicate {:?}", alert.alert_type);
            return AlertOutcome::Suppressed;
        }

        let Some(current) = self.active else {
            self.active = Some(alert);
            return AlertOutcome::Shown { preempted: None };
        };

        if alert.outranks(&current) {
            info!(
                "alert {:?} pre-empts {:?}",
                alert.alert_type, current.alert_type
            );
            if self.rule == PreemptionRule::QueueBehind {
                self.defer_front(current);
            }
            self.active = Some(alert);
            return AlertOutcome::Shown {
                preempted: Some(current),
            };
        }

        if self.defer(alert) {
            AlertOutcome::Deferred
        } else {
            warn!("alert dropped: deferred list full");
            AlertOutcome::Dropped
        }
    }

    /// Close the active alert and promote the next deferred one.
    pub fn acknowledge(&mut self) -> Option<AlertEvent> {
        self.active = None;
        let next = self
            .deferred
            .iter()
            .enumerate()
            .fold(None::<(usize, &AlertEvent)>, |best, (index, alert)| match best {
                Some((_, b)) if !alert.outranks(b) => best,
                _ => Some((index, alert)),
            })
            .map(|(index, _)| index)?;
        let alert = self.deferred.remove(next);
        self.active = Some(alert);
        self.active
    }

    /// Append, evicting the least urgent entry when full. Returns false
    /// when `alert` itself is the one that does not fit.
    fn defer(&mut self, alert: AlertEvent) -> bool {
        if self.deferred.is_full() && !self.evict_below(&alert) {
            return false;
        }
        self.deferred.push(alert).is_ok()
    }

    fn defer_front(&mut self, alert: AlertEvent) {
        if self.deferred.is_full() && !self.evict_below(&alert) {
            warn!("pre-empted alert dropped: deferred list full");
            return;
        }
        if self.deferred.insert(0, alert).is_err() {
            warn!("pre-empted alert dropped: deferred list full");
        }
    }

    /// Remove the newest least-urgent entry if `alert` outranks it.
    fn evict_below(&mut self, alert: &AlertEvent) -> bool {
        let mut weakest: Option<usize> = None;
        for (index, candidate) in self.deferred.iter().enumerate() {
            match weakest {
                // Ties pick the newest so older alerts keep their place.
                Some(w) if candidate.outranks(&self.deferred[w]) => {}
                _ => weakest = Some(index),
            }
        }
        match weakest {
            Some(index) if alert.outranks(&self.deferred[index]) => {
                self.deferred.remove(index);
                true
            }
            _ => false,
        }
    }
}
