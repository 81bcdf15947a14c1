//! Bounded two-stage event queue.
//!
//! Events enter the *pending* set and move to the *ready* set once their
//! trigger time is reached. `get_next_periodic_event` always promotes
//! first, then pops the best ready event:
//!
//! 1. higher action-type rank (per `PriorityPolicy`),
//! 2. earlier trigger time (wrap-aware),
//! 3. earlier insertion (FIFO).
//!
//! Capacity `N` covers both sets together, so an insert only succeeds
//! once a dispatch or a clear frees a slot. No allocation, no growth.


use core::cmp::Ordering;

use heapless::Vec;

use crate::error::Error;
use crate::event::{ActionType, PeriodicEvent};
use crate::time::TickTime;

/// How action types rank against each other among ready events.
///
/// The declared order is `NoAction < Screen < Push < Alert < TimerElapsed`.
/// `NoAction` always ranks last under both policies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PriorityPolicy {
    /// Later-declared types win: `TimerElapsed > Alert > Push > Screen`.
    LastDeclaredFirst,
    /// Earlier-declared types win: `Screen > Push > Alert > TimerElapsed`.
    FirstDeclaredFirst,
}

impl PriorityPolicy {
    /// Rank of an action type; higher is dispatched first.
    pub const fn rank(self, action: ActionType) -> u8 {
        match (self, action) {
            (_, ActionType::NoAction) => 0,
            (PriorityPolicy::LastDeclaredFirst, other) => other as u8,
            (PriorityPolicy::FirstDeclaredFirst, other) => {
                ActionType::TimerElapsed as u8 + 1 - other as u8
            }
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Slot {
    event: PeriodicEvent,
    seq: u32,
}

pub struct EventQueue<const N: usize> {
    pending: Vec<Slot, N>,
    ready: Vec<Slot, N>,
    next_seq: u32,
    policy: PriorityPolicy,
}

impl<const N: usize> EventQueue<N> {
    pub const fn new(policy: PriorityPolicy) -> Self {
        Self {
            pending: Vec::new(),
            ready: Vec::new(),
            next_seq: 0,
            policy,
        }
    }

    /// Insert into the pending set. Fails without side effects when the
    /// queue is full.
    pub fn add_periodic_event(&mut self, event: PeriodicEvent) -> Result<(), Error> {
        if self.is_full() {
            return Err(Error::QueueFull);
        }
        let slot = Slot {
            event,
            seq: self.next_seq,
        };
        self.pending.push(slot).map_err(|_| Error::QueueFull)?;
        self.next_seq = self.next_seq.wrapping_add(1);
        Ok(())
    }

    /// Promote every due pending event, then pop the best ready one.
    pub fn get_next_periodic_event(&mut self, now: TickTime) -> Option<PeriodicEvent> {
        self.promote(now);
        let best = self
            .ready
            .iter()
            .enumerate()
            .fold(None::<(usize, &Slot)>, |best, (index, slot)| match best {
                Some((_, b)) if self.compare(slot, b) != Ordering::Greater => best,
                _ => Some((index, slot)),
            })
            .map(|(index, _)| index)?;
        Some(self.ready.swap_remove(best).event)
    }

    /// Move due events from pending to ready, keeping their relative order.
    pub fn promote(&mut self, now: TickTime) -> usize {
        let mut moved = 0;
        let mut index = 0;
        while index < self.pending.len() {
            if self.pending[index].event.trigger_time.is_reached(now) {
                let slot = self.pending.remove(index);
                // Both sets share one capacity, so there is always room.
                if self.ready.push(slot).is_err() {
                    warn!("ready set overflow");
                }
                moved += 1;
            } else {
                index += 1;
            }
        }
        moved
    }

    /// Drop every scheduled (not yet due) event.
    pub fn clear_pending_events_queue(&mut self) {
        self.pending.clear();
    }

    /// Drop every due event waiting for dispatch.
    pub fn remove_all_events_queue(&mut self) {
        self.ready.clear();
    }

    pub fn flush_both_event_queues(&mut self) {
        self.pending.clear();
        self.ready.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len() + self.ready.len()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn ready_len(&self) -> usize {
        self.ready.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() >= N
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// `Greater` means `a` should be dispatched before `b`.
    fn compare(&self, a: &Slot, b: &Slot) -> Ordering {
        let rank_a = self.policy.rank(a.event.action_type());
        let rank_b = self.policy.rank(b.event.action_type());
        rank_a
            .cmp(&rank_b)
            .then_with(|| {
                b.event
                    .trigger_time
                    .cmp_wrapping(a.event.trigger_time)
            })
            .then_with(|| (b.seq.wrapping_sub(a.seq) as i32).cmp(&0))
    }
}
