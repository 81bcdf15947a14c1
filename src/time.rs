//! Low-resolution timebase.
//!
//! The hardware timer fires every 1 ms; the UI core only needs coarse
//! time, so events are stamped with a `u16` tick counter advancing every
//! `TICK_RESOLUTION_MS`. The counter wraps, so every comparison is done on
//! the wrapping difference interpreted as signed: a trigger time is
//! "reached" when it lies in the half range behind `now`.

use core::cmp::Ordering;
use core::sync::atomic::{AtomicU16, Ordering as AtomicOrdering};

use crate::config::TICK_RESOLUTION_MS;

/// Largest delay (in ticks) that still compares correctly across a wrap.
pub const MAX_DELAY_TICKS: u16 = i16::MAX as u16;

/// A point on the wrapping low-resolution timeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickTime(pub u16);

impl TickTime {
    /// The point `ticks` after `self`.
    pub const fn wrapping_add(self, ticks: u16) -> Self {
        Self(self.0.wrapping_add(ticks))
    }

    /// Ticks elapsed from `earlier` to `self`.
    pub const fn since(self, earlier: TickTime) -> u16 {
        self.0.wrapping_sub(earlier.0)
    }

    /// True once `now` is at or past this trigger time.
    pub const fn is_reached(self, now: TickTime) -> bool {
        (now.0.wrapping_sub(self.0) as i16) >= 0
    }

    /// Orders two points assuming they are less than half the range apart.
    pub fn cmp_wrapping(self, other: TickTime) -> Ordering {
        (self.0.wrapping_sub(other.0) as i16).cmp(&0)
    }

    /// The point `ms` milliseconds after `self`.
    pub fn after_millis(self, ms: u32) -> Self {
        self.wrapping_add(ticks_from_millis(ms))
    }
}

/// Convert milliseconds to ticks, rounding up and clamping to the
/// largest delay that survives a wrap.
pub fn ticks_from_millis(ms: u32) -> u16 {
    let ticks = ms.div_ceil(TICK_RESOLUTION_MS);
    ticks.min(MAX_DELAY_TICKS as u32) as u16
}

/// Tick counter shared between the timer producer and everyone else.
///
/// Single writer (the tick source), many readers; plain atomic
/// load/store is enough.
pub struct TickClock {
    ticks: AtomicU16,
}

impl TickClock {
    pub const fn new() -> Self {
        Self {
            ticks: AtomicU16::new(0),
        }
    }

    pub fn now(&self) -> TickTime {
        TickTime(self.ticks.load(AtomicOrdering::Acquire))
    }

    /// Step the clock one tick forward and return the new time.
    pub fn advance(&self) -> TickTime {
        let next = self.now().wrapping_add(1);
        self.ticks.store(next.0, AtomicOrdering::Release);
        next
    }

    pub fn set(&self, time: TickTime) {
        self.ticks.store(time.0, AtomicOrdering::Release);
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Tick boundaries derived from the 1 ms hardware tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickPeriod {
    Ms1,
    Ms10,
    Ms100,
    Ms1000,
}

impl TickPeriod {
    pub const ALL: [TickPeriod; 4] = [
        TickPeriod::Ms1,
        TickPeriod::Ms10,
        TickPeriod::Ms100,
        TickPeriod::Ms1000,
    ];

    pub const fn millis(self) -> u32 {
        match self {
            TickPeriod::Ms1 => 1,
            TickPeriod::Ms10 => 10,
            TickPeriod::Ms100 => 100,
            TickPeriod::Ms1000 => 1000,
        }
    }

    const fn bit(self) -> u8 {
        match self {
            TickPeriod::Ms1 => 0b0001,
            TickPeriod::Ms10 => 0b0010,
            TickPeriod::Ms100 => 0b0100,
            TickPeriod::Ms1000 => 0b1000,
        }
    }
}

/// Set of tick periods.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickMask(u8);

impl TickMask {
    pub const NONE: TickMask = TickMask(0);
    pub const MS_1: TickMask = TickMask(0b0001);
    pub const MS_10: TickMask = TickMask(0b0010);
    pub const MS_100: TickMask = TickMask(0b0100);
    pub const MS_1000: TickMask = TickMask(0b1000);
    pub const ALL: TickMask = TickMask(0b1111);

    pub const fn union(self, other: TickMask) -> TickMask {
        TickMask(self.0 | other.0)
    }

    pub const fn contains(self, period: TickPeriod) -> bool {
        self.0 & period.bit() != 0
    }

    pub const fn with(self, period: TickPeriod) -> TickMask {
        TickMask(self.0 | period.bit())
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Divides the 1 ms hardware tick into the 10/100/1000 ms boundaries.
#[derive(Debug, Default)]
pub struct TickDivider {
    millis: u32,
}

impl TickDivider {
    pub const fn new() -> Self {
        Self { millis: 0 }
    }

    /// Account for one elapsed millisecond and report every boundary it
    /// completes. The 1 ms boundary is always part of the result.
    pub fn on_millisecond(&mut self) -> TickMask {
        self.millis = (self.millis + 1) % 1000;
        TickPeriod::ALL
            .iter()
            .filter(|p| self.millis % p.millis() == 0)
            .fold(TickMask::NONE, |mask, p| mask.with(*p))
    }
}
