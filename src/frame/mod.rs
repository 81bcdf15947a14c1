//! Frames (screens) and the read-only frame registry.
//!
//! Every screen of the uphole display is a frame identified by a
//! `FrameId`. Frames are registered once, at build time, in a static
//! table that maps the id to a `FrameKind` (the tagged variant that
//! selects the frame's behaviour) and its screen area. The table is never
//! mutated; per-frame visual state lives in the `UiCore`.

pub mod handlers;
pub mod nav;

pub use handlers::{FrameContext, Response};

/// Screen identifiers. Declaration order is the registry index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum FrameId {
    Startup,
    Home,
    /// Main tab.
    Tab1,
    /// Parameter tab.
    Tab2,
    /// Setup tab.
    Tab3,
    /// Diagnostics tab.
    Tab4,
    Label1,
    Label2,
    Label3,
    Label4,
    Value1,
    Value2,
    Value3,
    Value4,
    Status,
    Alert,
}

impl FrameId {
    /// Number of live frames. Raw ids at or above this are out of range.
    pub const COUNT: usize = 16;

    pub const ALL: [FrameId; FrameId::COUNT] = [
        FrameId::Startup,
        FrameId::Home,
        FrameId::Tab1,
        FrameId::Tab2,
        FrameId::Tab3,
        FrameId::Tab4,
        FrameId::Label1,
        FrameId::Label2,
        FrameId::Label3,
        FrameId::Label4,
        FrameId::Value1,
        FrameId::Value2,
        FrameId::Value3,
        FrameId::Value4,
        FrameId::Status,
        FrameId::Alert,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Bounds-checked conversion from a raw id.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Rectangle on the 128×64 LCD.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Area {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Area {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Behaviour selector for a registered frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameKind {
    /// Splash shown after boot, times out to `Home`.
    Startup,
    /// Live telemetry overview.
    Home,
    /// One of the four tabs (0-based).
    Tab(u8),
    /// Read-only field caption (0-based field).
    Label(u8),
    /// Editable field value with blinking cursor (0-based field).
    Value(u8),
    /// Status bar; owns the backlight timeout.
    Status,
    /// Alert / alarm / confirmation pop-up.
    Alert,
}

/// Current visual state of one frame, owned by the core.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameState {
    /// Frame is the active one and on screen.
    pub visible: bool,
    /// Cursor phase for value frames.
    pub cursor_on: bool,
    /// Seconds counted by timer-driven frames.
    pub seconds: u16,
    /// Pending edit steps on a value frame (applied by the content layer).
    pub edit_delta: i16,
}

/// One registry row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameEntry {
    pub id: FrameId,
    pub kind: FrameKind,
    pub area: Area,
}

impl FrameEntry {
    pub const fn new(id: FrameId, kind: FrameKind, area: Area) -> Self {
        Self { id, kind, area }
    }
}

/// Read-only lookup from `FrameId` to its registry row.
///
/// The table may be partial (bring-up, tests); ids without a row are
/// reported as `None` and the dispatcher skips them.
#[derive(Clone, Copy, Debug)]
pub struct FrameRegistry<'a> {
    entries: &'a [FrameEntry],
}

impl<'a> FrameRegistry<'a> {
    pub const fn new(entries: &'a [FrameEntry]) -> Self {
        Self { entries }
    }

    /// The full uphole frame table.
    pub fn standard() -> FrameRegistry<'static> {
        FrameRegistry::new(&STANDARD_FRAMES)
    }

    pub fn get(&self, id: FrameId) -> Option<&'a FrameEntry> {
        // Fast path: rows stored in id order.
        match self.entries.get(id.index()) {
            Some(entry) if entry.id == id => Some(entry),
            _ => self.entries.iter().find(|entry| entry.id == id),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a FrameEntry> {
        self.entries.iter()
    }

    pub fn contains(&self, id: FrameId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

const FULL: Area = Area::new(0, 0, 128, 64);
const BODY: Area = Area::new(0, 10, 128, 44);
const STATUS_BAR: Area = Area::new(0, 54, 128, 10);
const POPUP: Area = Area::new(8, 6, 112, 46);

const fn label_area(field: u16) -> Area {
    Area::new(0, 10 + field * 11, 64, 11)
}

const fn value_area(field: u16) -> Area {
    Area::new(64, 10 + field * 11, 64, 11)
}

/// Frame table of the uphole unit, in `FrameId` order.
pub static STANDARD_FRAMES: [FrameEntry; FrameId::COUNT] = [
    FrameEntry::new(FrameId::Startup, FrameKind::Startup, FULL),
    FrameEntry::new(FrameId::Home, FrameKind::Home, BODY),
    FrameEntry::new(FrameId::Tab1, FrameKind::Tab(0), BODY),
    FrameEntry::new(FrameId::Tab2, FrameKind::Tab(1), BODY),
    FrameEntry::new(FrameId::Tab3, FrameKind::Tab(2), BODY),
    FrameEntry::new(FrameId::Tab4, FrameKind::Tab(3), BODY),
    FrameEntry::new(FrameId::Label1, FrameKind::Label(0), label_area(0)),
    FrameEntry::new(FrameId::Label2, FrameKind::Label(1), label_area(1)),
    FrameEntry::new(FrameId::Label3, FrameKind::Label(2), label_area(2)),
    FrameEntry::new(FrameId::Label4, FrameKind::Label(3), label_area(3)),
    FrameEntry::new(FrameId::Value1, FrameKind::Value(0), value_area(0)),
    FrameEntry::new(FrameId::Value2, FrameKind::Value(1), value_area(1)),
    FrameEntry::new(FrameId::Value3, FrameKind::Value(2), value_area(2)),
    FrameEntry::new(FrameId::Value4, FrameKind::Value(3), value_area(3)),
    FrameEntry::new(FrameId::Status, FrameKind::Status, STATUS_BAR),
    FrameEntry::new(FrameId::Alert, FrameKind::Alert, POPUP),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_is_in_id_order() {
        for (index, entry) in STANDARD_FRAMES.iter().enumerate() {
            assert_eq!(entry.id.index(), index);
        }
        assert_eq!(FrameRegistry::standard().len(), FrameId::COUNT);
    }

    #[test]
    fn from_index_is_bounds_checked() {
        assert_eq!(FrameId::from_index(0), Some(FrameId::Startup));
        assert_eq!(FrameId::from_index(FrameId::COUNT - 1), Some(FrameId::Alert));
        assert_eq!(FrameId::from_index(FrameId::COUNT), None);
        assert_eq!(FrameId::from_index(255), None);
    }

    #[test]
    fn partial_registry_lookup() {
        let rows = [
            FrameEntry::new(FrameId::Status, FrameKind::Status, STATUS_BAR),
            FrameEntry::new(FrameId::Home, FrameKind::Home, BODY),
        ];
        let registry = FrameRegistry::new(&rows);
        assert_eq!(registry.get(FrameId::Home).map(|e| e.kind), Some(FrameKind::Home));
        assert!(registry.contains(FrameId::Status));
        assert!(!registry.contains(FrameId::Tab3));
    }
}
