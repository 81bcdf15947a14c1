//! Frame-to-frame navigation helpers.

use super::FrameId;

/// Tabs in display order.
pub const TABS: [FrameId; 4] = [FrameId::Tab1, FrameId::Tab2, FrameId::Tab3, FrameId::Tab4];

const LABELS: [FrameId; 4] = [
    FrameId::Label1,
    FrameId::Label2,
    FrameId::Label3,
    FrameId::Label4,
];

const VALUES: [FrameId; 4] = [
    FrameId::Value1,
    FrameId::Value2,
    FrameId::Value3,
    FrameId::Value4,
];

/// Move tab selection one to the left, wrapping to the last tab.
pub fn tab_prev(tab: u8) -> FrameId {
    let count = TABS.len();
    TABS[(tab as usize + count - 1) % count]
}

/// Move tab selection one to the right, wrapping to the first tab.
pub fn tab_next(tab: u8) -> FrameId {
    TABS[(tab as usize + 1) % TABS.len()]
}

/// Caption frame of a field. Out-of-range fields clamp to the last one.
pub fn label_of(field: u8) -> FrameId {
    LABELS[(field as usize).min(LABELS.len() - 1)]
}

/// Value frame of a field. Out-of-range fields clamp to the last one.
pub fn value_of(field: u8) -> FrameId {
    VALUES[(field as usize).min(VALUES.len() - 1)]
}

/// Next field caption below `field`, staying on the last one.
pub fn label_next(field: u8) -> FrameId {
    let next = field as usize + 1;
    if next < LABELS.len() {
        LABELS[next]
    } else {
        label_of(field)
    }
}

/// Field caption above `field`, staying on the first one.
pub fn label_prev(field: u8) -> FrameId {
    LABELS[(field as usize).min(LABELS.len() - 1).saturating_sub(1)]
}
