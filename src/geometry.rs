//! Pure carousel geometry
//!
//! Everything here is a function of (indices, drag offset, layout metrics);
//! no state, no time. The slot arithmetic is shared between the live Reorder
//! preview and the commit-time nearest-slot scan so the preview can never
//! disagree with the final order.

use crate::constants::layout;
use crate::types::CardGeometry;

/// Container and card dimensions the geometry is computed against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutMetrics {
    pub container_width: f32,
    pub container_height: f32,
    pub card_width: f32,
    pub card_gap: f32,
}

impl LayoutMetrics {
    /// Metrics for a container, with the default card dimensions.
    pub fn new(container_width: f32, container_height: f32) -> Self {
        Self {
            container_width,
            container_height,
            card_width: layout::CARD_WIDTH,
            card_gap: layout::CARD_GAP,
        }
    }

    pub fn center_x(&self) -> f32 {
        self.container_width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.container_height / 2.0
    }

    /// Center-to-center distance between adjacent Browse cards.
    pub fn browse_pitch(&self) -> f32 {
        self.card_width + self.card_gap
    }

    pub fn reorder_card_width(&self) -> f32 {
        self.card_width * layout::REORDER_SCALE
    }

    /// Center-to-center distance between adjacent Reorder slots.
    pub fn slot_pitch(&self) -> f32 {
        self.reorder_card_width() + layout::REORDER_GAP
    }

    /// Center-x of a Reorder slot when `count` slots are centered in the row.
    pub fn slot_center_x(&self, slot: usize, count: usize) -> f32 {
        let count = count.max(1);
        let row_width = count as f32 * self.slot_pitch() - layout::REORDER_GAP;
        let row_start = self.center_x() - row_width / 2.0 + self.reorder_card_width() / 2.0;
        row_start + slot as f32 * self.slot_pitch()
    }
}

/// Browse-mode geometry for all cards.
///
/// Card `i` centers at `(i - selected) * pitch` from the container center,
/// shifted by the live drag offset while a paging gesture is in flight. The
/// focused card is full-size and topmost; neighbors stack by distance.
pub fn browse_frame(
    count: usize,
    selected: usize,
    live_drag_offset: f32,
    metrics: &LayoutMetrics,
) -> Vec<CardGeometry> {
    let selected = selected.min(count.saturating_sub(1));
    (0..count)
        .map(|i| {
            let focused = i == selected;
            let distance = i.abs_diff(selected);
            CardGeometry {
                x: metrics.center_x()
                    + (i as f32 - selected as f32) * metrics.browse_pitch()
                    + live_drag_offset,
                y: metrics.center_y(),
                scale: if focused { 1.0 } else { layout::UNFOCUSED_SCALE },
                opacity: if focused { 1.0 } else { layout::UNFOCUSED_OPACITY },
                z_order: (count - distance) as u32,
                is_focused: focused,
                is_being_dragged: false,
            }
        })
        .collect()
}

/// Reorder-mode geometry for all cards.
///
/// All cards sit in one centered row of reduced slots. While a card is being
/// dragged it follows the (clamped) offset and every other card renders at
/// its effective slot, producing the live "make room" preview.
pub fn reorder_frame(
    count: usize,
    selected: usize,
    drag: Option<(usize, f32)>,
    metrics: &LayoutMetrics,
) -> Vec<CardGeometry> {
    let pitch = metrics.slot_pitch();
    let drag = drag
        .filter(|(dragged, _)| *dragged < count)
        .map(|(dragged, offset)| (dragged, clamp_drag_offset(dragged, offset, pitch, count)));
    let target = drag.map(|(dragged, offset)| {
        target_index(dragged, position_change(offset, pitch), count)
    });

    (0..count)
        .map(|i| {
            let (x, scale, z_order, dragging) = match (drag, target) {
                (Some((dragged, offset)), _) if i == dragged => (
                    metrics.slot_center_x(dragged, count) + offset,
                    layout::REORDER_DRAGGED_SCALE,
                    count as u32,
                    true,
                ),
                (Some((dragged, _)), Some(target)) => (
                    metrics.slot_center_x(effective_slot(i, dragged, target), count),
                    layout::REORDER_SCALE,
                    i as u32,
                    false,
                ),
                _ => (
                    metrics.slot_center_x(i, count),
                    layout::REORDER_SCALE,
                    i as u32,
                    false,
                ),
            };
            CardGeometry {
                x,
                y: metrics.center_y(),
                scale,
                opacity: 1.0,
                z_order,
                is_focused: i == selected,
                is_being_dragged: dragging,
            }
        })
        .collect()
}

/// Clamp a drag offset so the dragged card's projected center stays within
/// the first and last slot centers.
pub fn clamp_drag_offset(dragged: usize, offset: f32, pitch: f32, count: usize) -> f32 {
    if count == 0 || pitch <= 0.0 {
        return 0.0;
    }
    let dragged = dragged.min(count - 1);
    let min = -(dragged as f32) * pitch;
    let max = (count - 1 - dragged) as f32 * pitch;
    offset.clamp(min, max)
}

/// Whole slots the drag offset has covered, rounding half away from zero.
pub fn position_change(offset: f32, pitch: f32) -> i32 {
    if pitch <= 0.0 {
        return 0;
    }
    (offset / pitch).round() as i32
}

/// Slot the dragged card would land in, clamped to the row.
pub fn target_index(dragged: usize, change: i32, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    (dragged as i64 + change as i64).clamp(0, count as i64 - 1) as usize
}

/// Effective slot of a non-dragged card during the live preview.
///
/// Cards between the dragged card's home slot and its target slide one slot
/// toward the hole the drag opened; everything else stays put.
pub fn effective_slot(index: usize, dragged: usize, target: usize) -> usize {
    if dragged < target && index > dragged && index <= target {
        index - 1
    } else if dragged > target && index >= target && index < dragged {
        index + 1
    } else {
        index
    }
}

/// Slot whose center is nearest the dragged card's final projected position.
///
/// Linear scan; ties break toward the direction of travel, so a release at
/// exactly half a pitch lands where `position_change` rounds to. Must agree
/// with the preview's target slot for every reachable offset.
pub fn commit_slot(dragged: usize, offset: f32, metrics: &LayoutMetrics, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    let dragged = dragged.min(count - 1);
    let offset = clamp_drag_offset(dragged, offset, metrics.slot_pitch(), count);
    let projected = metrics.slot_center_x(dragged, count) + offset;

    let mut best = dragged;
    let mut best_distance = f32::INFINITY;
    for slot in 0..count {
        let distance = (projected - metrics.slot_center_x(slot, count)).abs();
        let tie_toward_travel = distance == best_distance && offset > 0.0 && slot > best;
        if distance < best_distance || tie_toward_travel {
            best = slot;
            best_distance = distance;
        }
    }
    best
}
