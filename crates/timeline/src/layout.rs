//! Row-packing layout: insertion points, snap-to-nearest, push/collapse
//! repair, and the full-row repack used on drop and rescale. Pure functions
//! over the [`Timeline`]; no rendering state.

use crate::{ItemId, PlacedItem, Timeline};

/// Boundaries within this distance collapse to one insertion point; absorbs
/// float rounding accumulated across rescales.
const POINT_EPS: f32 = 1e-3;

/// Every legal left-edge position in `row`: 0, both edges of each item in the
/// row, and both edges of every item in every other row (cross-row
/// alignment). Deduplicated, ascending.
pub fn insertion_points(tl: &Timeline, row: usize, exclude: Option<ItemId>) -> Vec<f32> {
    let mut points = vec![0.0f32];
    for item in tl.items.iter().filter(|i| i.row == row && Some(i.id) != exclude) {
        points.push(item.x);
        points.push(item.end());
    }
    for item in tl.items.iter().filter(|i| i.row != row && Some(i.id) != exclude) {
        points.push(item.x);
        points.push(item.end());
    }
    points.sort_by(f32::total_cmp);
    points.dedup_by(|a, b| (*a - *b).abs() <= POINT_EPS);
    points
}

/// Rightmost occupied edge of `row`, 0 when empty.
pub fn row_end(tl: &Timeline, row: usize, exclude: Option<ItemId>) -> f32 {
    tl.items
        .iter()
        .filter(|i| i.row == row && Some(i.id) != exclude)
        .map(PlacedItem::end)
        .fold(0.0, f32::max)
}

/// Snap `desired_x` to the nearest insertion point (ties keep the first, i.e.
/// leftmost, point). Landing left of the row's occupied end shifts the
/// neighbors right by `width` to open the slot.
pub fn find_valid_position(
    tl: &mut Timeline,
    row: usize,
    desired_x: f32,
    width: f32,
    exclude: Option<ItemId>,
) -> f32 {
    let points = insertion_points(tl, row, exclude);
    let mut best = points[0];
    let mut min_distance = (desired_x - best).abs();
    for &point in &points[1..] {
        let distance = (desired_x - point).abs();
        if distance < min_distance {
            best = point;
            min_distance = distance;
        }
    }
    if best < row_end(tl, row, exclude) {
        push_right(tl, row, best, width, exclude);
    }
    best
}

/// Uniform rightward shift of every item in `row` with `x >= insert_x`.
/// `insert_x` is evaluated once; the shift never reads a just-moved neighbor.
pub fn push_right(tl: &mut Timeline, row: usize, insert_x: f32, insert_width: f32, exclude: Option<ItemId>) {
    for item in tl
        .items
        .iter_mut()
        .filter(|i| i.row == row && Some(i.id) != exclude)
    {
        if item.x >= insert_x {
            item.x += insert_width;
        }
    }
}

/// Inverse of [`push_right`]: close a vacated `[gap_start_x, gap_start_x +
/// gap_width)` span by shifting everything right of it back left, floored at
/// 0.
pub fn collapse_gap(tl: &mut Timeline, row: usize, gap_start_x: f32, gap_width: f32, exclude: Option<ItemId>) {
    for item in tl
        .items
        .iter_mut()
        .filter(|i| i.row == row && Some(i.id) != exclude)
    {
        if item.x > gap_start_x {
            item.x = (item.x - gap_width).max(0.0);
        }
    }
}

/// Full repack: sort the row by current `x`, reassign as a running sum of
/// widths from 0. The recovery pass after a rescale; exact, no drift.
pub fn repack_row(tl: &mut Timeline, row: usize) {
    let mut order: Vec<usize> = (0..tl.items.len())
        .filter(|&i| tl.items[i].row == row)
        .collect();
    order.sort_by(|&a, &b| tl.items[a].x.total_cmp(&tl.items[b].x));
    let mut cursor = 0.0;
    for idx in order {
        tl.items[idx].x = cursor;
        cursor += tl.items[idx].width;
    }
}

/// Commit a released drag: derive the dropped group's insertion index from
/// the lead item's `x` against each stationary neighbor (first neighbor at or
/// right of the drop marks the slot; none means the end), then repack the
/// whole row from 0 in that order. `linked` is empty for a single-item drag.
pub fn commit_drop(tl: &mut Timeline, lead: ItemId, linked: &[ItemId]) {
    let Some(lead_item) = tl.item(lead) else {
        tracing::warn!(%lead, "drop commit for unknown item id ignored");
        return;
    };
    let row = lead_item.row;
    let drop_x = lead_item.x;

    let mut stationary: Vec<usize> = (0..tl.items.len())
        .filter(|&i| {
            let item = &tl.items[i];
            item.row == row && item.id != lead && !linked.contains(&item.id)
        })
        .collect();
    stationary.sort_by(|&a, &b| tl.items[a].x.total_cmp(&tl.items[b].x));

    let mut insert_index = stationary.len();
    for (pos, &idx) in stationary.iter().enumerate() {
        if drop_x <= tl.items[idx].x {
            insert_index = pos;
            break;
        }
    }

    let group: Vec<usize> = std::iter::once(lead)
        .chain(linked.iter().copied())
        .filter_map(|id| tl.items.iter().position(|i| i.id == id))
        .collect();

    let mut order = stationary;
    order.splice(insert_index..insert_index, group);

    let mut cursor = 0.0;
    for idx in order {
        tl.items[idx].x = cursor;
        cursor += tl.items[idx].width;
    }
}

/// True when any two live items of one row overlap on `[x, x + width)`.
pub fn has_overlap(tl: &Timeline, row: usize) -> bool {
    let items = tl.row_items(row);
    items
        .windows(2)
        .any(|pair| pair[1].x < pair[0].end() - POINT_EPS)
}
