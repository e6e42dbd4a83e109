use catalog::Entity;

use crate::{layout, ItemId, PlacedItem, RowStats, Timeline, TimelineError, MAX_TIME_SCALE, MIN_TIME_SCALE};

impl Timeline {
    /// Place a catalog entity at the end of the last row.
    pub fn add_item(&mut self, entity: Entity) -> ItemId {
        let width = entity.duration * self.time_scale;
        let row = self.row_count - 1;
        let desired = layout::row_end(self, row, None);
        let x = layout::find_valid_position(self, row, desired, width, None);
        let id = self.fresh_id();
        self.items.push(PlacedItem {
            id,
            row,
            x,
            width,
            base_duration: entity.duration,
            boost_count: 0,
            entity,
        });
        id
    }

    /// Remove an item and close the gap it leaves. Unknown ids are ignored;
    /// stale references from in-flight handlers must not break the loop.
    pub fn delete_item(&mut self, id: ItemId) {
        let Some(pos) = self.items.iter().position(|i| i.id == id) else {
            tracing::warn!(%id, "delete for unknown item id ignored");
            return;
        };
        let removed = self.items.swap_remove(pos);
        if self.selected == Some(id) {
            self.selected = None;
        }
        layout::collapse_gap(self, removed.row, removed.x, removed.width, None);
    }

    /// Change pixels-per-second, clamped to `[0.5, 10]`. Every width is
    /// rederived from its effective duration and every row repacked, so the
    /// result is identical no matter how often the same scale is applied.
    pub fn rescale(&mut self, new_scale: f32) {
        self.time_scale = new_scale.clamp(MIN_TIME_SCALE, MAX_TIME_SCALE);
        let scale = self.time_scale;
        for item in &mut self.items {
            item.width = item.effective_duration() * scale;
        }
        for row in 0..self.row_count {
            layout::repack_row(self, row);
        }
    }

    /// Add or remove boosts on a Protoss unit/upgrade placement. The count is
    /// clamped to `[0, floor(base/30)]`; each boost takes 10 s off the
    /// effective duration. Width changes, so the row repacks.
    pub fn apply_boost(&mut self, id: ItemId, delta: i32) {
        let scale = self.time_scale;
        let Some(item) = self.item_mut(id) else {
            tracing::warn!(%id, "boost for unknown item id ignored");
            return;
        };
        if !item.boost_eligible() {
            tracing::debug!(%id, name = %item.entity.name, "boost on ineligible entity ignored");
            return;
        }
        let max = item.max_boosts() as i64;
        item.boost_count = (item.boost_count as i64 + delta as i64).clamp(0, max) as u32;
        item.width = item.effective_duration() * scale;
        let row = item.row;
        layout::repack_row(self, row);
    }

    /// Rewrite the placement's base duration (resize handle commit). Width is
    /// rederived, the boost cap re-clamped, the row repacked.
    pub fn resize_item(&mut self, id: ItemId, new_duration: f32) {
        let scale = self.time_scale;
        let Some(item) = self.item_mut(id) else {
            tracing::warn!(%id, "resize for unknown item id ignored");
            return;
        };
        item.base_duration = new_duration.max(1.0);
        item.boost_count = item.boost_count.min(item.max_boosts());
        item.width = item.effective_duration() * scale;
        let row = item.row;
        layout::repack_row(self, row);
    }

    pub fn add_row(&mut self) {
        self.row_count += 1;
    }

    /// Delete every item in a row; the row itself stays.
    pub fn clear_row(&mut self, row: usize) {
        if row >= self.row_count {
            tracing::warn!(row, "clear for out-of-range row ignored");
            return;
        }
        if let Some(sel) = self.selected {
            if self.item(sel).map(|i| i.row) == Some(row) {
                self.selected = None;
            }
        }
        self.items.retain(|i| i.row != row);
    }

    /// Remove a row with its items and renumber everything above it down by
    /// one. The sole remaining row cannot be deleted.
    pub fn delete_row(&mut self, row: usize) -> Result<(), TimelineError> {
        if self.row_count <= 1 {
            return Err(TimelineError::LastRow);
        }
        if row >= self.row_count {
            tracing::warn!(row, "delete for out-of-range row ignored");
            return Ok(());
        }
        self.clear_row(row);
        for item in &mut self.items {
            if item.row > row {
                item.row -= 1;
            }
        }
        self.row_count -= 1;
        Ok(())
    }

    /// Pack the row against the left edge, preserving order.
    pub fn align_left(&mut self, row: usize) {
        if row >= self.row_count {
            tracing::warn!(row, "align for out-of-range row ignored");
            return;
        }
        layout::repack_row(self, row);
    }

    /// Pack the row so its last item ends where the previous row ends
    /// (left-clamped when the row is wider than that span).
    pub fn align_right(&mut self, row: usize) {
        if row >= self.row_count {
            tracing::warn!(row, "align for out-of-range row ignored");
            return;
        }
        let mut order: Vec<usize> = (0..self.items.len())
            .filter(|&i| self.items[i].row == row)
            .collect();
        if order.is_empty() {
            return;
        }
        order.sort_by(|&a, &b| self.items[a].x.total_cmp(&self.items[b].x));
        let total_width: f32 = order.iter().map(|&i| self.items[i].width).sum();
        let alignment_x = if row == 0 {
            0.0
        } else {
            layout::row_end(self, row - 1, None)
        };
        let mut cursor = (alignment_x - total_width).max(0.0);
        for idx in order {
            self.items[idx].x = cursor;
            cursor += self.items[idx].width;
        }
    }

    pub fn row_stats(&self, row: usize) -> RowStats {
        let mut stats = RowStats::default();
        for item in self.items.iter().filter(|i| i.row == row) {
            stats.end_time = stats.end_time.max(item.end() / self.time_scale);
            stats.total_minerals += item.entity.minerals;
            stats.total_gas += item.entity.gas;
        }
        stats
    }

    /// Ruler extent in seconds: at least five minutes, rounded up to a half
    /// minute past the furthest right edge.
    pub fn max_time_span(&self) -> f32 {
        let max_end = self
            .items
            .iter()
            .map(|i| i.end() / self.time_scale)
            .fold(0.0, f32::max);
        if max_end == 0.0 {
            return 300.0;
        }
        300f32.max((max_end / 30.0).ceil() * 30.0)
    }
}
