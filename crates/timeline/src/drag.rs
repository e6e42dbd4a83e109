//! Short-lived drag sessions: created on pointer-down, fed pointer-moves,
//! consumed on pointer-up. At most one exists at a time; release with no
//! session is the caller's no-op. Previews are free-form (the row invariant
//! is restored by the commit on release).

use crate::{layout, ItemId, Timeline};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    /// Drag only the grabbed item; the row repacks around it on release.
    Move,
    /// Everything strictly right of the grabbed item rides along in lockstep
    /// and drops with it as one block.
    MoveLinked,
    /// Right-edge drag; release commits a new base duration.
    Resize,
}

#[derive(Debug, Clone)]
pub struct DragSession {
    item: ItemId,
    mode: DragMode,
    /// Pointer offset inside the item at pointer-down, so the grab point
    /// stays under the cursor.
    grab_offset: f32,
    origin_row: usize,
    linked: Vec<ItemId>,
}

impl DragSession {
    pub fn begin(tl: &Timeline, id: ItemId, pointer_x: f32, mode: DragMode) -> Option<DragSession> {
        let item = tl.item(id)?;
        let linked = match mode {
            DragMode::MoveLinked => tl
                .row_items(item.row)
                .into_iter()
                .filter(|other| other.id != id && other.x > item.x)
                .map(|other| other.id)
                .collect(),
            _ => Vec::new(),
        };
        Some(DragSession {
            item: id,
            mode,
            grab_offset: pointer_x - item.x,
            origin_row: item.row,
            linked,
        })
    }

    pub fn item(&self) -> ItemId {
        self.item
    }

    pub fn mode(&self) -> DragMode {
        self.mode
    }

    pub fn origin_row(&self) -> usize {
        self.origin_row
    }

    /// Current row of the dragged item (tracks reparenting during the drag).
    pub fn current_row(&self, tl: &Timeline) -> usize {
        tl.item(self.item).map(|i| i.row).unwrap_or(self.origin_row)
    }

    /// Free-form preview update. Move modes clamp to `x >= 0`, reparent onto
    /// `row`, and keep the linked group from crossing left of the lead's
    /// right edge; no repacking happens until release.
    pub fn update(&mut self, tl: &mut Timeline, pointer_x: f32, row: usize) {
        match self.mode {
            DragMode::Resize => {
                let scale = tl.time_scale();
                let Some(item) = tl.item_mut(self.item) else {
                    return;
                };
                // Preview only; the duration is rewritten from this width at
                // release. Keep at least one second visible.
                item.width = (pointer_x - item.x).max(scale);
            }
            DragMode::Move | DragMode::MoveLinked => {
                let row = row.min(tl.row_count().saturating_sub(1));
                let new_x = (pointer_x - self.grab_offset).max(0.0);
                let Some(item) = tl.item_mut(self.item) else {
                    return;
                };
                let delta = new_x - item.x;
                item.x = new_x;
                item.row = row;
                let mut cursor = item.end();
                for id in &self.linked {
                    let Some(rider) = tl.item_mut(*id) else {
                        continue;
                    };
                    rider.x = (rider.x + delta).max(cursor);
                    rider.row = row;
                    cursor = rider.end();
                }
            }
        }
    }

    /// Consume the session and restore the row invariant: move drops commit
    /// the ordering implied by the release position, resize commits the
    /// previewed width as a duration.
    pub fn finish(self, tl: &mut Timeline) {
        match self.mode {
            DragMode::Resize => {
                let Some(item) = tl.item(self.item) else {
                    tracing::warn!(id = %self.item, "resize release for unknown item id ignored");
                    return;
                };
                let duration = item.width / tl.time_scale();
                tl.resize_item(self.item, duration);
            }
            DragMode::Move | DragMode::MoveLinked => {
                let landed_row = self.current_row(tl);
                layout::commit_drop(tl, self.item, &self.linked);
                // Moving away from the origin row leaves a hole there; close it.
                if landed_row != self.origin_row {
                    layout::repack_row(tl, self.origin_row);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::protoss_unit;

    fn planner_with_three() -> (Timeline, ItemId, ItemId, ItemId) {
        let mut tl = Timeline::new();
        let a = tl.add_item(protoss_unit("Zealot", 60.0)); // [0, 180)
        let b = tl.add_item(protoss_unit("Stalker", 30.0)); // [180, 270)
        let c = tl.add_item(protoss_unit("Sentry", 26.0)); // [270, 348)
        (tl, a, b, c)
    }

    #[test]
    fn begin_on_a_stale_id_yields_no_session() {
        let (mut tl, a, _, _) = planner_with_three();
        tl.delete_item(a);
        assert!(DragSession::begin(&tl, a, 0.0, DragMode::Move).is_none());
    }

    #[test]
    fn move_preview_is_free_form_and_clamped() {
        let (mut tl, a, _, _) = planner_with_three();
        let mut session = DragSession::begin(&tl, a, 10.0, DragMode::Move).unwrap();
        session.update(&mut tl, -500.0, 0);
        assert_eq!(tl.item(a).unwrap().x, 0.0);
        session.update(&mut tl, 210.0, 0);
        assert_eq!(tl.item(a).unwrap().x, 200.0);
    }

    #[test]
    fn move_commit_reorders_and_repacks() {
        let (mut tl, a, b, c) = planner_with_three();
        // Grab c at its left edge and drop it at the far left.
        let mut session = DragSession::begin(&tl, c, 270.0, DragMode::Move).unwrap();
        session.update(&mut tl, -10.0, 0);
        session.finish(&mut tl);

        assert_eq!(tl.item(c).unwrap().x, 0.0);
        assert_eq!(tl.item(a).unwrap().x, 78.0);
        assert_eq!(tl.item(b).unwrap().x, 258.0);
        assert!(!layout::has_overlap(&tl, 0));
    }

    #[test]
    fn reparenting_commits_on_both_rows() {
        let (mut tl, _, b, _) = planner_with_three();
        tl.add_row();
        let mut session = DragSession::begin(&tl, b, 180.0, DragMode::Move).unwrap();
        session.update(&mut tl, 40.0, 1);
        assert_eq!(session.current_row(&tl), 1);
        session.finish(&mut tl);

        assert_eq!(tl.item(b).unwrap().row, 1);
        assert_eq!(tl.item(b).unwrap().x, 0.0);
        // Source row closed ranks.
        let survivors = tl.row_items(0);
        assert_eq!(survivors.len(), 2);
        assert_eq!(survivors[0].x, 0.0);
        assert_eq!(survivors[1].x, survivors[0].end());
    }

    #[test]
    fn update_clamps_to_the_last_row() {
        let (mut tl, a, _, _) = planner_with_three();
        let mut session = DragSession::begin(&tl, a, 0.0, DragMode::Move).unwrap();
        session.update(&mut tl, 0.0, 99);
        assert_eq!(tl.item(a).unwrap().row, 0);
    }

    #[test]
    fn linked_drag_carries_everything_to_the_right() {
        let (mut tl, a, b, c) = planner_with_three();
        let mut session = DragSession::begin(&tl, b, 180.0, DragMode::MoveLinked).unwrap();
        session.update(&mut tl, 240.0, 0);
        // b moved +60; c rides along.
        assert_eq!(tl.item(b).unwrap().x, 240.0);
        assert_eq!(tl.item(c).unwrap().x, 330.0);
        assert_eq!(tl.item(a).unwrap().x, 0.0);

        session.finish(&mut tl);
        // Release right of a: order a, b, c restored gapless.
        assert_eq!(tl.item(a).unwrap().x, 0.0);
        assert_eq!(tl.item(b).unwrap().x, 180.0);
        assert_eq!(tl.item(c).unwrap().x, 270.0);
    }

    #[test]
    fn linked_riders_never_cross_the_lead() {
        let (mut tl, _, b, c) = planner_with_three();
        let mut session = DragSession::begin(&tl, b, 180.0, DragMode::MoveLinked).unwrap();
        // Drag hard left; c may not end up left of b's right edge.
        session.update(&mut tl, -400.0, 0);
        let lead_end = tl.item(b).unwrap().end();
        assert!(tl.item(c).unwrap().x >= lead_end);
    }

    #[test]
    fn linked_drop_in_front_keeps_group_order() {
        let (mut tl, a, b, c) = planner_with_three();
        let mut session = DragSession::begin(&tl, b, 180.0, DragMode::MoveLinked).unwrap();
        session.update(&mut tl, -10.0, 0);
        session.finish(&mut tl);

        assert_eq!(tl.item(b).unwrap().x, 0.0);
        assert_eq!(tl.item(c).unwrap().x, 90.0);
        assert_eq!(tl.item(a).unwrap().x, 168.0);
        assert!(!layout::has_overlap(&tl, 0));
    }

    #[test]
    fn resize_commits_width_as_duration() {
        let (mut tl, a, b, _) = planner_with_three();
        let mut session = DragSession::begin(&tl, a, 180.0, DragMode::Resize).unwrap();
        session.update(&mut tl, 90.0, 0);
        session.finish(&mut tl);

        let item = tl.item(a).unwrap();
        assert_eq!(item.base_duration, 30.0);
        assert_eq!(item.width, 90.0);
        // Neighbors close up behind the shorter item.
        assert_eq!(tl.item(b).unwrap().x, 90.0);
    }

    #[test]
    fn resize_preview_floors_at_one_second() {
        let (mut tl, a, _, _) = planner_with_three();
        let mut session = DragSession::begin(&tl, a, 180.0, DragMode::Resize).unwrap();
        session.update(&mut tl, -50.0, 0);
        assert_eq!(tl.item(a).unwrap().width, tl.time_scale());
        session.finish(&mut tl);
        assert_eq!(tl.item(a).unwrap().base_duration, 1.0);
    }
}
