use serde::{Deserialize, Serialize};
use thiserror::Error;

use catalog::{Entity, EntityKind, Race};

pub mod drag;
pub mod layout;
mod model;

pub use drag::{DragMode, DragSession};

#[derive(Debug, Error)]
pub enum TimelineError {
    #[error("cannot delete the last remaining row")]
    LastRow,
}

pub const MIN_TIME_SCALE: f32 = 0.5;
pub const MAX_TIME_SCALE: f32 = 10.0;
pub const DEFAULT_TIME_SCALE: f32 = 3.0;

/// Seconds shaved off per boost, and the base-duration interval granting one
/// boost slot (one per full 30 s).
pub const BOOST_SECONDS: f32 = 10.0;
pub const BOOST_INTERVAL: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(u64);

impl ItemId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A catalog entity instantiated onto a row. The entity is a copy, so
/// per-placement duration changes never touch the catalog or sibling
/// placements of the same entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedItem {
    pub id: ItemId,
    pub row: usize,
    /// Pixels from the row origin; never negative.
    pub x: f32,
    /// Derived: `effective_duration * time_scale`. Never authored directly.
    pub width: f32,
    pub entity: Entity,
    /// Seconds; snapshot of the entity duration at placement, changed only by
    /// an explicit resize.
    pub base_duration: f32,
    pub boost_count: u32,
}

impl PlacedItem {
    pub fn effective_duration(&self) -> f32 {
        self.base_duration - BOOST_SECONDS * self.boost_count as f32
    }

    pub fn max_boosts(&self) -> u32 {
        (self.base_duration / BOOST_INTERVAL).floor() as u32
    }

    pub fn boost_eligible(&self) -> bool {
        self.entity.race == Race::Protoss
            && matches!(self.entity.kind, EntityKind::Unit | EntityKind::Upgrade)
    }

    pub fn boosted(&self) -> bool {
        self.boost_count > 0
    }

    /// Right edge in pixels.
    pub fn end(&self) -> f32 {
        self.x + self.width
    }

    pub fn start_time(&self, time_scale: f32) -> f32 {
        self.x / time_scale
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RowStats {
    pub end_time: f32,
    pub total_minerals: u32,
    pub total_gas: u32,
}

/// The chart: placed items, row count, and the seconds-to-pixels mapping.
/// Single source of truth; rendering is a projection of this state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeline {
    pub(crate) items: Vec<PlacedItem>,
    pub(crate) row_count: usize,
    pub(crate) time_scale: f32,
    pub(crate) next_id: u64,
    pub(crate) selected: Option<ItemId>,
}

impl Default for Timeline {
    fn default() -> Self {
        Timeline::new()
    }
}

impl Timeline {
    pub fn new() -> Self {
        Timeline {
            items: Vec::new(),
            row_count: 1,
            time_scale: DEFAULT_TIME_SCALE,
            next_id: 0,
            selected: None,
        }
    }

    pub fn items(&self) -> &[PlacedItem] {
        &self.items
    }

    pub fn item(&self, id: ItemId) -> Option<&PlacedItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub(crate) fn item_mut(&mut self, id: ItemId) -> Option<&mut PlacedItem> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    /// Items of one row, left to right.
    pub fn row_items(&self, row: usize) -> Vec<&PlacedItem> {
        let mut out: Vec<&PlacedItem> = self.items.iter().filter(|i| i.row == row).collect();
        out.sort_by(|a, b| a.x.total_cmp(&b.x));
        out
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn selected(&self) -> Option<ItemId> {
        self.selected
    }

    pub fn select(&mut self, id: Option<ItemId>) {
        self.selected = match id {
            Some(id) if self.item(id).is_none() => {
                tracing::warn!(%id, "select for unknown item id ignored");
                None
            }
            other => other,
        };
    }

    pub(crate) fn fresh_id(&mut self) -> ItemId {
        let id = ItemId(self.next_id);
        self.next_id += 1;
        id
    }
}

/// `minutes:seconds`, seconds zero-padded, minutes unbounded.
pub fn format_time(seconds: f32) -> String {
    let minutes = (seconds / 60.0).floor() as i64;
    let secs = (seconds.round() as i64).rem_euclid(60);
    format!("{minutes}:{secs:02}")
}

#[cfg(test)]
pub(crate) mod test_support {
    use catalog::{Entity, EntityKind, Race};

    pub fn entity(name: &str, race: Race, kind: EntityKind, duration: f32) -> Entity {
        Entity {
            name: name.to_string(),
            race,
            kind,
            minerals: 100,
            gas: 25,
            duration,
            supply: 2.0,
            requires: Vec::new(),
            produces: Vec::new(),
            unlocks: Vec::new(),
            icon: None,
        }
    }

    pub fn protoss_unit(name: &str, duration: f32) -> Entity {
        entity(name, Race::Protoss, EntityKind::Unit, duration)
    }

    pub fn terran_building(name: &str, duration: f32) -> Entity {
        entity(name, Race::Terran, EntityKind::Building, duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_time_pads_seconds() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(9.0), "0:09");
        assert_eq!(format_time(60.0), "1:00");
        assert_eq!(format_time(90.0), "1:30");
        assert_eq!(format_time(754.0), "12:34");
    }

    #[test]
    fn format_time_rounds_seconds() {
        assert_eq!(format_time(89.6), "1:30");
        // Minutes floor while seconds round; 59.6 rounds to a full minute.
        assert_eq!(format_time(59.6), "0:00");
    }

    #[test]
    fn ids_are_never_reused() {
        let mut tl = Timeline::new();
        let a = tl.add_item(test_support::protoss_unit("Zealot", 27.0));
        tl.delete_item(a);
        let b = tl.add_item(test_support::protoss_unit("Stalker", 30.0));
        assert_ne!(a, b);
    }

    #[test]
    fn selecting_stale_id_clears_selection() {
        let mut tl = Timeline::new();
        let a = tl.add_item(test_support::protoss_unit("Zealot", 27.0));
        tl.select(Some(a));
        tl.delete_item(a);
        assert_eq!(tl.selected(), None);
        tl.select(Some(a));
        assert_eq!(tl.selected(), None);
    }
}
