use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::slots::TimeSlot;
use crate::models::{
    day::DayOfWeek,
    entry::{BreakSlot, ScheduleEntry},
};

/// Address of a grid cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellKey {
    pub day: DayOfWeek,
    pub slot_key: String,
}

impl CellKey {
    pub fn new(day: DayOfWeek, slot_key: impl Into<String>) -> Self {
        Self {
            day,
            slot_key: slot_key.into(),
        }
    }
}

/// Contents of one `(day, slot)` cell.
///
/// Entries and the break are stored side by side, but a break always wins
/// when the cell is read: a break cell shows no lesson and accepts no drop.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridCell {
    entries: Vec<ScheduleEntry>,
    break_slot: Option<BreakSlot>,
}

impl GridCell {
    /// Every entry placed here, including ones hidden by a break.
    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn break_slot(&self) -> Option<&BreakSlot> {
        self.break_slot.as_ref()
    }

    pub fn is_break(&self) -> bool {
        self.break_slot.is_some()
    }

    /// Entries as the table shows them.
    pub fn visible_entries(&self) -> &[ScheduleEntry] {
        if self.is_break() { &[] } else { self.entries.as_slice() }
    }

    /// The entry a drop onto this cell would swap with.
    pub fn occupant(&self) -> Option<&ScheduleEntry> {
        self.visible_entries().first()
    }

    /// Neither a break nor any lesson.
    pub fn is_empty(&self) -> bool {
        !self.is_break() && self.entries.is_empty()
    }
}

/// Entries and breaks projected onto `days × slots`.
#[derive(Debug, Clone, Default)]
pub struct GridMatrix {
    days: Vec<DayOfWeek>,
    slots: Vec<TimeSlot>,
    cells: HashMap<CellKey, GridCell>,
}

impl GridMatrix {
    pub fn days(&self) -> &[DayOfWeek] {
        &self.days
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn slot(&self, slot_key: &str) -> Option<&TimeSlot> {
        self.slots.iter().find(|slot| slot.key() == slot_key)
    }

    /// Number of cells, always `days × slots`.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell(&self, day: DayOfWeek, slot_key: &str) -> Option<&GridCell> {
        self.cells.get(&CellKey::new(day, slot_key))
    }

    pub fn occupant(&self, day: DayOfWeek, slot_key: &str) -> Option<&ScheduleEntry> {
        self.cell(day, slot_key).and_then(GridCell::occupant)
    }

    pub fn is_break(&self, day: DayOfWeek, slot_key: &str) -> bool {
        self.cell(day, slot_key).is_some_and(GridCell::is_break)
    }

    /// Whether `entry` is drawn: its own cell exists and is not a break.
    pub fn shows(&self, entry: &ScheduleEntry) -> bool {
        self.cell(entry.day_of_week, &entry.slot_key())
            .is_some_and(|cell| cell.visible_entries().iter().any(|shown| shown.id == entry.id))
    }

    /// Row-major snapshot for drawing: one row per slot, one cell per day.
    pub fn to_view(&self) -> GridView {
        let rows = self
            .slots
            .iter()
            .map(|slot| {
                let key = slot.key();
                let cells = self
                    .days
                    .iter()
                    .map(|&day| {
                        let cell = self.cell(day, &key).cloned().unwrap_or_default();
                        CellView {
                            day,
                            is_empty: cell.is_empty(),
                            entries: cell.visible_entries().to_vec(),
                            break_slot: cell.break_slot,
                        }
                    })
                    .collect();
                GridRow {
                    slot: slot.clone(),
                    slot_key: key,
                    cells,
                }
            })
            .collect();

        GridView {
            days: self.days.clone(),
            rows,
        }
    }
}

/// Builds the matrix for `days` and `slots`.
///
/// Every `(day, slot)` pair gets a cell, empty to begin with. Entries and
/// breaks land in the cell of their own day and `start-end` key; anything that
/// matches no cell is left out of the grid without complaint (it stays in the
/// caller's list). Repeated days are only counted once.
pub fn build_matrix(
    days: &[DayOfWeek],
    slots: &[TimeSlot],
    entries: &[ScheduleEntry],
    breaks: &[BreakSlot],
) -> GridMatrix {
    let mut unique_days: Vec<DayOfWeek> = Vec::with_capacity(days.len());
    for day in days {
        if !unique_days.contains(day) {
            unique_days.push(*day);
        }
    }

    let mut cells = HashMap::with_capacity(unique_days.len() * slots.len());
    for &day in &unique_days {
        for slot in slots {
            cells.insert(CellKey::new(day, slot.key()), GridCell::default());
        }
    }

    let mut skipped = 0usize;
    for entry in entries {
        match cells.get_mut(&CellKey::new(entry.day_of_week, entry.slot_key())) {
            Some(cell) => cell.entries.push(entry.clone()),
            None => skipped += 1,
        }
    }

    for break_slot in breaks {
        match cells.get_mut(&CellKey::new(break_slot.day_of_week, break_slot.slot_key())) {
            Some(cell) => cell.break_slot = Some(break_slot.clone()),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!(skipped, "Items outside the grid were left out of the matrix");
    }

    GridMatrix {
        days: unique_days,
        slots: slots.to_vec(),
        cells,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridView {
    pub days: Vec<DayOfWeek>,
    pub rows: Vec<GridRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRow {
    pub slot: TimeSlot,
    pub slot_key: String,
    pub cells: Vec<CellView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellView {
    pub day: DayOfWeek,
    pub entries: Vec<ScheduleEntry>,
    pub break_slot: Option<BreakSlot>,
    pub is_empty: bool,
}
