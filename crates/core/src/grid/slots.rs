use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::entry::{slot_key, BreakSlot, ScheduleEntry};

/// One row of the grid: a `(start, end)` pair seen on at least one entry or
/// break.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: String,
    pub end: String,
}

impl TimeSlot {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// `"HH:MM-HH:MM"`, the key cells are addressed by.
    pub fn key(&self) -> String {
        slot_key(&self.start, &self.end)
    }
}

/// Derives the row axis from every entry and break time.
///
/// Rows are distinct `(start, end)` pairs ordered by start time and then by
/// end time. `HH:MM` strings compare correctly as plain strings, so no parsing
/// is involved. Empty input gives no rows; callers show an empty state rather
/// than an empty table.
pub fn derive_slots(entries: &[ScheduleEntry], breaks: &[BreakSlot]) -> Vec<TimeSlot> {
    let times = entries
        .iter()
        .map(|entry| (&entry.start_time, &entry.end_time))
        .chain(breaks.iter().map(|b| (&b.start_time, &b.end_time)));

    // Tuple ordering on a BTreeSet gives dedup plus the (start, end) sort.
    let distinct: BTreeSet<(&String, &String)> = times.collect();

    distinct
        .into_iter()
        .map(|(start, end)| TimeSlot::new(start.clone(), end.clone()))
        .collect()
}
