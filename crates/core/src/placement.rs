//! Swap and move semantics for a dropped entry.
//!
//! The protocol only rewrites positions. It never looks at subjects or
//! teachers, so a drop can produce a double-booked teacher; catching that is
//! left to the backend when the list is saved.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::entry::{Position, ScheduleEntry};

/// What a drop writes back to the owner's entry list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    /// The dragged entry at its new position.
    pub dragged: ScheduleEntry,
    /// The entry that was in the target cell, now at the dragged entry's old
    /// position. `None` for a move into an empty cell.
    pub occupant: Option<ScheduleEntry>,
    /// Where the dragged entry came from.
    pub vacated: Position,
}

impl Placement {
    pub fn is_swap(&self) -> bool {
        self.occupant.is_some()
    }

    /// The rewritten entries, dragged first.
    pub fn updated_entries(&self) -> impl Iterator<Item = &ScheduleEntry> {
        std::iter::once(&self.dragged).chain(self.occupant.iter())
    }

    /// Writes the rewritten entries into `entries`, matching by id. Returns how
    /// many were replaced; ids not present in the list are ignored.
    pub fn apply(&self, entries: &mut [ScheduleEntry]) -> usize {
        let mut replaced = 0;
        for updated in self.updated_entries() {
            if let Some(slot) = entries.iter_mut().find(|entry| entry.id == updated.id) {
                *slot = updated.clone();
                replaced += 1;
            }
        }
        replaced
    }
}

/// Moves `dragged` to `target`, swapping with `occupant` when there is one.
///
/// With an occupant both entries trade positions; without one only the
/// dragged entry moves. Ids, subjects, teachers and notes are untouched, and
/// no entry is ever created or removed.
pub fn place_or_swap(
    dragged: &ScheduleEntry,
    target: &Position,
    occupant: Option<&ScheduleEntry>,
) -> Placement {
    let vacated = dragged.position();

    let placement = Placement {
        dragged: dragged.with_position(target),
        occupant: occupant.map(|other| other.with_position(&vacated)),
        vacated,
    };

    debug!(
        entry_id = %dragged.id,
        occupant_id = occupant.map(|o| o.id.as_str()).unwrap_or("-"),
        target = %target.slot_key(),
        day = %target.day_of_week,
        "Computed placement"
    );

    placement
}
