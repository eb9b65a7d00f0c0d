//! Gesture handling for the timetable grid.
//!
//! [`GridSurface`] is the drag-and-drop state machine
//! (`Idle → Dragging → (dropped | cancelled) → Idle`) plus the rules for which
//! gestures are allowed in which mode. It never touches the entry list; every
//! accepted gesture comes back as a [`GridIntent`] for the owner to act on.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    grid::{CellKey, GridMatrix, TimeSlot},
    models::{
        day::DayOfWeek,
        entry::{Position, ScheduleEntry},
    },
    placement::{place_or_swap, Placement},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridMode {
    #[default]
    ReadOnly,
    Edit,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        entry: ScheduleEntry,
        hovered: Option<CellKey>,
    },
}

/// Something the owner of the grid is asked to do.
#[derive(Debug, Clone, PartialEq)]
pub enum GridIntent {
    /// Show details for an entry.
    Select(ScheduleEntry),
    /// Write a computed move or swap back to the entry list.
    Place(Placement),
    /// Start the add-entry flow for an empty cell.
    Add { day: DayOfWeek, slot: TimeSlot },
    /// Remove an entry from the list.
    Remove(ScheduleEntry),
}

#[derive(Debug, Clone, Default)]
pub struct GridSurface {
    mode: GridMode,
    drag: DragState,
}

impl GridSurface {
    pub fn new(mode: GridMode) -> Self {
        Self {
            mode,
            drag: DragState::Idle,
        }
    }

    pub fn mode(&self) -> GridMode {
        self.mode
    }

    pub fn is_editable(&self) -> bool {
        self.mode == GridMode::Edit
    }

    /// Switching to read-only abandons any drag in progress.
    pub fn set_mode(&mut self, mode: GridMode) {
        self.mode = mode;
        if mode == GridMode::ReadOnly {
            self.on_drag_cancel();
        }
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    pub fn dragged_entry(&self) -> Option<&ScheduleEntry> {
        match &self.drag {
            DragState::Dragging { entry, .. } => Some(entry),
            DragState::Idle => None,
        }
    }

    pub fn hovered_cell(&self) -> Option<&CellKey> {
        match &self.drag {
            DragState::Dragging { hovered, .. } => hovered.as_ref(),
            DragState::Idle => None,
        }
    }

    pub fn is_hovered(&self, day: DayOfWeek, slot_key: &str) -> bool {
        self.hovered_cell()
            .is_some_and(|key| key.day == day && key.slot_key == slot_key)
    }

    /// A click on an entry. Ignored while dragging: a gesture is either a
    /// click or a drag, never both.
    pub fn on_entry_select(&self, entry: &ScheduleEntry) -> Option<GridIntent> {
        if self.is_dragging() {
            return None;
        }
        Some(GridIntent::Select(entry.clone()))
    }

    /// Picks up `entry`. Returns `false` in read-only mode and for entries the
    /// grid does not draw (under a break, or outside the days and slots).
    pub fn on_drag_start(&mut self, matrix: &GridMatrix, entry: &ScheduleEntry) -> bool {
        if !self.is_editable() {
            return false;
        }
        if !matrix.shows(entry) {
            debug!(entry_id = %entry.id, "Entry is not on the grid, drag refused");
            return false;
        }
        debug!(entry_id = %entry.id, "Drag started");
        self.drag = DragState::Dragging {
            entry: entry.clone(),
            hovered: None,
        };
        true
    }

    /// The pointer moved over a cell. Only cells that could take the drop are
    /// highlighted; anything else clears the highlight.
    pub fn on_drag_enter_cell(&mut self, matrix: &GridMatrix, day: DayOfWeek, slot_key: &str) -> bool {
        let DragState::Dragging { hovered, .. } = &mut self.drag else {
            return false;
        };

        let droppable = matrix
            .cell(day, slot_key)
            .is_some_and(|cell| !cell.is_break());

        *hovered = droppable.then(|| CellKey::new(day, slot_key));
        droppable
    }

    /// Drops the dragged entry on `(day, slot_key)`.
    ///
    /// The drag ends whatever happens. A drop back onto the entry's own cell,
    /// onto a break, or outside the grid yields nothing, and so does a drag
    /// whose entry is no longer drawn. Otherwise the placement against the
    /// cell's current occupant is returned.
    pub fn on_drop(&mut self, matrix: &GridMatrix, day: DayOfWeek, slot_key: &str) -> Option<GridIntent> {
        let DragState::Dragging { entry, .. } = std::mem::take(&mut self.drag) else {
            return None;
        };

        if !matrix.shows(&entry) {
            debug!(entry_id = %entry.id, "Dragged entry is no longer on the grid");
            return None;
        }

        if entry.occupies(day, slot_key) {
            debug!(entry_id = %entry.id, "Dropped on own cell, nothing to do");
            return None;
        }

        let cell = matrix.cell(day, slot_key)?;
        if cell.is_break() {
            debug!(entry_id = %entry.id, %day, slot_key, "Drop on break cell ignored");
            return None;
        }

        let slot = matrix.slot(slot_key)?;
        let target = Position::new(day, slot.start.clone(), slot.end.clone());
        Some(GridIntent::Place(place_or_swap(&entry, &target, cell.occupant())))
    }

    /// The platform abandoned the drag. No intent, no mutation.
    pub fn on_drag_cancel(&mut self) {
        if self.is_dragging() {
            debug!("Drag cancelled");
        }
        self.drag = DragState::Idle;
    }

    /// A request to add a lesson, honoured in edit mode on an empty cell only.
    pub fn on_add_request(&self, matrix: &GridMatrix, day: DayOfWeek, slot_key: &str) -> Option<GridIntent> {
        if !self.is_editable() {
            return None;
        }
        let cell = matrix.cell(day, slot_key)?;
        if !cell.is_empty() {
            return None;
        }
        let slot = matrix.slot(slot_key)?.clone();
        Some(GridIntent::Add { day, slot })
    }

    pub fn on_remove_request(&self, entry: &ScheduleEntry) -> Option<GridIntent> {
        self.is_editable().then(|| GridIntent::Remove(entry.clone()))
    }
}
