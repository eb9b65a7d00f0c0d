//! The owner of a timetable's entry list.
//!
//! [`TimetableEditor`] holds the authoritative list for one class, rebuilds the
//! grid from it, feeds gestures to a [`GridSurface`] and applies the intents
//! that come back. Edits stay in memory until the caller takes
//! [`TimetableEditor::save_payload`] to the backend and confirms with
//! [`TimetableEditor::mark_saved`], or throws them away with
//! [`TimetableEditor::discard`].

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    errors::{TimetableError, TimetableResult},
    grid::{build_matrix, derive_slots, GridMatrix, TimeSlot},
    models::{
        day::DayOfWeek,
        entry::{BreakSlot, EntryDraft, Period, Position, ScheduleEntry},
    },
    placement::Placement,
    surface::{GridIntent, GridMode, GridSurface},
};

/// What gets sent to the backend on save. Temporary ids are left in place for
/// the backend to replace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePayload {
    pub entries: Vec<ScheduleEntry>,
    pub temporary_count: usize,
}

#[derive(Debug, Clone)]
pub struct TimetableEditor {
    entries: Vec<ScheduleEntry>,
    saved: Vec<ScheduleEntry>,
    breaks: Vec<BreakSlot>,
    days: Vec<DayOfWeek>,
    surface: GridSurface,
    dirty: bool,
}

impl TimetableEditor {
    pub fn new(
        entries: Vec<ScheduleEntry>,
        breaks: Vec<BreakSlot>,
        days: Vec<DayOfWeek>,
        mode: GridMode,
    ) -> Self {
        info!(entries = entries.len(), breaks = breaks.len(), ?mode, "Opened timetable editor");
        Self {
            saved: entries.clone(),
            entries,
            breaks,
            days,
            surface: GridSurface::new(mode),
            dirty: false,
        }
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn breaks(&self) -> &[BreakSlot] {
        &self.breaks
    }

    pub fn days(&self) -> &[DayOfWeek] {
        &self.days
    }

    pub fn surface(&self) -> &GridSurface {
        &self.surface
    }

    pub fn mode(&self) -> GridMode {
        self.surface.mode()
    }

    pub fn set_mode(&mut self, mode: GridMode) {
        self.surface.set_mode(mode);
    }

    pub fn entry(&self, entry_id: &str) -> Option<&ScheduleEntry> {
        self.entries.iter().find(|entry| entry.id == entry_id)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn slots(&self) -> Vec<TimeSlot> {
        derive_slots(&self.entries, &self.breaks)
    }

    /// The grid for the current, possibly unsaved, list.
    pub fn matrix(&self) -> GridMatrix {
        build_matrix(&self.days, &self.slots(), &self.entries, &self.breaks)
    }

    /// A click on an entry. `None` while a drag is in progress.
    pub fn select(&self, entry_id: &str) -> TimetableResult<Option<ScheduleEntry>> {
        let entry = self.find(entry_id)?;
        Ok(match self.surface.on_entry_select(entry) {
            Some(GridIntent::Select(selected)) => Some(selected),
            _ => None,
        })
    }

    /// Picks up an entry. `Ok(false)` in read-only mode or when the entry is
    /// not drawn on the grid.
    pub fn drag_start(&mut self, entry_id: &str) -> TimetableResult<bool> {
        let entry = self.find(entry_id)?.clone();
        let matrix = self.matrix();
        Ok(self.surface.on_drag_start(&matrix, &entry))
    }

    pub fn drag_enter(&mut self, day: DayOfWeek, slot_key: &str) -> bool {
        let matrix = self.matrix();
        self.surface.on_drag_enter_cell(&matrix, day, slot_key)
    }

    /// Ends the drag on `(day, slot_key)` and applies the resulting move or
    /// swap to the list. `None` when the drop was filtered out.
    pub fn drop_at(&mut self, day: DayOfWeek, slot_key: &str) -> Option<Placement> {
        let matrix = self.matrix();
        match self.surface.on_drop(&matrix, day, slot_key)? {
            GridIntent::Place(placement) => {
                let replaced = placement.apply(&mut self.entries);
                debug!(replaced, swap = placement.is_swap(), "Applied placement");
                self.dirty = true;
                Some(placement)
            }
            _ => None,
        }
    }

    pub fn drag_cancel(&mut self) {
        self.surface.on_drag_cancel();
    }

    /// Adds a lesson to an empty cell under a temporary id.
    pub fn add_entry(
        &mut self,
        day: DayOfWeek,
        slot_key: &str,
        draft: EntryDraft,
    ) -> TimetableResult<ScheduleEntry> {
        if !self.surface.is_editable() {
            return Err(TimetableError::Validation("Timetable is read-only".to_string()));
        }

        let matrix = self.matrix();
        if matrix.cell(day, slot_key).is_none() {
            return Err(TimetableError::NotFound(format!("No cell for {} {}", day, slot_key)));
        }

        let Some(GridIntent::Add { day, slot }) = self.surface.on_add_request(&matrix, day, slot_key) else {
            return Err(TimetableError::Conflict(format!("Cell {} {} is not empty", day, slot_key)));
        };

        self.push_entry(Position::new(day, slot.start, slot.end), draft)
    }

    /// Adds a lesson at explicit times, creating the slot row if it is new.
    ///
    /// This is how an empty timetable gets its first lesson. The day must be
    /// one of the columns; an existing cell at that position must be empty.
    pub fn add_entry_at(&mut self, position: Position, draft: EntryDraft) -> TimetableResult<ScheduleEntry> {
        if !self.surface.is_editable() {
            return Err(TimetableError::Validation("Timetable is read-only".to_string()));
        }
        position.validate()?;

        let day = position.day_of_week;
        if !self.days.contains(&day) {
            return Err(TimetableError::Validation(format!("{} is not a timetable day", day)));
        }

        let slot_key = position.slot_key();
        if let Some(cell) = self.matrix().cell(day, &slot_key) {
            if cell.is_break() {
                return Err(TimetableError::Conflict(format!("Cell {} {} is a break", day, slot_key)));
            }
            if !cell.is_empty() {
                return Err(TimetableError::Conflict(format!("Cell {} {} is not empty", day, slot_key)));
            }
        }

        self.push_entry(position, draft)
    }

    /// Removes an entry from the list. Not allowed in read-only mode.
    pub fn remove_entry(&mut self, entry_id: &str) -> TimetableResult<ScheduleEntry> {
        let entry = self.find(entry_id)?;
        if self.surface.on_remove_request(entry).is_none() {
            return Err(TimetableError::Validation("Timetable is read-only".to_string()));
        }

        if self.surface.dragged_entry().is_some_and(|dragged| dragged.id == entry_id) {
            self.surface.on_drag_cancel();
        }

        let index = self
            .entries
            .iter()
            .position(|entry| entry.id == entry_id)
            .ok_or_else(|| TimetableError::NotFound(format!("Entry {} not found", entry_id)))?;
        let removed = self.entries.remove(index);

        debug!(entry_id, "Removed entry");
        self.dirty = true;
        Ok(removed)
    }

    pub fn save_payload(&self) -> SavePayload {
        SavePayload {
            entries: self.entries.clone(),
            temporary_count: self.entries.iter().filter(|entry| entry.is_temporary()).count(),
        }
    }

    /// Takes the list as the backend stored it (temporary ids replaced) as the
    /// new baseline.
    pub fn mark_saved(&mut self, persisted: Vec<ScheduleEntry>) {
        info!(entries = persisted.len(), "Timetable saved");
        self.surface.on_drag_cancel();
        self.saved = persisted.clone();
        self.entries = persisted;
        self.dirty = false;
    }

    /// Throws away every edit since the last load or save.
    pub fn discard(&mut self) {
        if self.dirty {
            info!("Discarding unsaved timetable edits");
        }
        self.surface.on_drag_cancel();
        self.entries = self.saved.clone();
        self.dirty = false;
    }

    fn push_entry(&mut self, position: Position, draft: EntryDraft) -> TimetableResult<ScheduleEntry> {
        let period = draft
            .period
            .or_else(|| Period::from_start_time(&position.start_time))
            .ok_or_else(|| TimetableError::Validation(format!("Unreadable start time: {}", position.start_time)))?;

        let entry = ScheduleEntry {
            id: ScheduleEntry::temporary_id(),
            day_of_week: position.day_of_week,
            start_time: position.start_time,
            end_time: position.end_time,
            period,
            subject: draft.subject,
            teacher: draft.teacher,
            notes: draft.notes,
        };

        debug!(entry_id = %entry.id, day = %entry.day_of_week, slot_key = %entry.slot_key(), "Added entry");
        self.entries.push(entry.clone());
        self.dirty = true;
        Ok(entry)
    }

    fn find(&self, entry_id: &str) -> TimetableResult<&ScheduleEntry> {
        self.entry(entry_id)
            .ok_or_else(|| TimetableError::NotFound(format!("Entry {} not found", entry_id)))
    }
}
