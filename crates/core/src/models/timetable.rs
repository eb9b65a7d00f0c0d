use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    day::DayOfWeek,
    entry::{BreakSlot, EntryDraft, Position, ScheduleEntry},
};
use crate::{
    grid::{CellKey, GridView},
    placement::Placement,
    surface::GridMode,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTimetableRequest {
    #[serde(default)]
    pub entries: Vec<ScheduleEntry>,
    #[serde(default)]
    pub breaks: Vec<BreakSlot>,
    /// Days shown as columns; the configured teaching week when omitted.
    pub days: Option<Vec<DayOfWeek>>,
    #[serde(default)]
    pub mode: GridMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableResponse {
    pub id: Uuid,
    pub mode: GridMode,
    pub grid: GridView,
    pub drag: Option<DragStatus>,
    pub is_dirty: bool,
    pub entry_count: usize,
    pub opened_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragStatus {
    pub entry_id: String,
    pub hovered: Option<CellKey>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryIdRequest {
    pub entry_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRequest {
    pub day: DayOfWeek,
    pub slot_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureResponse {
    pub accepted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectResponse {
    pub entry: Option<ScheduleEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddEntryRequest {
    pub day: DayOfWeek,
    pub slot_key: String,
    #[serde(flatten)]
    pub draft: EntryDraft,
}

/// A lesson at explicit times, which may open a new slot row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddEntryAtRequest {
    #[serde(flatten)]
    pub position: Position,
    #[serde(flatten)]
    pub draft: EntryDraft,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkSavedRequest {
    pub entries: Vec<ScheduleEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetModeRequest {
    pub mode: GridMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropResponse {
    /// The applied move or swap, `null` when the drop was filtered out.
    pub placement: Option<Placement>,
    pub timetable: TimetableResponse,
}
