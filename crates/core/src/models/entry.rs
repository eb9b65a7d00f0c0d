use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::day::DayOfWeek;
use crate::errors::{TimetableError, TimetableResult};

/// Id prefix carried by entries created locally and not yet saved.
pub const TEMP_ID_PREFIX: &str = "temp-";

/// Formats the key of a `(start, end)` slot, e.g. `"08:00-09:00"`.
pub fn slot_key(start_time: &str, end_time: &str) -> String {
    format!("{}-{}", start_time, end_time)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Morning,
    Afternoon,
    Evening,
}

impl Period {
    /// Classifies an `HH:MM` start time: before noon is morning, before 18:00
    /// afternoon, anything later evening. `None` if the time does not parse.
    pub fn from_start_time(start_time: &str) -> Option<Period> {
        let time = NaiveTime::parse_from_str(start_time, "%H:%M").ok()?;
        Some(match time.hour() {
            0..=11 => Period::Morning,
            12..=17 => Period::Afternoon,
            _ => Period::Evening,
        })
    }
}

/// Something an entry can reference by id or carry embedded.
pub trait Named {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Named for Subject {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: String,
    pub name: String,
}

impl Named for Teacher {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Either a bare id or the embedded object, depending on how the backend
/// expanded the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reference<T> {
    Id(String),
    Embedded(T),
}

impl<T: Named> Reference<T> {
    pub fn id(&self) -> &str {
        match self {
            Reference::Id(id) => id,
            Reference::Embedded(inner) => inner.id(),
        }
    }

    /// Display name, only known when the object is embedded.
    pub fn name(&self) -> Option<&str> {
        match self {
            Reference::Id(_) => None,
            Reference::Embedded(inner) => Some(inner.name()),
        }
    }
}

/// Where an entry sits in the week.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub day_of_week: DayOfWeek,
    pub start_time: String,
    pub end_time: String,
}

impl Position {
    pub fn new(day_of_week: DayOfWeek, start_time: impl Into<String>, end_time: impl Into<String>) -> Self {
        Self {
            day_of_week,
            start_time: start_time.into(),
            end_time: end_time.into(),
        }
    }

    pub fn slot_key(&self) -> String {
        slot_key(&self.start_time, &self.end_time)
    }

    /// Both times must be zero-padded `HH:MM` and the start must come first.
    pub fn validate(&self) -> TimetableResult<()> {
        let start = parse_hhmm(&self.start_time)?;
        let end = parse_hhmm(&self.end_time)?;
        if start >= end {
            return Err(TimetableError::Validation(format!(
                "Start {} must be before end {}",
                self.start_time, self.end_time
            )));
        }
        Ok(())
    }
}

fn parse_hhmm(value: &str) -> TimetableResult<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .ok()
        .filter(|time| time.format("%H:%M").to_string() == value)
        .ok_or_else(|| TimetableError::Validation(format!("Expected HH:MM, got {:?}", value)))
}

/// One lesson placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub id: String,
    pub day_of_week: DayOfWeek,
    pub start_time: String,
    pub end_time: String,
    pub period: Period,
    pub subject: Reference<Subject>,
    pub teacher: Reference<Teacher>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ScheduleEntry {
    /// A fresh id for an entry that only exists locally.
    pub fn temporary_id() -> String {
        format!("{}{}", TEMP_ID_PREFIX, Uuid::new_v4())
    }

    pub fn is_temporary(&self) -> bool {
        self.id.starts_with(TEMP_ID_PREFIX)
    }

    pub fn slot_key(&self) -> String {
        slot_key(&self.start_time, &self.end_time)
    }

    pub fn position(&self) -> Position {
        Position::new(self.day_of_week, self.start_time.clone(), self.end_time.clone())
    }

    pub fn occupies(&self, day: DayOfWeek, slot_key: &str) -> bool {
        self.day_of_week == day && self.slot_key() == slot_key
    }

    /// Copy of this entry moved to `position`; every other field is kept.
    pub fn with_position(&self, position: &Position) -> Self {
        Self {
            day_of_week: position.day_of_week,
            start_time: position.start_time.clone(),
            end_time: position.end_time.clone(),
            ..self.clone()
        }
    }
}

/// A recess. Read-only in the grid and exclusive in its cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakSlot {
    pub day_of_week: DayOfWeek,
    pub start_time: String,
    pub end_time: String,
}

impl BreakSlot {
    pub fn slot_key(&self) -> String {
        slot_key(&self.start_time, &self.end_time)
    }
}

/// Fields the owner supplies when a lesson is added to an empty cell; the
/// position and id come from the grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDraft {
    pub subject: Reference<Subject>,
    pub teacher: Reference<Teacher>,
    #[serde(default)]
    pub period: Option<Period>,
    #[serde(default)]
    pub notes: Option<String>,
}
