use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::day::DayOfWeek;
use crate::errors::TimetableError;

/// Schooling stage used to scope a teacher's availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    EarlyChildhood,
    LowerPrimary,
    UpperPrimary,
    Secondary,
}

impl EducationLevel {
    pub const ALL: [EducationLevel; 4] = [
        EducationLevel::EarlyChildhood,
        EducationLevel::LowerPrimary,
        EducationLevel::UpperPrimary,
        EducationLevel::Secondary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EducationLevel::EarlyChildhood => "early_childhood",
            EducationLevel::LowerPrimary => "lower_primary",
            EducationLevel::UpperPrimary => "upper_primary",
            EducationLevel::Secondary => "secondary",
        }
    }
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EducationLevel {
    type Err = TimetableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == normalized)
            .ok_or_else(|| TimetableError::Validation(format!("Unknown education level: {}", s)))
    }
}

/// Shape of a teacher's availability on the wire: level → day → one flag per
/// lesson of the day.
pub type AvailabilityMap = BTreeMap<EducationLevel, BTreeMap<DayOfWeek, Vec<bool>>>;

/// Body submitted to the backend when availability is saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityPayload {
    pub lessons_per_day: usize,
    pub availability: AvailabilityMap,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAvailabilityRequest {
    pub levels: Option<Vec<EducationLevel>>,
    pub days: Option<Vec<DayOfWeek>>,
    pub lessons_per_day: Option<usize>,
    /// Previously saved availability to start from.
    pub availability: Option<AvailabilityMap>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub id: Uuid,
    pub levels: Vec<EducationLevel>,
    pub days: Vec<DayOfWeek>,
    pub lessons_per_day: usize,
    pub availability: AvailabilityMap,
    pub opened_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetLessonsPerDayRequest {
    pub lessons_per_day: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetActiveDaysRequest {
    pub days: Vec<DayOfWeek>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetActiveLevelsRequest {
    pub levels: Vec<EducationLevel>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelRequest {
    pub level: EducationLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotRequest {
    pub level: EducationLevel,
    pub day: DayOfWeek,
    pub index: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleResponse {
    /// New value of the slot, `null` when the coordinates were out of range.
    pub available: Option<bool>,
    pub availability: AvailabilityMap,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupiedResponse {
    pub occupied_elsewhere: bool,
}
