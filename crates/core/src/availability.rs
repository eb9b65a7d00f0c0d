//! Per-teacher weekly availability, split by education level.
//!
//! Each level holds one boolean per `(day, lesson index)`. A lesson slot can be
//! claimed by one level at most: turning it on for a level turns it off for
//! all the others. Shape changes (lessons per day, active days, assigned
//! levels) resize the grid in place and never reach into a level's remaining
//! values.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{
    availability::{AvailabilityMap, AvailabilityPayload, EducationLevel},
    day::DayOfWeek,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityGrid {
    lessons_per_day: usize,
    days: Vec<DayOfWeek>,
    grid: AvailabilityMap,
}

impl AvailabilityGrid {
    /// An all-unavailable grid for the given levels and days.
    pub fn new(levels: &[EducationLevel], days: &[DayOfWeek], lessons_per_day: usize) -> Self {
        let days = normalize_days(days);
        let grid = levels
            .iter()
            .map(|&level| (level, blank_days(&days, lessons_per_day)))
            .collect();

        Self {
            lessons_per_day,
            days,
            grid,
        }
    }

    /// Rebuilds a grid from a previously saved map.
    ///
    /// The map's levels are kept; days and sequence lengths are forced to
    /// `days` and `lessons_per_day`. A slot claimed by more than one level is
    /// kept by the first level in enumeration order.
    pub fn from_map(map: &AvailabilityMap, days: &[DayOfWeek], lessons_per_day: usize) -> Self {
        let levels: Vec<EducationLevel> = map.keys().copied().collect();
        let mut availability = Self::new(&levels, days, lessons_per_day);

        for (&level, saved_days) in map {
            for (&day, flags) in saved_days {
                for (index, _) in flags.iter().enumerate().filter(|(_, on)| **on) {
                    if availability.is_occupied_elsewhere(level, day, index) {
                        warn!(%level, %day, index, "Dropping availability already claimed by another level");
                        continue;
                    }
                    if let Some(slot) = availability.slot_mut(level, day, index) {
                        *slot = true;
                    }
                }
            }
        }

        availability
    }

    pub fn lessons_per_day(&self) -> usize {
        self.lessons_per_day
    }

    pub fn days(&self) -> &[DayOfWeek] {
        &self.days
    }

    pub fn levels(&self) -> Vec<EducationLevel> {
        self.grid.keys().copied().collect()
    }

    pub fn as_map(&self) -> &AvailabilityMap {
        &self.grid
    }

    pub fn to_payload(&self) -> AvailabilityPayload {
        AvailabilityPayload {
            lessons_per_day: self.lessons_per_day,
            availability: self.grid.clone(),
        }
    }

    /// Pads every sequence with `false` or truncates it to `lessons`.
    pub fn set_lessons_per_day(&mut self, lessons: usize) {
        debug!(from = self.lessons_per_day, to = lessons, "Resizing availability");
        for days in self.grid.values_mut() {
            for flags in days.values_mut() {
                flags.resize(lessons, false);
            }
        }
        self.lessons_per_day = lessons;
    }

    /// New days start all-unavailable in every level; dropped days are removed
    /// from every level.
    pub fn set_active_days(&mut self, days: &[DayOfWeek]) {
        let days = normalize_days(days);
        let lessons = self.lessons_per_day;

        for level_days in self.grid.values_mut() {
            level_days.retain(|day, _| days.contains(day));
            for &day in &days {
                level_days.entry(day).or_insert_with(|| vec![false; lessons]);
            }
        }

        debug!(?days, "Active days updated");
        self.days = days;
    }

    /// New levels start all-unavailable; dropped levels lose their values.
    pub fn set_active_levels(&mut self, levels: &[EducationLevel]) {
        let wanted: BTreeSet<EducationLevel> = levels.iter().copied().collect();
        self.grid.retain(|level, _| wanted.contains(level));

        for level in wanted {
            if !self.grid.contains_key(&level) {
                self.grid.insert(level, blank_days(&self.days, self.lessons_per_day));
            }
        }

        debug!(levels = ?self.levels(), "Active levels updated");
    }

    pub fn is_available(&self, level: EducationLevel, day: DayOfWeek, index: usize) -> bool {
        self.slot(level, day, index).unwrap_or(false)
    }

    /// Whether some level other than `level` holds `(day, index)`.
    pub fn is_occupied_elsewhere(&self, level: EducationLevel, day: DayOfWeek, index: usize) -> bool {
        self.grid
            .keys()
            .filter(|&&other| other != level)
            .any(|&other| self.is_available(other, day, index))
    }

    /// The level currently holding `(day, index)`, if any.
    pub fn claimed_by(&self, day: DayOfWeek, index: usize) -> Option<EducationLevel> {
        self.grid
            .keys()
            .copied()
            .find(|&level| self.is_available(level, day, index))
    }

    /// Flips `(day, index)` for `level` and returns the new value.
    ///
    /// Turning a slot on takes it away from every other level. Turning it off
    /// touches nothing else. Unknown levels, days and indexes past the current
    /// lesson count are ignored and give `None`.
    pub fn toggle(&mut self, level: EducationLevel, day: DayOfWeek, index: usize) -> Option<bool> {
        let current = self.slot(level, day, index)?;
        if current {
            *self.slot_mut(level, day, index)? = false;
            debug!(%level, %day, index, "Slot released");
            Some(false)
        } else {
            self.claim(level, day, index);
            Some(true)
        }
    }

    /// Claims every slot for `level`, taking them from the other levels.
    /// Returns how many slots changed hands or were newly claimed.
    pub fn select_all(&mut self, level: EducationLevel) -> usize {
        if !self.grid.contains_key(&level) {
            return 0;
        }

        let mut claimed = 0;
        for day in self.days.clone() {
            for index in 0..self.lessons_per_day {
                if !self.is_available(level, day, index) {
                    self.claim(level, day, index);
                    claimed += 1;
                }
            }
        }
        claimed
    }

    /// Releases every slot held by `level`.
    pub fn clear_level(&mut self, level: EducationLevel) {
        if let Some(days) = self.grid.get_mut(&level) {
            for flags in days.values_mut() {
                flags.fill(false);
            }
        }
    }

    pub fn claimed_count(&self, level: EducationLevel) -> usize {
        self.grid
            .get(&level)
            .map(|days| days.values().flatten().filter(|on| **on).count())
            .unwrap_or(0)
    }

    /// `true` when no `(day, index)` is held by two levels.
    pub fn is_exclusive(&self) -> bool {
        self.days.iter().all(|&day| {
            (0..self.lessons_per_day).all(|index| {
                self.grid
                    .keys()
                    .filter(|&&level| self.is_available(level, day, index))
                    .count()
                    <= 1
            })
        })
    }

    fn claim(&mut self, level: EducationLevel, day: DayOfWeek, index: usize) {
        for (&other, days) in self.grid.iter_mut() {
            if let Some(slot) = days.get_mut(&day).and_then(|flags| flags.get_mut(index)) {
                *slot = other == level;
            }
        }
        debug!(%level, %day, index, "Slot claimed");
    }

    fn slot(&self, level: EducationLevel, day: DayOfWeek, index: usize) -> Option<bool> {
        self.grid.get(&level)?.get(&day)?.get(index).copied()
    }

    fn slot_mut(&mut self, level: EducationLevel, day: DayOfWeek, index: usize) -> Option<&mut bool> {
        self.grid.get_mut(&level)?.get_mut(&day)?.get_mut(index)
    }
}

fn normalize_days(days: &[DayOfWeek]) -> Vec<DayOfWeek> {
    let unique: BTreeSet<DayOfWeek> = days.iter().copied().collect();
    unique.into_iter().collect()
}

fn blank_days(days: &[DayOfWeek], lessons: usize) -> BTreeMap<DayOfWeek, Vec<bool>> {
    days.iter().map(|&day| (day, vec![false; lessons])).collect()
}
