//! # Availability Handlers
//!
//! Endpoints over an [`AvailabilityGrid`] session: one teacher's weekly
//! availability, split by education level. A lesson slot belongs to one level
//! at most, so toggling or selecting a slot for one level can change the
//! others; every mutating response carries the whole map back.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use timetable_core::{
    availability::AvailabilityGrid,
    errors::TimetableError,
    models::availability::{
        AvailabilityPayload, AvailabilityResponse, CreateAvailabilityRequest, EducationLevel,
        LevelRequest, OccupiedResponse, SetActiveDaysRequest, SetActiveLevelsRequest,
        SetLessonsPerDayRequest, SlotRequest, ToggleResponse,
    },
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{config::MAX_LESSONS_PER_DAY, middleware::error_handling::AppError, ApiState, Session};

fn not_found(id: Uuid) -> TimetableError {
    TimetableError::NotFound(format!("Availability session {} not found", id))
}

fn session_mut(
    sessions: &mut HashMap<Uuid, Session<AvailabilityGrid>>,
    id: Uuid,
) -> Result<&mut Session<AvailabilityGrid>, AppError> {
    sessions.get_mut(&id).ok_or_else(|| AppError(not_found(id)))
}

fn validate_lessons(lessons: usize) -> Result<usize, TimetableError> {
    if lessons == 0 || lessons > MAX_LESSONS_PER_DAY {
        return Err(TimetableError::Validation(format!(
            "Lessons per day must be between 1 and {}",
            MAX_LESSONS_PER_DAY
        )));
    }
    Ok(lessons)
}

pub fn availability_response(id: Uuid, session: &Session<AvailabilityGrid>) -> AvailabilityResponse {
    let grid = &session.value;
    AvailabilityResponse {
        id,
        levels: grid.levels(),
        days: grid.days().to_vec(),
        lessons_per_day: grid.lessons_per_day(),
        availability: grid.as_map().clone(),
        opened_at: session.opened_at,
        updated_at: session.updated_at,
    }
}

/// Opens an availability session
///
/// # Endpoint
///
/// ```text
/// POST /api/availability
/// ```
///
/// # Request Body
///
/// Every field is optional. Levels default to all education levels, days and
/// lessons per day to the service configuration. When a saved `availability`
/// map is given it is loaded first; `levels`, if present, then reshapes it.
#[axum::debug_handler]
pub async fn create_availability(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateAvailabilityRequest>,
) -> Result<(StatusCode, Json<AvailabilityResponse>), AppError> {
    let lessons = validate_lessons(payload.lessons_per_day.unwrap_or(state.config.lessons_per_day))?;
    let days = payload
        .days
        .unwrap_or_else(|| state.config.active_days.clone());

    let grid = match (payload.availability, payload.levels) {
        (Some(saved), Some(levels)) => {
            let mut grid = AvailabilityGrid::from_map(&saved, &days, lessons);
            grid.set_active_levels(&levels);
            grid
        }
        (Some(saved), None) => AvailabilityGrid::from_map(&saved, &days, lessons),
        (None, Some(levels)) => AvailabilityGrid::new(&levels, &days, lessons),
        (None, None) => AvailabilityGrid::new(&EducationLevel::ALL, &days, lessons),
    };

    let id = Uuid::new_v4();
    let session = Session::new(grid);
    let response = availability_response(id, &session);
    state.availability.write().await.insert(id, session);

    info!(%id, levels = response.levels.len(), "Created availability session");
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn get_availability(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let sessions = state.availability.read().await;
    let session = sessions.get(&id).ok_or_else(|| not_found(id))?;
    Ok(Json(availability_response(id, session)))
}

pub async fn delete_availability(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .availability
        .write()
        .await
        .remove(&id)
        .ok_or_else(|| not_found(id))?;

    info!(%id, "Closed availability session");
    Ok(StatusCode::NO_CONTENT)
}

/// Changes the number of lessons per day, padding or truncating every level
pub async fn set_lessons_per_day(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetLessonsPerDayRequest>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let lessons = validate_lessons(payload.lessons_per_day)?;

    let mut sessions = state.availability.write().await;
    let session = session_mut(&mut sessions, id)?;
    session.value.set_lessons_per_day(lessons);
    session.touch();
    Ok(Json(availability_response(id, session)))
}

pub async fn set_active_days(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetActiveDaysRequest>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let mut sessions = state.availability.write().await;
    let session = session_mut(&mut sessions, id)?;
    session.value.set_active_days(&payload.days);
    session.touch();
    Ok(Json(availability_response(id, session)))
}

pub async fn set_active_levels(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetActiveLevelsRequest>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let mut sessions = state.availability.write().await;
    let session = session_mut(&mut sessions, id)?;
    session.value.set_active_levels(&payload.levels);
    session.touch();
    Ok(Json(availability_response(id, session)))
}

/// Flips one slot for a level
///
/// # Endpoint
///
/// ```text
/// POST /api/availability/:id/toggle
/// ```
///
/// Turning a slot on releases it from whichever level held it. Coordinates
/// outside the grid leave it untouched and answer `"available": null`.
#[axum::debug_handler]
pub async fn toggle_slot(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SlotRequest>,
) -> Result<Json<ToggleResponse>, AppError> {
    let mut sessions = state.availability.write().await;
    let session = session_mut(&mut sessions, id)?;
    let available = session
        .value
        .toggle(payload.level, payload.day, payload.index);

    if available.is_some() {
        session.touch();
    } else {
        debug!(%id, level = %payload.level, day = %payload.day, index = payload.index, "Ignored toggle outside the grid");
    }

    Ok(Json(ToggleResponse {
        available,
        availability: session.value.as_map().clone(),
    }))
}

pub async fn select_all(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<LevelRequest>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let mut sessions = state.availability.write().await;
    let session = session_mut(&mut sessions, id)?;
    let claimed = session.value.select_all(payload.level);
    session.touch();

    debug!(%id, level = %payload.level, claimed, "Selected all slots");
    Ok(Json(availability_response(id, session)))
}

pub async fn clear_level(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<LevelRequest>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let mut sessions = state.availability.write().await;
    let session = session_mut(&mut sessions, id)?;
    session.value.clear_level(payload.level);
    session.touch();
    Ok(Json(availability_response(id, session)))
}

/// Whether another level holds the slot, for greying it out
pub async fn occupied_elsewhere(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Query(query): Query<SlotRequest>,
) -> Result<Json<OccupiedResponse>, AppError> {
    let sessions = state.availability.read().await;
    let session = sessions.get(&id).ok_or_else(|| not_found(id))?;

    Ok(Json(OccupiedResponse {
        occupied_elsewhere: session
            .value
            .is_occupied_elsewhere(query.level, query.day, query.index),
    }))
}

pub async fn get_payload(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<AvailabilityPayload>, AppError> {
    let sessions = state.availability.read().await;
    let session = sessions.get(&id).ok_or_else(|| not_found(id))?;
    Ok(Json(session.value.to_payload()))
}
