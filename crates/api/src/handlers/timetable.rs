//! # Timetable Handlers
//!
//! Endpoints over a [`TimetableEditor`] session. Every gesture a grid client
//! can make has an endpoint here, and the engine decides what it means: a
//! drag in read-only mode is refused, a drop on a break is filtered, a drop on
//! an occupied cell swaps. Edits stay in the session until the client fetches
//! the save payload and reports the backend's answer with `/saved`.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use timetable_core::{
    editor::{SavePayload, TimetableEditor},
    errors::TimetableError,
    models::{
        entry::ScheduleEntry,
        timetable::{
            AddEntryAtRequest, AddEntryRequest, CellRequest, CreateTimetableRequest, DragStatus, DropResponse,
            EntryIdRequest, GestureResponse, MarkSavedRequest, SelectResponse, SetModeRequest,
            TimetableResponse,
        },
    },
};
use tracing::info;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState, Session};

fn not_found(id: Uuid) -> TimetableError {
    TimetableError::NotFound(format!("Timetable session {} not found", id))
}

fn session_mut(
    timetables: &mut HashMap<Uuid, Session<TimetableEditor>>,
    id: Uuid,
) -> Result<&mut Session<TimetableEditor>, AppError> {
    timetables.get_mut(&id).ok_or_else(|| AppError(not_found(id)))
}

/// Snapshot of a session as clients draw it.
pub fn timetable_response(id: Uuid, session: &Session<TimetableEditor>) -> TimetableResponse {
    let editor = &session.value;
    let surface = editor.surface();
    let drag = surface.dragged_entry().map(|entry| DragStatus {
        entry_id: entry.id.clone(),
        hovered: surface.hovered_cell().cloned(),
    });

    TimetableResponse {
        id,
        mode: editor.mode(),
        grid: editor.matrix().to_view(),
        drag,
        is_dirty: editor.is_dirty(),
        entry_count: editor.entries().len(),
        opened_at: session.opened_at,
        updated_at: session.updated_at,
    }
}

/// Opens an editing session
///
/// # Endpoint
///
/// ```text
/// POST /api/timetables
/// ```
///
/// Days default to the configured teaching week.
#[axum::debug_handler]
pub async fn create_timetable(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateTimetableRequest>,
) -> Result<(StatusCode, Json<TimetableResponse>), AppError> {
    let days = payload
        .days
        .unwrap_or_else(|| state.config.active_days.clone());

    let editor = TimetableEditor::new(payload.entries, payload.breaks, days, payload.mode);
    let session = Session::new(editor);

    let id = Uuid::new_v4();
    let response = timetable_response(id, &session);
    state.timetables.write().await.insert(id, session);

    info!(%id, "Created timetable session");
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn get_timetable(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<TimetableResponse>, AppError> {
    let timetables = state.timetables.read().await;
    let session = timetables.get(&id).ok_or_else(|| not_found(id))?;
    Ok(Json(timetable_response(id, session)))
}

/// Closes a session, dropping any unsaved edits
pub async fn close_timetable(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .timetables
        .write()
        .await
        .remove(&id)
        .ok_or_else(|| not_found(id))?;

    info!(%id, "Closed timetable session");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_mode(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetModeRequest>,
) -> Result<Json<TimetableResponse>, AppError> {
    let mut timetables = state.timetables.write().await;
    let session = session_mut(&mut timetables, id)?;
    session.value.set_mode(payload.mode);
    session.touch();
    Ok(Json(timetable_response(id, session)))
}

/// Click on an entry; `entry` is `null` while a drag is in progress
pub async fn select_entry(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<EntryIdRequest>,
) -> Result<Json<SelectResponse>, AppError> {
    let timetables = state.timetables.read().await;
    let session = timetables.get(&id).ok_or_else(|| not_found(id))?;
    let entry = session.value.select(&payload.entry_id)?;
    Ok(Json(SelectResponse { entry }))
}

pub async fn drag_start(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<EntryIdRequest>,
) -> Result<Json<GestureResponse>, AppError> {
    let mut timetables = state.timetables.write().await;
    let session = session_mut(&mut timetables, id)?;
    let accepted = session.value.drag_start(&payload.entry_id)?;
    session.touch();
    Ok(Json(GestureResponse { accepted }))
}

pub async fn drag_enter(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CellRequest>,
) -> Result<Json<GestureResponse>, AppError> {
    let mut timetables = state.timetables.write().await;
    let session = session_mut(&mut timetables, id)?;
    let accepted = session.value.drag_enter(payload.day, &payload.slot_key);
    session.touch();
    Ok(Json(GestureResponse { accepted }))
}

/// Ends the drag on a cell
///
/// # Endpoint
///
/// ```text
/// POST /api/timetables/:id/drop
/// ```
///
/// The drag state is cleared whether or not the drop was accepted.
#[axum::debug_handler]
pub async fn drop_entry(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CellRequest>,
) -> Result<Json<DropResponse>, AppError> {
    let mut timetables = state.timetables.write().await;
    let session = session_mut(&mut timetables, id)?;
    let placement = session.value.drop_at(payload.day, &payload.slot_key);
    session.touch();

    Ok(Json(DropResponse {
        placement,
        timetable: timetable_response(id, session),
    }))
}

pub async fn drag_cancel(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<TimetableResponse>, AppError> {
    let mut timetables = state.timetables.write().await;
    let session = session_mut(&mut timetables, id)?;
    session.value.drag_cancel();
    session.touch();
    Ok(Json(timetable_response(id, session)))
}

/// Adds a lesson to an empty cell under a temporary id
pub async fn add_entry(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddEntryRequest>,
) -> Result<(StatusCode, Json<ScheduleEntry>), AppError> {
    let mut timetables = state.timetables.write().await;
    let session = session_mut(&mut timetables, id)?;
    let entry = session
        .value
        .add_entry(payload.day, &payload.slot_key, payload.draft)?;
    session.touch();
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Adds a lesson at explicit times
///
/// # Endpoint
///
/// ```text
/// POST /api/timetables/:id/lessons
/// ```
///
/// Unlike `/entries` the cell does not have to exist yet, so this also starts
/// an empty timetable or opens a new slot row.
pub async fn add_entry_at(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddEntryAtRequest>,
) -> Result<(StatusCode, Json<ScheduleEntry>), AppError> {
    let mut timetables = state.timetables.write().await;
    let session = session_mut(&mut timetables, id)?;
    let entry = session.value.add_entry_at(payload.position, payload.draft)?;
    session.touch();
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn remove_entry(
    State(state): State<Arc<ApiState>>,
    Path((id, entry_id)): Path<(Uuid, String)>,
) -> Result<Json<ScheduleEntry>, AppError> {
    let mut timetables = state.timetables.write().await;
    let session = session_mut(&mut timetables, id)?;
    let entry = session.value.remove_entry(&entry_id)?;
    session.touch();
    Ok(Json(entry))
}

/// The full entry list to send to the backend
pub async fn get_payload(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SavePayload>, AppError> {
    let timetables = state.timetables.read().await;
    let session = timetables.get(&id).ok_or_else(|| not_found(id))?;
    Ok(Json(session.value.save_payload()))
}

/// Records the list the backend stored as the new baseline
pub async fn mark_saved(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<MarkSavedRequest>,
) -> Result<Json<TimetableResponse>, AppError> {
    let mut timetables = state.timetables.write().await;
    let session = session_mut(&mut timetables, id)?;
    session.value.mark_saved(payload.entries);
    session.touch();
    Ok(Json(timetable_response(id, session)))
}

pub async fn discard(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<TimetableResponse>, AppError> {
    let mut timetables = state.timetables.write().await;
    let session = session_mut(&mut timetables, id)?;
    session.value.discard();
    session.touch();
    Ok(Json(timetable_response(id, session)))
}
