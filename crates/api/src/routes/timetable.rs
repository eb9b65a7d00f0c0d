use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/timetables", post(handlers::timetable::create_timetable))
        .route(
            "/api/timetables/:id",
            get(handlers::timetable::get_timetable).delete(handlers::timetable::close_timetable),
        )
        .route("/api/timetables/:id/mode", put(handlers::timetable::set_mode))
        .route("/api/timetables/:id/select", post(handlers::timetable::select_entry))
        .route("/api/timetables/:id/drag/start", post(handlers::timetable::drag_start))
        .route("/api/timetables/:id/drag/enter", post(handlers::timetable::drag_enter))
        .route("/api/timetables/:id/drag/cancel", post(handlers::timetable::drag_cancel))
        .route("/api/timetables/:id/drop", post(handlers::timetable::drop_entry))
        .route("/api/timetables/:id/entries", post(handlers::timetable::add_entry))
        .route("/api/timetables/:id/lessons", post(handlers::timetable::add_entry_at))
        .route(
            "/api/timetables/:id/entries/:entry_id",
            delete(handlers::timetable::remove_entry),
        )
        .route("/api/timetables/:id/payload", get(handlers::timetable::get_payload))
        .route("/api/timetables/:id/saved", post(handlers::timetable::mark_saved))
        .route("/api/timetables/:id/discard", post(handlers::timetable::discard))
}
