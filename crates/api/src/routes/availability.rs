use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/availability",
            post(handlers::availability::create_availability),
        )
        .route(
            "/api/availability/:id",
            get(handlers::availability::get_availability)
                .delete(handlers::availability::delete_availability),
        )
        .route(
            "/api/availability/:id/lessons",
            put(handlers::availability::set_lessons_per_day),
        )
        .route(
            "/api/availability/:id/days",
            put(handlers::availability::set_active_days),
        )
        .route(
            "/api/availability/:id/levels",
            put(handlers::availability::set_active_levels),
        )
        .route(
            "/api/availability/:id/toggle",
            post(handlers::availability::toggle_slot),
        )
        .route(
            "/api/availability/:id/select-all",
            post(handlers::availability::select_all),
        )
        .route(
            "/api/availability/:id/clear",
            post(handlers::availability::clear_level),
        )
        .route(
            "/api/availability/:id/occupied",
            get(handlers::availability::occupied_elsewhere),
        )
        .route(
            "/api/availability/:id/payload",
            get(handlers::availability::get_payload),
        )
}
