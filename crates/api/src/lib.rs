//! # Timetable API
//!
//! HTTP service that hosts timetable editing sessions. A client loads a class's
//! entries and breaks into a session, drives the grid with gestures (drag,
//! drop, add, remove), and finally takes the save payload to the school
//! backend. Availability sessions do the same for a teacher's weekly
//! availability. Sessions live in memory only; nothing is persisted here.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Run the core engines for each request
//! - **Middleware**: Error to response mapping
//! - **Config**: Environment configuration

/// Configuration module for API settings
pub mod config;
/// Request handlers for timetable and availability sessions
pub mod handlers;
/// Middleware for error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{http::HeaderValue, Router};
use chrono::{DateTime, Utc};
use eyre::Result;
use timetable_core::{availability::AvailabilityGrid, editor::TimetableEditor};
use tokio::{net::TcpListener, sync::RwLock};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;
use uuid::Uuid;

/// A piece of in-memory editing state plus when it last changed.
#[derive(Debug, Clone)]
pub struct Session<T> {
    pub value: T,
    pub opened_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<T> Session<T> {
    pub fn new(value: T) -> Self {
        let now = Utc::now();
        Self {
            value,
            opened_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Shared application state that is accessible to all request handlers
///
/// Each session map sits behind its own lock. A handler holds the lock for
/// the whole operation, so gestures on one session are applied one at a time.
pub struct ApiState {
    pub config: config::ApiConfig,
    pub timetables: RwLock<HashMap<Uuid, Session<TimetableEditor>>>,
    pub availability: RwLock<HashMap<Uuid, Session<AvailabilityGrid>>>,
}

impl ApiState {
    pub fn new(config: config::ApiConfig) -> Self {
        Self {
            config,
            timetables: RwLock::new(HashMap::new()),
            availability: RwLock::new(HashMap::new()),
        }
    }
}

/// Builds the application router with all routes and layers
pub fn app(state: Arc<ApiState>) -> Router {
    let config = state.config.clone();

    let app = Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Timetable editing endpoints
        .merge(routes::timetable::routes())
        // Availability endpoints
        .merge(routes::availability::routes())
        .with_state(state);

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)),
        None => app,
    };

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout))),
    )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .allow_origin(origins)
        .allow_credentials(true)
}

/// Starts the API server with the provided configuration
///
/// Installs the tracing subscriber at the configured level, builds the router
/// and serves until the process is stopped.
pub async fn start_server(config: config::ApiConfig) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let addr = config.server_addr();
    let state = Arc::new(ApiState::new(config));
    let app = app(state);

    // Start the HTTP server
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
