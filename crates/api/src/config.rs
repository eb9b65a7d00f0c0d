//! # API Configuration Module
//!
//! This module loads the configuration of the timetable editing service from
//! environment variables, with defaults for everything.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 30)
//! - `TIMETABLE_ACTIVE_DAYS`: Comma-separated teaching days (default: monday to friday)
//! - `TIMETABLE_LESSONS_PER_DAY`: Lessons per day for new availability grids (default: 6)

use eyre::{Result, WrapErr};
use std::env;
use timetable_core::models::day::DayOfWeek;
use tracing::Level;

/// Largest lesson count a session accepts.
pub const MAX_LESSONS_PER_DAY: usize = 24;

/// Configuration for the timetable API server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use timetable_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}:{}", config.host, config.port);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Days used as grid columns when a session does not name its own
    pub active_days: Vec<DayOfWeek>,

    /// Lesson count for availability sessions that do not name their own
    pub lessons_per_day: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: Level::INFO,
            cors_origins: None,
            request_timeout: 30,
            active_days: DayOfWeek::weekdays(),
            lessons_per_day: 6,
        }
    }
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The API_PORT value cannot be parsed as a u16
    /// - TIMETABLE_ACTIVE_DAYS names an unknown day
    /// - TIMETABLE_LESSONS_PER_DAY is not a number between 1 and 24
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        // Network settings
        let host = env::var("API_HOST").unwrap_or(defaults.host);
        let port = env::var("API_PORT")
            .unwrap_or_else(|_| defaults.port.to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Logging settings
        let log_level = parse_log_level(&env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

        // CORS settings
        let cors_origins = env::var("API_CORS_ORIGINS").ok().map(|origins| {
            origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        // Performance settings
        let request_timeout = env::var("API_REQUEST_TIMEOUT_SECONDS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(defaults.request_timeout);

        // Timetable settings
        let active_days = match env::var("TIMETABLE_ACTIVE_DAYS") {
            Ok(days) => parse_days(&days).wrap_err("Invalid TIMETABLE_ACTIVE_DAYS value")?,
            Err(_) => defaults.active_days,
        };

        let lessons_per_day = match env::var("TIMETABLE_LESSONS_PER_DAY") {
            Ok(value) => parse_lessons(&value).wrap_err("Invalid TIMETABLE_LESSONS_PER_DAY value")?,
            Err(_) => defaults.lessons_per_day,
        };

        Ok(Self {
            host,
            port,
            log_level,
            cors_origins,
            request_timeout,
            active_days,
            lessons_per_day,
        })
    }

    /// Returns the server address as a string, e.g. "127.0.0.1:8080"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub fn parse_log_level(value: &str) -> Level {
    match value.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Parses a comma-separated day list such as `"monday, wednesday"`.
pub fn parse_days(value: &str) -> Result<Vec<DayOfWeek>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|day| day.parse::<DayOfWeek>().map_err(eyre::Report::from))
        .collect()
}

pub fn parse_lessons(value: &str) -> Result<usize> {
    let lessons: usize = value.trim().parse().wrap_err("Not a number")?;
    if lessons == 0 || lessons > MAX_LESSONS_PER_DAY {
        eyre::bail!("Lessons per day must be between 1 and {}", MAX_LESSONS_PER_DAY);
    }
    Ok(lessons)
}
