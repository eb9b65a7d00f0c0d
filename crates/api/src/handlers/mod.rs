/// Teacher availability sessions
pub mod availability;
/// Timetable grid editing sessions
pub mod timetable;
