pub mod availability;
pub mod day;
pub mod entry;
pub mod timetable;
