//! # Timetable Core
//!
//! Domain models and the in-memory engines behind the timetable editor:
//!
//! - **grid**: derives the time-slot row axis and projects entries and breaks
//!   into a `(day, slot)` matrix
//! - **surface**: the drag-and-drop gesture state machine over that matrix
//! - **placement**: the swap/move protocol applied when an entry is dropped
//! - **availability**: per-teacher availability with one education level per
//!   lesson slot
//! - **editor**: the owner of an entry list that ties the pieces together
//!
//! Nothing here performs I/O. Saving is the caller's business; the editor only
//! produces the payload.

pub mod availability;
pub mod editor;
pub mod errors;
pub mod grid;
pub mod models;
pub mod placement;
pub mod surface;
