//! Row axis derivation and the `(day, slot)` matrix built on it.

pub mod matrix;
pub mod slots;

pub use matrix::{build_matrix, CellKey, CellView, GridCell, GridMatrix, GridRow, GridView};
pub use slots::{derive_slots, TimeSlot};
