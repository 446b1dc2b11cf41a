//! Domain models
//!
//! Upload rows are validated against a fixed column schema when they are
//! turned into a [`Color`]. Invalid input returns [`RowError`], not panic.

pub mod color;
pub mod pagination;
pub mod validation;

pub use color::{Color, Column, ColumnType, Value, COLOR_SCHEMA};
pub use pagination::Pagination;
pub use validation::RowError;
