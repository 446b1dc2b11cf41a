//! Repository implementations for database access

pub mod colors;

pub use colors::{ColorRepo, DbError};
