//! Database layer - connection pool and the color row store
//!
//! - Reads go through [`ColorRepo`] on the pool
//! - Writes run on a caller-owned transaction so the duplicate check and
//!   the insert share one boundary
//! - The primary key backs up the explicit duplicate check

pub mod pool;
pub mod repos;

pub use pool::{create_memory_pool, create_pool, migrate};
pub use repos::*;
pub use sqlx::SqlitePool;
