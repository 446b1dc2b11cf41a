//! Route handlers
//!
//! - colors: CSV upload and paginated reads
//! - health: Health check endpoint

pub mod colors;
pub mod health;
