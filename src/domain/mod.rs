//! Domain layer for the task tracker
//!
//! This module contains the records, errors and port traits. It knows nothing
//! about `SQLite`, HTTP or the concrete cache backend.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
