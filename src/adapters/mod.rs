//! Adapters implementing the domain ports and the outer surfaces.

pub mod cache;
pub mod http;
pub mod sqlite;
