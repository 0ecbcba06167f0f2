//! CLI command implementations.

pub mod cache;
pub mod dependency;
pub mod init;
pub mod serve;
pub mod task;
