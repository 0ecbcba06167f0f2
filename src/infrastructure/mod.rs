//! Infrastructure layer: configuration, logging, project setup and service wiring.

pub mod config;
pub mod context;
pub mod logging;
pub mod setup;

pub use context::AppContext;
