//! axum REST surface.

pub mod error;
pub mod handlers;
pub mod server;

pub use error::{api_error, ApiError, ErrorResponse};
pub use server::{router, HttpConfig, HttpServer};
