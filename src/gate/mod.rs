//! HTTP REST gate over the machine service

pub mod error;
pub mod rest;

pub use error::{ApiError, ApiResult};
pub use rest::{AppState, create_router, serve};
