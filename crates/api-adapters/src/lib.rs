//! # api-adapters
//!
//! The HTTP orchestration layer: axum routes, request extraction, error
//! mapping, and request metrics. Handlers translate between the wire and
//! the services; rendering is the client's job.

#[cfg(feature = "web-axum")]
pub mod error;
#[cfg(feature = "web-axum")]
pub mod extract;
#[cfg(feature = "web-axum")]
pub mod handlers;
#[cfg(feature = "web-axum")]
pub mod metrics;
#[cfg(feature = "web-axum")]
pub mod state;

#[cfg(feature = "web-axum")]
pub use error::{ApiError, ApiResult};
#[cfg(feature = "web-axum")]
pub use state::ApiState;

#[cfg(feature = "web-axum")]
mod router;
#[cfg(feature = "web-axum")]
pub use router::{cors_policy, router};
