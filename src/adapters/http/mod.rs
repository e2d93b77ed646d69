//! HTTP adapters - REST API implementations.
//!
//! Each flow has its own HTTP adapter for endpoint exposure; `router`
//! assembles them with the shared state and transport layers.

pub mod billing;
pub mod error;
pub mod health;
pub mod middleware;
pub mod router;
pub mod steam;

pub use error::{ApiError, ErrorResponse};
pub use router::{api_router, build_router, AppState};
