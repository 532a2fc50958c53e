//! API layer - HTTP handlers and middleware
//!
//! All HTTP-related concerns: request handlers, middleware,
//! custom extractors, and route definitions.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;
