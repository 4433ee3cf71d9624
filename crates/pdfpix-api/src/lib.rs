//! PDF image extraction HTTP API
//!
//! Handlers, application state, route setup, and server startup.

mod api_doc;
pub mod cleanup;
pub mod error;
mod handlers;
pub mod setup;
pub mod state;
pub mod telemetry;

pub use error::ErrorResponse;
