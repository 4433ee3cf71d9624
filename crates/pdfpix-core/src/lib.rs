//! Core types shared across the pdfpix workspace: configuration and the
//! unified application error.

pub mod config;
pub mod error;

pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
