//! PDF processing: upload validation, embedded-image extraction, and ZIP
//! packaging. No HTTP concerns live here; the API crate maps the typed
//! errors onto responses.

pub mod archive;
pub mod pdf;
pub mod validator;

pub use archive::ArchiveError;
pub use pdf::{ExtractError, Extraction, ImageExtractor};
pub use validator::{UploadValidator, ValidationError};
