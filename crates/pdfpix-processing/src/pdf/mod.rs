//! PDF embedded-image extraction.
//!
//! Parsing is delegated to `lopdf`; this module walks the object model
//! (pages, resources, image XObjects), decides each image's native
//! format, and persists the results.

mod decode;
mod extract;

pub use extract::{ExtractError, Extraction, ImageExtractor};
