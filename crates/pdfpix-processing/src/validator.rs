use std::path::Path;

/// Validation errors for uploaded files. Each variant carries the
/// offending filename so the API layer can name it in the response.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: '{filename}' is {size} bytes (max: {max} bytes)")]
    FileTooLarge {
        filename: String,
        size: usize,
        max: usize,
    },

    #[error("Invalid file extension for '{filename}' (allowed: {allowed:?})")]
    InvalidExtension {
        filename: String,
        allowed: Vec<String>,
    },

    #[error("Invalid content type '{content_type}' for '{filename}' (allowed: {allowed:?})")]
    InvalidContentType {
        filename: String,
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("Empty file: '{filename}'")]
    EmptyFile { filename: String },
}

/// Upload file validator
///
/// Checks filename extension, declared content type, and size against the
/// configured allowlists without touching the file content.
pub struct UploadValidator {
    max_file_size: usize,
    allowed_extensions: Vec<String>,
    allowed_content_types: Vec<String>,
}

impl UploadValidator {
    pub fn new(
        max_file_size: usize,
        allowed_extensions: Vec<String>,
        allowed_content_types: Vec<String>,
    ) -> Self {
        Self {
            max_file_size,
            allowed_extensions,
            allowed_content_types,
        }
    }

    /// Validate the filename extension (case-insensitive).
    pub fn validate_extension(&self, filename: &str) -> Result<(), ValidationError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match extension {
            Some(ext) if self.allowed_extensions.contains(&ext) => Ok(()),
            _ => Err(ValidationError::InvalidExtension {
                filename: filename.to_string(),
                allowed: self.allowed_extensions.clone(),
            }),
        }
    }

    /// Validate the declared content type (exact match, case-insensitive).
    pub fn validate_content_type(
        &self,
        filename: &str,
        content_type: &str,
    ) -> Result<(), ValidationError> {
        let normalized = content_type.to_lowercase();

        if !self
            .allowed_content_types
            .iter()
            .any(|ct| ct == &normalized)
        {
            return Err(ValidationError::InvalidContentType {
                filename: filename.to_string(),
                content_type: content_type.to_string(),
                allowed: self.allowed_content_types.clone(),
            });
        }

        Ok(())
    }

    /// Validate file size bounds.
    pub fn validate_file_size(&self, filename: &str, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile {
                filename: filename.to_string(),
            });
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                filename: filename.to_string(),
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Validate all aspects of one uploaded file.
    pub fn validate(
        &self,
        filename: &str,
        content_type: &str,
        size: usize,
    ) -> Result<(), ValidationError> {
        self.validate_extension(filename)?;
        self.validate_content_type(filename, content_type)?;
        self.validate_file_size(filename, size)?;
        Ok(())
    }
}
