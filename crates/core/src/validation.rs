//! Custom field validators and upload constraints.
//!
//! The `fn(&T) -> Result<(), ValidationError>` functions plug into
//! `#[validate(custom(function = "..."))]` on DTO fields.

use std::collections::HashSet;

use validator::ValidationError;

use crate::error::CoreError;
use crate::types::DbId;

/// The first character, if any, must be an uppercase letter.
pub fn first_letter_uppercase(value: &str) -> Result<(), ValidationError> {
    match value.chars().next() {
        Some(first) if first.is_alphabetic() && !first.is_uppercase() => Err(
            ValidationError::new("first_letter_uppercase")
                .with_message("the first letter must be uppercase".into()),
        ),
        _ => Ok(()),
    }
}

/// Reject id lists that name the same id twice.
pub fn unique_ids(ids: &[DbId]) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(ids.len());
    if ids.iter().all(|id| seen.insert(*id)) {
        Ok(())
    } else {
        Err(ValidationError::new("unique").with_message("ids must not repeat".into()))
    }
}

/// Reject `NaN` and infinities, which slip through `range` checks.
pub fn finite<T: std::borrow::Borrow<f64>>(value: T) -> Result<(), ValidationError> {
    if value.borrow().is_finite() {
        Ok(())
    } else {
        Err(ValidationError::new("finite").with_message("must be a finite number".into()))
    }
}

// ---------------------------------------------------------------------------
// Uploads
// ---------------------------------------------------------------------------

/// Content types accepted for image assets.
pub const IMAGE_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Size and type constraints for one kind of uploaded asset.
#[derive(Debug, Clone, Copy)]
pub struct UploadRules {
    pub max_bytes: usize,
    pub content_types: &'static [&'static str],
}

impl UploadRules {
    /// Images up to `max_megabytes` MiB.
    pub const fn images(max_megabytes: usize) -> Self {
        Self {
            max_bytes: max_megabytes * 1024 * 1024,
            content_types: IMAGE_CONTENT_TYPES,
        }
    }

    /// Check an upload, reporting failures against `field`.
    pub fn check(&self, field: &str, size: usize, content_type: &str) -> Result<(), CoreError> {
        let mut errors = Vec::new();
        if size > self.max_bytes {
            errors.push(format!(
                "file is {size} bytes; the limit is {} bytes",
                self.max_bytes
            ));
        }
        let content_type = content_type.trim().to_ascii_lowercase();
        if !self.content_types.contains(&content_type.as_str()) {
            errors.push(format!(
                "content type '{content_type}' is not allowed; expected one of {:?}",
                self.content_types
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(CoreError::InvalidFields([(field.to_string(), errors)].into()))
        }
    }
}
