//! Error types for the store

use std::fmt;

use pagecraft_common::CommonError;
use pagecraft_editor::{EditorError, MutationError};
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Page not found: {0}")]
    NotFound(String),

    #[error("Invalid page id: {0:?}")]
    InvalidPageId(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Editor error: {0}")]
    Editor(#[from] EditorError),

    #[error("Backend error: {0}")]
    Backend(String),
}

impl From<CommonError> for StoreError {
    fn from(err: CommonError) -> Self {
        match err {
            CommonError::Io(e) => StoreError::Io(e),
            CommonError::Json(e) => StoreError::Json(e),
            CommonError::Generic(message) => StoreError::Backend(message),
        }
    }
}

impl From<MutationError> for StoreError {
    fn from(err: MutationError) -> Self {
        StoreError::Editor(err.into())
    }
}

/// One problem found in a stored document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// JSON path of the offending value, e.g. `blocks[2].content`
    pub path: String,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// A stored document was rejected. Lists every issue found, not just the first.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub page_id: String,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub fn new(page_id: impl Into<String>) -> Self {
        Self {
            page_id: page_id.into(),
            issues: Vec::new(),
        }
    }

    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            path: path.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// `Ok(())` when no issues were collected
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid document for page {} ({} issue", self.page_id, self.issues.len())?;
        if self.issues.len() != 1 {
            write!(f, "s")?;
        }
        write!(f, ")")?;
        for issue in &self.issues {
            write!(f, "\n  - {}", issue)?;
        }
        Ok(())
    }
}
