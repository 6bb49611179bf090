//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("Registry error: {0}")]
    Registry(#[from] crate::registry::RegistryError),

    #[error("Template error: {0}")]
    Template(#[from] crate::templates::TemplateError),

    #[error("Unknown viewport: {0} (expected desktop, tablet or mobile)")]
    UnknownViewport(String),

    #[error("{0} did not create a block")]
    NothingCreated(&'static str),

    #[error("Clipboard is empty")]
    EmptyClipboard,
}
