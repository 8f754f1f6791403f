//! Error types for tagtree

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for tagtree
#[derive(Debug, Error)]
pub enum TagtreeError {
    #[error("Document not found: {0}")]
    DocumentNotFound(PathBuf),

    #[error("Already initialized: {0}")]
    AlreadyInitialized(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl TagtreeError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            TagtreeError::Config(_) | TagtreeError::TomlDeserialize(_) => 2,
            TagtreeError::DocumentNotFound(_) => 3,
            TagtreeError::AlreadyInitialized(_) => 4,
            _ => 1,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            TagtreeError::DocumentNotFound(path) => {
                format!(
                    "Document not found: {}\n\n\
                    Suggestions:\n\
                    • Paths are resolved relative to the site root\n\
                    • Check the file suffix matches site.source_suffix in tagtree.toml\n\
                    • Run 'tagtree tags' to check the site is being scanned",
                    path.display()
                )
            }
            TagtreeError::AlreadyInitialized(path) => {
                format!(
                    "Already initialized: {}\n\n\
                    Suggestions:\n\
                    • Edit the existing tagtree.toml instead\n\
                    • Remove tagtree.toml to start from the defaults",
                    path.display()
                )
            }
            TagtreeError::TomlDeserialize(err) => {
                format!(
                    "Failed to parse tagtree.toml: {}\n\n\
                    Valid sections: [site], [cloud], [pages], [related], [templates]\n\
                    Example: algorithm = \"count\" under [cloud]",
                    err
                )
            }
            TagtreeError::Config(msg) => msg.clone(),
            _ => self.to_string(),
        }
    }
}

/// Result type using TagtreeError
pub type Result<T> = std::result::Result<T, TagtreeError>;
