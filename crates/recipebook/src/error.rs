//! Error types for recipebook.
//!
//! This module defines all error types used throughout the recipebook crate.
//! Form validation failures get their own enum so callers can show the exact
//! message for the missing field without string matching.

use std::path::PathBuf;
use thiserror::Error;

/// A recipe form that cannot be submitted.
///
/// Checks run in declaration order and the first failure wins.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// The trimmed name is empty.
    #[error("name required")]
    NameRequired,

    /// No ingredient has non-blank text.
    #[error("at least one ingredient required")]
    IngredientRequired,

    /// No step has non-blank text.
    #[error("at least one step required")]
    StepRequired,
}

/// The main error type for recipebook operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    /// Reading a key-value slot failed.
    #[error("failed to read storage key '{key}': {message}")]
    StorageRead {
        /// The slot that was being read.
        key: String,
        /// Description of what went wrong.
        message: String,
    },

    /// Writing a key-value slot failed.
    #[error("failed to write storage key '{key}': {message}")]
    StorageWrite {
        /// The slot that was being written.
        key: String,
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Recipe Errors ===
    /// A recipe form failed validation.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// No recipe exists with the requested id.
    #[error("recipe not found: {id}")]
    RecipeNotFound {
        /// The id that was looked up.
        id: String,
    },

    /// The seed set could not be loaded.
    #[error("failed to load seed recipes: {message}")]
    Seed {
        /// Description of what went wrong.
        message: String,
    },

    // === I/O Errors ===
    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for recipebook operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a storage read error for the given key.
    #[must_use]
    pub fn storage_read(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StorageRead {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a storage write error for the given key.
    #[must_use]
    pub fn storage_write(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StorageWrite {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a seed loading error.
    #[must_use]
    pub fn seed(message: impl Into<String>) -> Self {
        Self::Seed {
            message: message.into(),
        }
    }

    /// Create a not-found error for a recipe id.
    #[must_use]
    pub fn recipe_not_found(id: impl Into<String>) -> Self {
        Self::RecipeNotFound { id: id.into() }
    }

    /// Check if this error is a form validation failure.
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error indicates a missing recipe.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RecipeNotFound { .. })
    }
}
