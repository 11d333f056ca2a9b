use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for registry resolution
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the application
#[derive(Debug, Error)]
pub enum Error {
    /// `extends` relations loop back onto themselves
    #[error("inheritance cycle between route types: {}", chain.join(" -> "))]
    InheritanceCycle { chain: Vec<String> },

    /// The project manifest lacks a field the document header needs
    #[error("missing `{field}` in project manifest {}", manifest.display())]
    MissingMetadata { manifest: PathBuf, field: String },
}
