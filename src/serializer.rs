//! Rendering of compiled documents as YAML or JSON text.

use crate::compiler::SwaggerDocument;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Serializes a Swagger document to YAML.
///
/// # Errors
///
/// Returns an error if serialization fails.
///
/// # Example
///
/// ```no_run
/// use swagger_from_annotations::compiler::DocumentCompiler;
/// use swagger_from_annotations::project::ProjectMetadata;
/// use swagger_from_annotations::registry::Registry;
/// use swagger_from_annotations::serializer::serialize_yaml;
///
/// let compiler = DocumentCompiler::new(ProjectMetadata::new("widgets", "1.0.0"));
/// let document = compiler.compile(&Registry::new());
/// println!("{}", serialize_yaml(&document).unwrap());
/// ```
pub fn serialize_yaml(doc: &SwaggerDocument) -> Result<String> {
    debug!("Serializing Swagger document to YAML");
    serde_yaml::to_string(doc).context("Failed to serialize Swagger document to YAML")
}

/// Serializes a Swagger document to pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_json(doc: &SwaggerDocument) -> Result<String> {
    debug!("Serializing Swagger document to JSON");
    serde_json::to_string_pretty(doc).context("Failed to serialize Swagger document to JSON")
}

/// Writes `content` to `path`, creating parent directories as needed and
/// replacing any existing file.
///
/// # Arguments
///
/// * `content` - The rendered document
/// * `path` - Destination file
///
/// # Errors
///
/// Returns an error if a parent directory cannot be created or the file
/// cannot be written.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
