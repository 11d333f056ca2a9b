//! Project metadata for the document header.
//!
//! The `info` block comes from the `[package]` table of the project's
//! `Cargo.toml`; `host`, `basePath`, `schemes`, `produces` and `consumes` come
//! from an optional `[package.metadata.swagger]` table:
//!
//! ```toml
//! [package.metadata.swagger]
//! host = "api.example.com"
//! base-path = "/v1"
//! schemes = ["https"]
//! produces = ["application/json"]
//! consumes = ["application/json"]
//! ```

use crate::error::Error;
use anyhow::{Context, Result};
use log::{debug, warn};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use toml::Value;

/// Settings read from `[package.metadata.swagger]`
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SwaggerSettings {
    pub host: Option<String>,
    pub base_path: Option<String>,
    pub schemes: Option<Vec<String>>,
    pub produces: Option<Vec<String>>,
    pub consumes: Option<Vec<String>>,
}

/// Everything the document header needs to know about the project
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectMetadata {
    pub name: String,
    pub version: String,
    pub description: Option<String>,
    pub license: Option<String>,
    pub author: Option<String>,
    pub settings: SwaggerSettings,
}

impl ProjectMetadata {
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            description: None,
            license: None,
            author: None,
            settings: SwaggerSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: SwaggerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Read project metadata from a `Cargo.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be read or parsed, or if it has
    /// no `[package].name`.
    pub fn from_manifest(path: &Path) -> Result<Self> {
        debug!("Reading project metadata from {}", path.display());
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read project manifest: {}", path.display()))?;
        Self::from_manifest_str(&content, path)
    }

    /// Parse manifest content; `path` is only used in error messages.
    pub fn from_manifest_str(content: &str, path: &Path) -> Result<Self> {
        let manifest: Value = toml::from_str(content)
            .with_context(|| format!("Failed to parse project manifest: {}", path.display()))?;

        let missing = |field: &str| Error::MissingMetadata {
            manifest: path.to_path_buf(),
            field: field.to_string(),
        };

        let package = manifest.get("package").ok_or_else(|| missing("package"))?;
        let name = package
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| missing("package.name"))?;

        let version = match package.get("version").and_then(Value::as_str) {
            Some(version) => version,
            None => {
                warn!("No literal package.version in {}, using 0.0.0", path.display());
                "0.0.0"
            }
        };

        let author = package
            .get("authors")
            .and_then(Value::as_array)
            .map(|authors| {
                authors
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .filter(|authors| !authors.is_empty());

        let settings = match package.get("metadata").and_then(|metadata| metadata.get("swagger")) {
            Some(table) => table.clone().try_into::<SwaggerSettings>().with_context(|| {
                format!("Invalid [package.metadata.swagger] in {}", path.display())
            })?,
            None => SwaggerSettings::default(),
        };

        Ok(Self {
            name: name.to_string(),
            version: version.to_string(),
            description: string_field(package, "description"),
            license: string_field(package, "license"),
            author,
            settings,
        })
    }
}

fn string_field(table: &Value, key: &str) -> Option<String> {
    table.get(key).and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_full_manifest() {
        let manifest = r#"
            [package]
            name = "widget-api"
            version = "1.2.3"
            description = "Widgets as a service"
            license = "MIT"
            authors = ["Ada <ada@example.com>", "Grace"]

            [package.metadata.swagger]
            host = "api.example.com"
            base-path = "/v1"
            schemes = ["https"]
            produces = ["application/json"]
        "#;

        let project = ProjectMetadata::from_manifest_str(manifest, Path::new("Cargo.toml")).unwrap();
        assert_eq!(project.name, "widget-api");
        assert_eq!(project.version, "1.2.3");
        assert_eq!(project.description.as_deref(), Some("Widgets as a service"));
        assert_eq!(project.license.as_deref(), Some("MIT"));
        assert_eq!(project.author.as_deref(), Some("Ada <ada@example.com>, Grace"));
        assert_eq!(project.settings.host.as_deref(), Some("api.example.com"));
        assert_eq!(project.settings.base_path.as_deref(), Some("/v1"));
        assert_eq!(project.settings.schemes, Some(vec!["https".to_string()]));
        assert!(project.settings.consumes.is_none());
    }

    #[test]
    fn test_minimal_manifest_uses_defaults() {
        let manifest = r#"
            [package]
            name = "tiny"
            version.workspace = true
        "#;

        let project = ProjectMetadata::from_manifest_str(manifest, Path::new("Cargo.toml")).unwrap();
        assert_eq!(project.version, "0.0.0");
        assert!(project.author.is_none());
        assert_eq!(project.settings, SwaggerSettings::default());
    }

    #[test]
    fn test_missing_name_is_an_error() {
        let manifest = r#"
            [package]
            version = "1.0.0"
        "#;

        let err = ProjectMetadata::from_manifest_str(manifest, Path::new("Cargo.toml")).unwrap_err();
        let missing = err.downcast_ref::<Error>().unwrap();
        assert!(matches!(missing, Error::MissingMetadata { field, .. } if field == "package.name"));
    }

    #[test]
    fn test_workspace_manifest_is_an_error() {
        let manifest = r#"
            [workspace]
            members = ["a"]
        "#;
        assert!(ProjectMetadata::from_manifest_str(manifest, Path::new("Cargo.toml")).is_err());
    }

    #[test]
    fn test_from_manifest_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("Cargo.toml");
        fs::write(&path, "[package]\nname = \"on-disk\"\nversion = \"0.3.0\"\n").unwrap();

        let project = ProjectMetadata::from_manifest(&path).unwrap();
        assert_eq!(project.name, "on-disk");
        assert_eq!(project.version, "0.3.0");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let path = PathBuf::from("/nonexistent/Cargo.toml");
        assert!(ProjectMetadata::from_manifest(&path).is_err());
    }
}
