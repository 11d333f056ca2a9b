use anyhow::{Context, Result};
use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Directory names never descended into besides hidden ones
const SKIPPED_DIRS: &[&str] = &["target"];

/// Finds the source files that may carry route attributes.
///
/// Walks a project directory recursively, skipping build output and hidden
/// directories, and returns `.rs` files sorted by path so that declarations
/// are collected in the same order on every run.
///
/// # Example
///
/// ```no_run
/// use swagger_from_annotations::scanner::SourceScanner;
/// use std::path::PathBuf;
///
/// let scan = SourceScanner::new(PathBuf::from("./my-project")).scan().unwrap();
/// println!("Found {} source files", scan.source_files.len());
/// ```
pub struct SourceScanner {
    root_path: PathBuf,
}

/// Outcome of a scan
#[derive(Debug)]
pub struct ScanResult {
    /// Every `.rs` file found, sorted
    pub source_files: Vec<PathBuf>,
    /// Entries that could not be read; the scan carries on past them
    pub warnings: Vec<String>,
}

impl SourceScanner {
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Walk the project tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the root is not a readable directory.
    pub fn scan(&self) -> Result<ScanResult> {
        let metadata = std::fs::metadata(&self.root_path)
            .with_context(|| format!("Cannot access project root: {}", self.root_path.display()))?;
        if !metadata.is_dir() {
            anyhow::bail!("Project root is not a directory: {}", self.root_path.display());
        }

        let mut source_files = Vec::new();
        let mut warnings = Vec::new();

        let walker = WalkDir::new(&self.root_path)
            .into_iter()
            .filter_entry(|entry| entry.path() == self.root_path || !Self::is_skipped(entry));

        for entry in walker {
            match entry {
                Ok(entry) if Self::is_source_file(entry.path()) => {
                    source_files.push(entry.into_path());
                }
                Ok(_) => {}
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        source_files.sort();
        debug!(
            "Scanned {}: {} source files, {} warnings",
            self.root_path.display(),
            source_files.len(),
            warnings.len()
        );

        Ok(ScanResult {
            source_files,
            warnings,
        })
    }

    fn is_skipped(entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();
        name.starts_with('.') || (entry.file_type().is_dir() && SKIPPED_DIRS.contains(&name.as_ref()))
    }

    fn is_source_file(path: &Path) -> bool {
        path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some("rs")
    }
}
