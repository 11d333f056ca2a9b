//! Turning parsed source into registry facts.
//!
//! An extractor reads syntax trees and reports what the code declares as a
//! flat list of [`Fact`]s. It never touches the registry itself; ordering and
//! merging are handled by [`crate::facts::apply_facts`].
//!
//! # Example
//!
//! ```no_run
//! use swagger_from_annotations::extractor::{attributes::AttributeExtractor, FactExtractor};
//! use swagger_from_annotations::parser::SourceParser;
//! use std::path::Path;
//!
//! let parsed = SourceParser::parse_file(Path::new("src/routes.rs")).unwrap();
//! let facts = AttributeExtractor.extract_facts(&[parsed]);
//! println!("Found {} declarations", facts.len());
//! ```

pub mod attributes;

use crate::facts::Fact;
use crate::parser::ParsedFile;

/// Source of registry facts.
pub trait FactExtractor {
    /// Extracts every declaration found in `parsed_files`, in source order.
    fn extract_facts(&self, parsed_files: &[ParsedFile]) -> Vec<Fact>;
}
