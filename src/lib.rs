//! Swagger 2.0 documents from route attributes.
//!
//! Route types declare their URLs, parameters and responses with attributes;
//! this crate collects those declarations into a [`registry::Registry`] and
//! compiles it into a Swagger 2.0 document rendered as YAML or JSON.
//!
//! # Architecture
//!
//! 1. [`scanner`] - finds `.rs` files in a project directory
//! 2. [`parser`] - parses them into syntax trees
//! 3. [`extractor`] - turns recognised attributes into [`facts::Fact`]s
//! 4. [`facts`] - applies facts to a registry in dependency order
//! 5. [`registry`] - stores route types, endpoints, parameters and response
//!    types, and resolves inheritance and path composition
//! 6. [`compiler`] - builds the document from a resolved registry
//! 7. [`serializer`] - renders the document as YAML or JSON
//!
//! # Example Usage
//!
//! ```no_run
//! use swagger_from_annotations::{
//!     compiler::DocumentCompiler,
//!     extractor::{attributes::AttributeExtractor, FactExtractor},
//!     facts::build_registry,
//!     parser::SourceParser,
//!     project::ProjectMetadata,
//!     scanner::SourceScanner,
//!     serializer::serialize_yaml,
//! };
//! use std::path::{Path, PathBuf};
//!
//! let project = ProjectMetadata::from_manifest(Path::new("./my-project/Cargo.toml")).unwrap();
//! let scan = SourceScanner::new(PathBuf::from("./my-project")).scan().unwrap();
//! let parsed = SourceParser::parse_all(&scan.source_files);
//! let facts = AttributeExtractor.extract_facts(&parsed);
//! let registry = build_registry(facts).unwrap();
//!
//! let document = DocumentCompiler::new(project).compile(&registry);
//! println!("{}", serialize_yaml(&document).unwrap());
//! ```
//!
//! The registry can also be filled by hand:
//!
//! ```
//! use swagger_from_annotations::model::{EndpointDecl, HttpMethod, NodeDecl};
//! use swagger_from_annotations::registry::Registry;
//!
//! let mut registry = Registry::new();
//! registry.upsert_node(NodeDecl::new("Users", "/users"));
//! registry.upsert_endpoint(
//!     "Users",
//!     "show",
//!     EndpointDecl {
//!         method: HttpMethod::Get,
//!         path: "/:id".to_string(),
//!         description: "Fetch one user".to_string(),
//!     },
//! );
//! registry.resolve().unwrap();
//!
//! let show = registry.find_endpoint_by_name("Users", "show").unwrap();
//! assert!(show.url_params.contains_key("id"));
//! ```
//!
//! # Command-Line Interface
//!
//! See the [`cli`] module for the command-line application.

pub mod cli;
pub mod compiler;
pub mod error;
pub mod extractor;
pub mod facts;
pub mod model;
pub mod parser;
pub mod paths;
pub mod project;
pub mod registry;
pub mod scanner;
pub mod serializer;
