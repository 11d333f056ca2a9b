use crate::compiler::DocumentCompiler;
use crate::extractor::attributes::AttributeExtractor;
use crate::extractor::FactExtractor;
use crate::facts::build_registry;
use crate::parser::SourceParser;
use crate::project::ProjectMetadata;
use crate::scanner::SourceScanner;
use crate::serializer::{serialize_json, serialize_yaml, write_to_file};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info, warn};
use std::path::PathBuf;

/// Generate a Swagger 2.0 document from route attributes in a Rust project
#[derive(Parser, Debug)]
#[command(name = "swagger-from-annotations")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the Rust project directory
    #[arg(value_name = "PROJECT_PATH")]
    pub project_path: PathBuf,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "yaml")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Manifest holding project metadata [default: PROJECT_PATH/Cargo.toml]
    #[arg(long = "manifest-path", value_name = "FILE")]
    pub manifest_path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl CliArgs {
    pub fn manifest_path(&self) -> PathBuf {
        self.manifest_path
            .clone()
            .unwrap_or_else(|| self.project_path.join("Cargo.toml"))
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}

/// Parse command line arguments
pub fn parse_args() -> Result<CliArgs> {
    let args = CliArgs::parse();
    parse_args_from_parsed(args)
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.project_path.exists() {
        anyhow::bail!("Project path does not exist: {}", args.project_path.display());
    }
    if !args.project_path.is_dir() {
        anyhow::bail!("Project path is not a directory: {}", args.project_path.display());
    }

    let manifest_path = args.manifest_path();
    if !manifest_path.is_file() {
        anyhow::bail!("Project manifest not found: {}", manifest_path.display());
    }

    info!("Project path: {}", args.project_path.display());
    info!("Manifest: {}", manifest_path.display());
    info!("Output format: {:?}", args.output_format);
    match &args.output_path {
        Some(output) => info!("Output file: {}", output.display()),
        None => info!("Output: stdout"),
    }

    Ok(args)
}

/// Run the whole pipeline and return the rendered document.
///
/// # Arguments
///
/// * `args` - Validated command-line arguments
///
/// # Returns
///
/// The document rendered in `args.output_format`
///
/// # Errors
///
/// Returns an error if the manifest is missing or lacks a package name, if
/// the project cannot be scanned, if `extends` relations loop, or if
/// serialization fails. Files that fail to parse are skipped with a warning.
pub fn generate(args: &CliArgs) -> Result<String> {
    let project = ProjectMetadata::from_manifest(&args.manifest_path())?;
    info!("Documenting {} {}", project.name, project.version);

    let scan_result = SourceScanner::new(args.project_path.clone()).scan()?;
    info!("Found {} Rust files", scan_result.source_files.len());
    if scan_result.source_files.is_empty() {
        warn!("No Rust files found in {}", args.project_path.display());
    }

    let parsed_files = SourceParser::parse_all(&scan_result.source_files);
    info!("Successfully parsed {} files", parsed_files.len());

    let facts = AttributeExtractor.extract_facts(&parsed_files);
    info!("Extracted {} declarations", facts.len());

    let registry = build_registry(facts).context("Failed to resolve route declarations")?;
    info!(
        "Registered {} route types, {} endpoints, {} response types",
        registry.nodes().count(),
        registry.endpoint_count(),
        registry.response_types().count()
    );
    if registry.endpoint_count() == 0 {
        warn!("No endpoints found in the project");
    }

    let document = DocumentCompiler::new(project).compile(&registry);
    debug!("Compiled {} paths", document.paths.len());

    match args.output_format {
        OutputFormat::Yaml => serialize_yaml(&document),
        OutputFormat::Json => serialize_json(&document),
    }
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    let content = generate(&args)?;

    match &args.output_path {
        Some(output_path) => {
            write_to_file(&content, output_path)?;
            info!("Wrote Swagger document to {}", output_path.display());
        }
        None => println!("{}", content),
    }

    Ok(())
}
