//! Swagger from annotations - command-line tool for generating Swagger 2.0
//! documents from route attributes in a Rust project.
//!
//! # Usage
//!
//! ```bash
//! swagger-from-annotations [OPTIONS] <PROJECT_PATH>
//! ```
//!
//! # Examples
//!
//! Generate YAML documentation:
//! ```bash
//! swagger-from-annotations ./my-api-project -o swagger.yaml
//! ```
//!
//! Generate JSON documentation using another manifest:
//! ```bash
//! swagger-from-annotations ./my-api-project -f json --manifest-path ./Cargo.toml
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use swagger_from_annotations::cli;

fn main() -> Result<()> {
    // Parse once to learn the verbosity, then validate after logger init
    let parsed = cli::CliArgs::parse();

    let log_level = if parsed.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("Swagger generator starting...");

    let args = cli::parse_args_from_parsed(parsed)?;
    cli::run(args)?;

    info!("Swagger document generation completed successfully");

    Ok(())
}
