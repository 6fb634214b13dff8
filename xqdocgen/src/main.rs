//! xqdocgen CLI: generate XQuery documentation with the bundled xquerydoc
//! pipeline.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use xqdocgen::config::load_config;
use xqdocgen::exit_codes;
use xqdocgen::generate::{GenerateOutcome, generate};
use xqdocgen::io::archive::verify_bundle;
use xqdocgen::io::tool::CalabashRunner;
use xqdocgen::logging;

#[derive(Parser)]
#[command(
    name = "xqdocgen",
    version,
    about = "Generate XQuery documentation with the bundled xquerydoc pipeline"
)]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, global = true, default_value = "xqdocgen.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full lifecycle: extract, invoke the generator, finalize, clean up.
    Generate {
        /// Directory receiving the generated report tree.
        #[arg(long)]
        output: Option<PathBuf>,
        /// Directory holding the XQuery sources to document.
        #[arg(long)]
        source: Option<PathBuf>,
        /// Base directory passed to the pipeline as `currentdir`.
        #[arg(long)]
        base: Option<PathBuf>,
        /// Scratch directory for the extracted bundle.
        #[arg(long)]
        scratch: Option<PathBuf>,
        /// Bundle archive to extract.
        #[arg(long)]
        archive: Option<PathBuf>,
        /// Skip generation entirely.
        #[arg(long)]
        skip: bool,
    },
    /// Validate the configuration and verify the bundle archive is complete.
    Check {
        /// Bundle archive to verify.
        #[arg(long)]
        archive: Option<PathBuf>,
    },
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Generate {
            output,
            source,
            base,
            scratch,
            archive,
            skip,
        } => {
            let mut config = load_config(&cli.config)?;
            if let Some(output) = output {
                config.output_dir = output;
            }
            if let Some(source) = source {
                config.source_dir = source;
            }
            if let Some(base) = base {
                config.base_dir = base;
            }
            if let Some(scratch) = scratch {
                config.scratch_dir = Some(scratch);
            }
            if let Some(archive) = archive {
                config.archive = Some(archive);
            }
            if skip {
                config.skip = true;
            }
            config.validate()?;

            let outcome = generate(&config, &CalabashRunner)?;
            Ok(match outcome {
                GenerateOutcome::Skipped | GenerateOutcome::Completed => exit_codes::OK,
                GenerateOutcome::ToolFailed { .. } | GenerateOutcome::RunError => {
                    exit_codes::GENERATION_FAILED
                }
            })
        }
        Command::Check { archive } => {
            let mut config = load_config(&cli.config)?;
            if let Some(archive) = archive {
                config.archive = Some(archive);
            }
            config.validate()?;
            verify_bundle(&config.resolve_archive()?)?;
            println!("bundle ok");
            Ok(exit_codes::OK)
        }
    }
}
