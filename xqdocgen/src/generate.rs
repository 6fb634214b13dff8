//! Orchestration of a single documentation generation run.

use std::fs;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, error, info, instrument};

use crate::bundle;
use crate::config::DocConfig;
use crate::io::archive::extract_assets;
use crate::io::resources::{copy_static_assets, remove_scratch};
use crate::io::tool::{RunRequest, ToolRunner};

/// Terminal state of one generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// The skip flag was set; nothing ran.
    Skipped,
    /// The generator exited zero and the report was finalized.
    Completed,
    /// The generator ran but exited non-zero or hit the timeout.
    ToolFailed { exit_code: Option<i32> },
    /// The generator could not be executed (spawn or stream failure).
    RunError,
}

/// Execute one generation run: extract the bundle into the scratch directory,
/// invoke the generator, copy the static assets, and remove the scratch
/// directory.
///
/// Extraction failure is the only hard error and aborts before any process is
/// spawned. Everything after a successful extraction funnels into scratch
/// cleanup: run failures and finalization failures are logged and reported
/// through the returned outcome, not raised.
#[instrument(skip_all, fields(output = %config.output_dir.display()))]
pub fn generate<R: ToolRunner>(config: &DocConfig, tool: &R) -> Result<GenerateOutcome> {
    if config.skip {
        info!("skipping xquery doc generation");
        return Ok(GenerateOutcome::Skipped);
    }

    let archive = config.resolve_archive()?;
    let scratch_dir = config.resolve_scratch_dir();
    extract_assets(&archive, bundle::ARCHIVE_PREFIX, &scratch_dir)
        .context("extract xquerydoc bundle")?;

    let report_dir = bundle::report_dir(&config.output_dir);
    let attempt = (|| -> Result<GenerateOutcome> {
        fs::create_dir_all(&report_dir)
            .with_context(|| format!("create report directory {}", report_dir.display()))?;

        let request = RunRequest {
            scratch_dir: scratch_dir.clone(),
            report_path: bundle::report_path(&config.output_dir),
            source_dir: config.source_dir.clone(),
            report_dir: report_dir.clone(),
            base_dir: config.base_dir.clone(),
            timeout: Duration::from_secs(config.tool_timeout_secs),
            output_limit_bytes: config.output_limit_bytes,
        };
        let run = tool.run(&request)?;
        if !run.success() {
            error!(
                exit_code = ?run.exit_code,
                timed_out = run.timed_out,
                "xquerydoc exited with failure"
            );
            return Ok(GenerateOutcome::ToolFailed {
                exit_code: run.exit_code,
            });
        }

        // Finalization failures do not undo a successful generation.
        if let Err(err) = copy_static_assets(&scratch_dir, &report_dir) {
            error!(err = %err, "failed to copy static assets");
        }
        debug!(report = %request.report_path.display(), "generation complete");
        Ok(GenerateOutcome::Completed)
    })();

    remove_scratch(&scratch_dir);

    match attempt {
        Ok(outcome) => Ok(outcome),
        Err(err) => {
            error!(err = %err, "while generating xquery doc");
            Ok(GenerateOutcome::RunError)
        }
    }
}
