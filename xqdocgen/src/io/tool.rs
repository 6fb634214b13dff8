//! Generator invocation via XML Calabash on a JVM.
//!
//! The [`ToolRunner`] trait decouples lifecycle orchestration from the actual
//! JVM invocation. Tests use scripted runners that return predetermined
//! outcomes without spawning processes.

use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, error, info, instrument};

use crate::bundle;
use crate::io::process::run_logged;

/// Parameters for one generator invocation.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Scratch directory holding the extracted bundle.
    pub scratch_dir: PathBuf,
    /// Path the generated report is redirected to (`-oresult=`).
    pub report_path: PathBuf,
    /// Directory holding the XQuery sources to document.
    pub source_dir: PathBuf,
    /// Directory receiving generated artifacts (parent of `report_path`).
    pub report_dir: PathBuf,
    /// Working directory passed to the pipeline as `currentdir`.
    pub base_dir: PathBuf,
    /// Wall-clock budget for the child process.
    pub timeout: Duration,
    /// Truncate retained child output beyond this many bytes.
    pub output_limit_bytes: usize,
}

/// Result of one generator invocation.
#[derive(Debug, Clone, Copy)]
pub struct RunOutcome {
    /// Child exit code; `None` when killed by a signal or the timeout.
    pub exit_code: Option<i32>,
    pub timed_out: bool,
}

impl RunOutcome {
    /// Exit code zero and no timeout.
    pub fn success(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }
}

/// Abstraction over the external documentation generator.
pub trait ToolRunner {
    /// Run the generator once.
    ///
    /// `Err` means the process could not be executed at all; a run that
    /// completed with a non-zero code is an `Ok` outcome.
    fn run(&self, request: &RunRequest) -> Result<RunOutcome>;
}

/// Runner that spawns `java` against the bundled Calabash jar.
pub struct CalabashRunner;

impl ToolRunner for CalabashRunner {
    #[instrument(skip_all, fields(timeout_secs = request.timeout.as_secs()))]
    fn run(&self, request: &RunRequest) -> Result<RunOutcome> {
        let cmd = build_command(request);
        debug!(cmd = ?cmd, "generator command line");
        info!(
            report = %request.report_path.display(),
            "generating xquery documentation, this may take a while"
        );

        let output = run_logged(cmd, request.timeout, request.output_limit_bytes)?;
        if output.timed_out {
            error!(
                timeout_secs = request.timeout.as_secs(),
                "xquerydoc timed out"
            );
        }
        Ok(RunOutcome {
            exit_code: output.status.code(),
            timed_out: output.timed_out,
        })
    }
}

/// Fixed command-line contract of the bundled pipeline:
/// `java -Xmx1024m -jar <calabash> -oresult=<report> <pipeline>
/// xquery=<source> output=<report dir> currentdir=<base> format=html`.
pub fn build_command(request: &RunRequest) -> Command {
    let mut cmd = Command::new("java");
    cmd.arg(bundle::JAVA_MAX_HEAP)
        .arg("-jar")
        .arg(request.scratch_dir.join(bundle::CALABASH_JAR))
        .arg(format!("-oresult={}", request.report_path.display()))
        .arg(request.scratch_dir.join(bundle::PIPELINE_FILE))
        .arg(format!("xquery={}", request.source_dir.display()))
        .arg(format!("output={}", request.report_dir.display()))
        .arg(format!("currentdir={}", request.base_dir.display()))
        .arg("format=html");
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn command_line_matches_pipeline_contract() {
        let request = RunRequest {
            scratch_dir: PathBuf::from("/tmp/scratch"),
            report_path: PathBuf::from("/out/xquerydoc/XQuery_documentation.html"),
            source_dir: PathBuf::from("/proj/src/main/xquery"),
            report_dir: PathBuf::from("/out/xquerydoc"),
            base_dir: PathBuf::from("/proj"),
            timeout: Duration::from_secs(60),
            output_limit_bytes: 1000,
        };

        let cmd = build_command(&request);
        assert_eq!(cmd.get_program(), "java");

        let args: Vec<&Path> = cmd.get_args().map(Path::new).collect();
        assert_eq!(
            args,
            vec![
                Path::new("-Xmx1024m"),
                Path::new("-jar"),
                Path::new("/tmp/scratch/deps/xmlcalabash/calabash.jar"),
                Path::new("-oresult=/out/xquerydoc/XQuery_documentation.html"),
                Path::new("/tmp/scratch/xquerydoc.xpl"),
                Path::new("xquery=/proj/src/main/xquery"),
                Path::new("output=/out/xquerydoc"),
                Path::new("currentdir=/proj"),
                Path::new("format=html"),
            ]
        );
    }

    #[test]
    fn outcome_success_requires_zero_exit_without_timeout() {
        let ok = RunOutcome {
            exit_code: Some(0),
            timed_out: false,
        };
        assert!(ok.success());

        let failed = RunOutcome {
            exit_code: Some(1),
            timed_out: false,
        };
        assert!(!failed.success());

        let timed_out = RunOutcome {
            exit_code: Some(0),
            timed_out: true,
        };
        assert!(!timed_out.success());

        let killed = RunOutcome {
            exit_code: None,
            timed_out: false,
        };
        assert!(!killed.success());
    }
}
