//! Test-only helpers: scripted tool runners and bundle fixtures.

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result, anyhow};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::bundle;
use crate::config::DocConfig;
use crate::io::tool::{RunOutcome, RunRequest, ToolRunner};

/// Scripted [`ToolRunner`] that records invocations and never spawns a
/// process.
pub struct ScriptedToolRunner {
    exit_code: i32,
    write_report: bool,
    calls: AtomicUsize,
}

impl ScriptedToolRunner {
    /// Runner that writes the report file and exits zero.
    pub fn succeeding() -> Self {
        Self {
            exit_code: 0,
            write_report: true,
            calls: AtomicUsize::new(0),
        }
    }

    /// Runner that writes nothing and exits with the given code.
    pub fn failing(exit_code: i32) -> Self {
        Self {
            exit_code,
            write_report: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times the runner was invoked.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ToolRunner for ScriptedToolRunner {
    fn run(&self, request: &RunRequest) -> Result<RunOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.write_report {
            if let Some(parent) = request.report_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&request.report_path, "<html>xquery documentation</html>\n")?;
        }
        Ok(RunOutcome {
            exit_code: Some(self.exit_code),
            timed_out: false,
        })
    }
}

/// Runner that fails to execute at all (spawn-failure stand-in).
pub struct BrokenToolRunner;

impl ToolRunner for BrokenToolRunner {
    fn run(&self, _request: &RunRequest) -> Result<RunOutcome> {
        Err(anyhow!("tool could not be executed"))
    }
}

/// Deterministic contents for a fixture bundle entry.
pub fn fixture_contents(rel: &str) -> String {
    format!("fixture: {rel}\n")
}

/// Write a minimal bundle archive containing everything a run extracts:
/// the Calabash jar, the pipeline file, and the static assets, all under the
/// archive prefix with directory entries interleaved.
pub fn write_bundle_zip(path: &Path) -> Result<()> {
    write_zip_with_entries(
        path,
        [bundle::CALABASH_JAR, bundle::PIPELINE_FILE]
            .into_iter()
            .chain(bundle::STATIC_ASSETS),
    )
}

/// Like [`write_bundle_zip`], but without the static assets. Used to exercise
/// finalization failures after a successful run.
pub fn write_partial_bundle_zip(path: &Path) -> Result<()> {
    write_zip_with_entries(path, [bundle::CALABASH_JAR, bundle::PIPELINE_FILE])
}

fn write_zip_with_entries<'a>(
    path: &Path,
    entries: impl IntoIterator<Item = &'a str>,
) -> Result<()> {
    let file =
        fs::File::create(path).with_context(|| format!("create bundle {}", path.display()))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    zip.add_directory(bundle::ARCHIVE_PREFIX, options)
        .context("add prefix directory")?;
    let mut added_dirs = HashSet::new();
    for rel in entries {
        if let Some(parent) = Path::new(rel).parent()
            && !parent.as_os_str().is_empty()
        {
            // Interleaved directory entries; extraction must skip these.
            let dir = format!("{}{}/", bundle::ARCHIVE_PREFIX, parent.display());
            if added_dirs.insert(dir.clone()) {
                zip.add_directory(dir.as_str(), options)
                    .with_context(|| format!("add directory {dir}"))?;
            }
        }
        let name = format!("{}{rel}", bundle::ARCHIVE_PREFIX);
        zip.start_file(name.as_str(), options)
            .with_context(|| format!("start entry {name}"))?;
        zip.write_all(fixture_contents(rel).as_bytes())
            .with_context(|| format!("write entry {name}"))?;
    }
    zip.start_file("README.md", options)
        .context("start entry README.md")?;
    zip.write_all(b"outside the bundle prefix\n")
        .context("write entry README.md")?;
    zip.finish().context("finish bundle")?;
    Ok(())
}

/// Temporary project directory with a bundle archive and an XQuery source
/// tree, for driving full generation runs.
pub struct TestProject {
    dir: tempfile::TempDir,
}

impl TestProject {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create tempdir")?;
        let project = Self { dir };
        let source_dir = project.path().join("src/main/xquery");
        fs::create_dir_all(&source_dir).context("create source dir")?;
        fs::write(
            source_dir.join("library.xq"),
            "module namespace lib = \"urn:example:lib\";\n",
        )
        .context("write sample module")?;
        write_bundle_zip(&project.archive_path())?;
        Ok(project)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn archive_path(&self) -> PathBuf {
        self.path().join("bundle.zip")
    }

    /// Config rooted in this project, pointing at the fixture archive.
    pub fn config(&self) -> DocConfig {
        DocConfig {
            output_dir: self.path().join("target/xquerydoc"),
            source_dir: self.path().join("src/main/xquery"),
            base_dir: self.path().to_path_buf(),
            archive: Some(self.archive_path()),
            ..DocConfig::default()
        }
    }
}
