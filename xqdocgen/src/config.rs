//! Generator configuration stored in `xqdocgen.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::bundle;

/// Generator configuration (TOML).
///
/// All fields are resolved once per invocation and immutable afterwards.
/// Missing fields fall back to the defaults below, which mirror the layout
/// the original tool assumed (`target/xquerydoc`, `src/main/xquery`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DocConfig {
    /// Directory receiving the generated report tree.
    pub output_dir: PathBuf,

    /// Skip generation entirely.
    pub skip: bool,

    /// Directory holding the XQuery sources to document.
    pub source_dir: PathBuf,

    /// Base directory passed to the pipeline as `currentdir`.
    pub base_dir: PathBuf,

    /// Scratch directory the bundle is extracted into.
    /// Defaults to `<output_dir>/__impl`.
    pub scratch_dir: Option<PathBuf>,

    /// Bundle archive to extract.
    /// Defaults to `xquerydoc.zip` beside the current executable.
    pub archive: Option<PathBuf>,

    /// Wall-clock budget for the generator process in seconds.
    pub tool_timeout_secs: u64,

    /// Truncate retained generator stdout/stderr beyond this many bytes.
    pub output_limit_bytes: usize,
}

impl Default for DocConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("target/xquerydoc"),
            skip: false,
            source_dir: PathBuf::from("src/main/xquery"),
            base_dir: PathBuf::from("."),
            scratch_dir: None,
            archive: None,
            tool_timeout_secs: 30 * 60,
            output_limit_bytes: 1_000_000,
        }
    }
}

impl DocConfig {
    pub fn validate(&self) -> Result<()> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(anyhow!("output_dir must not be empty"));
        }
        if self.source_dir.as_os_str().is_empty() {
            return Err(anyhow!("source_dir must not be empty"));
        }
        if self.tool_timeout_secs == 0 {
            return Err(anyhow!("tool_timeout_secs must be > 0"));
        }
        if self.output_limit_bytes == 0 {
            return Err(anyhow!("output_limit_bytes must be > 0"));
        }
        Ok(())
    }

    /// Scratch directory for this run.
    pub fn resolve_scratch_dir(&self) -> PathBuf {
        self.scratch_dir
            .clone()
            .unwrap_or_else(|| self.output_dir.join("__impl"))
    }

    /// Bundle archive for this run.
    pub fn resolve_archive(&self) -> Result<PathBuf> {
        match &self.archive {
            Some(path) => Ok(path.clone()),
            None => bundle::default_archive(),
        }
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `DocConfig::default()`.
pub fn load_config(path: &Path) -> Result<DocConfig> {
    if !path.exists() {
        let cfg = DocConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: DocConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
