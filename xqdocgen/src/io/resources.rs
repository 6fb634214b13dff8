//! Static assets copied beside the generated report, plus scratch cleanup.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::bundle;

/// Copy the syntax-highlighting assets from the scratch directory into
/// `<report_dir>/lib`, creating it first.
///
/// Only called after a successful generator run. A failure here is reported
/// to the caller but never reintroduces the scratch directory.
pub fn copy_static_assets(scratch_dir: &Path, report_dir: &Path) -> Result<()> {
    let lib = report_dir.join("lib");
    fs::create_dir_all(&lib).with_context(|| format!("create {}", lib.display()))?;
    for rel in bundle::STATIC_ASSETS {
        let src = scratch_dir.join(rel);
        let name = Path::new(rel)
            .file_name()
            .with_context(|| format!("asset path {rel} has no file name"))?;
        let dest = lib.join(name);
        fs::copy(&src, &dest)
            .with_context(|| format!("copy {} to {}", src.display(), dest.display()))?;
    }
    Ok(())
}

/// Remove the scratch directory. Removal errors are dropped; a stale scratch
/// tree is overwritten by the next run's extraction.
pub fn remove_scratch(scratch_dir: &Path) {
    if let Err(err) = fs::remove_dir_all(scratch_dir)
        && scratch_dir.exists()
    {
        debug!(
            err = %err,
            scratch = %scratch_dir.display(),
            "failed to remove scratch directory"
        );
    }
}
