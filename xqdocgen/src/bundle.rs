//! Fixed layout of the bundled xquerydoc distribution.
//!
//! All paths here are part of the archive/command-line contract with the
//! bundled tool and are not configurable.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Entry prefix inside the bundle archive; stripped on extraction.
pub const ARCHIVE_PREFIX: &str = "xquerydoc/";

/// Default bundle file name, resolved beside the current executable.
pub const DEFAULT_ARCHIVE_NAME: &str = "xquerydoc.zip";

/// XML Calabash jar, scratch-relative.
pub const CALABASH_JAR: &str = "deps/xmlcalabash/calabash.jar";

/// XProc pipeline driving the generator, scratch-relative.
pub const PIPELINE_FILE: &str = "xquerydoc.xpl";

/// Syntax-highlighting assets copied beside the report, scratch-relative.
pub const STATIC_ASSETS: [&str; 3] = [
    "src/lib/prettify.js",
    "src/lib/prettify.css",
    "src/lib/lang-xq.js",
];

/// Report directory created under the configured output directory.
pub const REPORT_DIR: &str = "xquerydoc";

/// Generated report file name.
pub const REPORT_FILE: &str = "XQuery_documentation.html";

/// Heap bound passed to the JVM.
pub const JAVA_MAX_HEAP: &str = "-Xmx1024m";

/// Directory receiving the generated report and its `lib/` assets.
pub fn report_dir(output_dir: &Path) -> PathBuf {
    output_dir.join(REPORT_DIR)
}

/// Full path of the generated HTML report.
pub fn report_path(output_dir: &Path) -> PathBuf {
    report_dir(output_dir).join(REPORT_FILE)
}

/// Resolve the bundle archive beside the current executable.
///
/// This is the fallback used when no archive path is configured; the archive
/// location stays injectable so runs and tests can point anywhere else.
pub fn default_archive() -> Result<PathBuf> {
    let exe = env::current_exe().context("resolve current executable")?;
    let dir = exe
        .parent()
        .context("current executable has no parent directory")?;
    Ok(dir.join(DEFAULT_ARCHIVE_NAME))
}
