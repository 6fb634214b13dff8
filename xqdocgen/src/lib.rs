//! Driver for the bundled xquerydoc documentation generator.
//!
//! This crate implements a scoped external-tool lifecycle: a bundled
//! third-party generator is extracted from a zip archive into a scratch
//! directory, invoked once as a child process against a project's XQuery
//! sources, its static assets are copied beside the generated report, and the
//! scratch directory is removed on every path after extraction.
//!
//! - **[`generate`]**: lifecycle orchestration (extract → run → finalize →
//!   clean up) and the per-run outcome taxonomy.
//! - **[`io`]**: side-effecting pieces (archive extraction, child process
//!   execution, resource copies). The generator sits behind the
//!   [`io::tool::ToolRunner`] trait so tests never need a JVM.

pub mod bundle;
pub mod config;
pub mod exit_codes;
pub mod generate;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
