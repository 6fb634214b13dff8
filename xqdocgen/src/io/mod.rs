//! Side-effecting pieces of a generation run.

pub mod archive;
pub mod process;
pub mod resources;
pub mod tool;
