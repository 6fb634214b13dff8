//! Stable exit codes for xqdocgen commands.

/// Generation completed or was skipped.
pub const OK: i32 = 0;
/// Invalid config, unreadable bundle archive, or extraction failure.
pub const INVALID: i32 = 1;
/// The generator ran but failed (non-zero exit, timeout, or spawn failure).
pub const GENERATION_FAILED: i32 = 2;
