//! Exit codes for the CLI.
//!
//! Per-asset download failures never change the exit code; these report
//! only whether a command could do its job at all.

/// Successful execution
pub const SUCCESS: u8 = 0;

/// General/unspecified error
pub const GENERAL_ERROR: u8 = 1;

/// The provenance store exists but cannot be parsed
pub const STATE_CORRUPT: u8 = 3;

/// Catalog or settings file is malformed or inconsistent
pub const CONFIG_INVALID: u8 = 4;

/// Input file not found
pub const NOT_FOUND: u8 = 5;

/// Permission denied reading or writing project files
pub const PERMISSION_DENIED: u8 = 6;

/// Required signing secrets are missing
pub const SECRETS_MISSING: u8 = 7;
