//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Usage error (reported by clap)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// The ledger could not be written back to the data file at exit.
    pub const SAVE_FAILED: i32 = 3;
}

/// Overrides the config file location.
pub const CONFIG_ENV: &str = "MARINA_CONFIG";

/// Overrides the log filter.
pub const LOG_ENV: &str = "MARINA_LOG";
