//! # Runtime Configuration Module
//!
//! Environment-variable configuration for dispatch-time behavior.
//!
//! ## Environment Variables
//!
//! ### `PATHROUTER_SLOW_MATCH_US`
//!
//! Route matching slower than this many microseconds is logged at `warn`
//! instead of `info`. Accepts decimal (`1000`) or hexadecimal (`0x3e8`).
//!
//! Default: `1000` (1 ms)
//!
//! ## Usage
//!
//! ```rust
//! use pathrouter::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! println!("Slow match threshold: {:?}", config.slow_match_threshold);
//! ```

use std::env;
use std::time::Duration;

/// Environment variable holding the slow-match threshold in microseconds
pub const SLOW_MATCH_ENV: &str = "PATHROUTER_SLOW_MATCH_US";

const DEFAULT_SLOW_MATCH_US: u64 = 1_000;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Matching slower than this is reported as slow (default: 1 ms)
    pub slow_match_threshold: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            slow_match_threshold: Duration::from_micros(DEFAULT_SLOW_MATCH_US),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process environment
    ///
    /// Unparseable values fall back to the default.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let micros = lookup(SLOW_MATCH_ENV)
            .and_then(|val| parse_micros(val.trim()))
            .unwrap_or(DEFAULT_SLOW_MATCH_US);
        RuntimeConfig {
            slow_match_threshold: Duration::from_micros(micros),
        }
    }
}

fn parse_micros(val: &str) -> Option<u64> {
    if let Some(hex) = val.strip_prefix("0x") {
        u64::from_str_radix(hex, 16).ok()
    } else {
        val.parse().ok()
    }
}
