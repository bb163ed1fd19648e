//! Verbosity tiers for indexing output.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How much the index reports about its work.
///
/// Tier 0 is silent, tier 1 enables engine diagnostics and per-file timing,
/// and tier 2 (the highest) additionally asks the engine itself to be verbose.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Verbosity(u8);

impl Verbosity {
    /// No indexing output.
    pub const QUIET: Verbosity = Verbosity(0);
    /// Engine diagnostics and per-file timing.
    pub const VERBOSE: Verbosity = Verbosity(1);
    /// Everything, including the engine's own verbose flag.
    pub const TRACE: Verbosity = Verbosity(2);

    /// Creates a verbosity level, clamping anything above the highest tier.
    pub fn new(level: u8) -> Self {
        Self(level.min(Self::TRACE.0))
    }

    /// Returns the numeric tier.
    pub fn level(self) -> u8 {
        self.0
    }

    /// Returns `true` for any tier above quiet.
    pub fn is_verbose(self) -> bool {
        self > Self::QUIET
    }

    /// Returns `true` at the highest tier.
    pub fn is_trace(self) -> bool {
        self >= Self::TRACE
    }
}

/// Error returned when a verbosity level is out of range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid verbosity level '{input}': expected 0, 1, or 2")]
pub struct ParseVerbosityError {
    /// The rejected input.
    pub input: String,
}

impl TryFrom<u8> for Verbosity {
    type Error = ParseVerbosityError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        if level > Self::TRACE.0 {
            return Err(ParseVerbosityError {
                input: level.to_string(),
            });
        }
        Ok(Self(level))
    }
}

impl From<Verbosity> for u8 {
    fn from(v: Verbosity) -> u8 {
        v.0
    }
}

impl FromStr for Verbosity {
    type Err = ParseVerbosityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level: u8 = s.trim().parse().map_err(|_| ParseVerbosityError {
            input: s.to_string(),
        })?;
        Verbosity::try_from(level)
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
