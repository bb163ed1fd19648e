//! Option bitmasks passed between the index and the parser engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::BitOr;

/// Configuration flags held by the parse index.
///
/// Bit values follow the conventional front-end index flags so that a native
/// engine can pass them through unchanged.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GlobalOptions(u32);

impl GlobalOptions {
    /// No flags set.
    pub const NONE: GlobalOptions = GlobalOptions(0x0);
    /// Run indexing work at background thread priority.
    pub const THREAD_BACKGROUND_PRIORITY_FOR_INDEXING: GlobalOptions = GlobalOptions(0x1);
    /// Run editing work (parse, reparse, completion) at background priority.
    pub const THREAD_BACKGROUND_PRIORITY_FOR_EDITING: GlobalOptions = GlobalOptions(0x2);
    /// Both background priority flags.
    pub const THREAD_BACKGROUND_PRIORITY_FOR_ALL: GlobalOptions = GlobalOptions(0x3);

    /// Creates options from a raw bitmask.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the raw bitmask.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns `true` if every flag in `other` is set in `self`.
    pub const fn contains(self, other: GlobalOptions) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for GlobalOptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Debug for GlobalOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GlobalOptions({:#x})", self.0)
    }
}

/// Flags controlling a full parse.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ParseOptions(u32);

impl ParseOptions {
    /// No flags set (one-shot batch compilation).
    pub const NONE: ParseOptions = ParseOptions(0x00);
    /// Keep a detailed preprocessing record (macro expansions, inclusions).
    pub const DETAILED_PREPROCESSING_RECORD: ParseOptions = ParseOptions(0x01);
    /// Tolerate an incomplete translation unit (e.g. a header parsed alone).
    pub const INCOMPLETE: ParseOptions = ParseOptions(0x02);
    /// Build and reuse a precompiled preamble across reparses.
    pub const PRECOMPILED_PREAMBLE: ParseOptions = ParseOptions(0x04);
    /// Cache code-completion results alongside the preamble.
    pub const CACHE_COMPLETION_RESULTS: ParseOptions = ParseOptions(0x08);

    /// Options tuned for interactive editing with frequent reparses.
    pub const fn editing() -> Self {
        Self(Self::PRECOMPILED_PREAMBLE.0 | Self::CACHE_COMPLETION_RESULTS.0)
    }

    /// Creates options from a raw bitmask.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the raw bitmask.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns `true` if every flag in `other` is set in `self`.
    pub const fn contains(self, other: ParseOptions) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for ParseOptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Debug for ParseOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ParseOptions({:#x})", self.0)
    }
}

/// Flags controlling an incremental reparse. No flags are currently defined.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct ReparseOptions(pub u32);
