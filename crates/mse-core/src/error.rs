// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use std::fmt;

/// Error taxonomy shared across the workspace.
///
/// Structural problems (bad shapes, empty scale selections, nonsensical
/// configuration) fail the whole call with a variant of this enum.
/// Numerical degeneracy never does: per-scale and per-row degeneracy is
/// represented as NaN sentinels in the results instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MseError {
    /// The input or configuration is structurally invalid.
    InvalidInput(String),
    /// A computation produced a value that cannot be worked with.
    NumericalIssue(String),
    /// The request is recognized but not supported.
    NotSupported(String),
}

impl MseError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn numerical_issue(msg: impl Into<String>) -> Self {
        Self::NumericalIssue(msg.into())
    }

    pub fn not_supported(msg: impl Into<String>) -> Self {
        Self::NotSupported(msg.into())
    }

    /// Stable machine-readable code, used by CLI error envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::NumericalIssue(_) => "numerical_issue",
            Self::NotSupported(_) => "not_supported",
        }
    }
}

impl fmt::Display for MseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "{msg}"),
            Self::NumericalIssue(msg) => write!(f, "{msg}"),
            Self::NotSupported(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for MseError {}
