// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

//! Core shared types for the mse workspace: the error taxonomy, the
//! validated signal view, and the small numeric utilities every other
//! crate builds on.

mod error;
mod signal;
pub mod stats;

pub use error::MseError;
pub use signal::SignalView;
