// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::pipeline::EntropyProfile;

/// Side-effect-only consumer of the finished per-scale profile.
///
/// Rendering, logging, or export hooks implement this; the numerical
/// pipeline never reads anything back, so it stays a pure function of its
/// inputs for testing purposes.
pub trait ProfileSink {
    fn on_profile(&self, profile: &EntropyProfile);
}

/// Optional hooks threaded through an evaluation.
#[derive(Clone, Copy, Default)]
pub struct EvalHooks<'a> {
    pub profile: Option<&'a dyn ProfileSink>,
}

impl<'a> EvalHooks<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the profile sink.
    pub fn with_profile_sink(mut self, sink: &'a dyn ProfileSink) -> Self {
        self.profile = Some(sink);
        self
    }
}
