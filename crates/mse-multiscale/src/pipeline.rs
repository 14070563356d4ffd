// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::coarse::CoarseMethod;
use crate::observability::EvalHooks;
use crate::scales::{ScalePolicy, select_scales};
use crate::variants::{Variant, combine_at_scale};
use mse_core::{MseError, SignalView, stats};
use mse_estimators::{
    ApproximateEntropy, EntropyEstimator, SampleEntropy, TolerancePolicy, resolve_tolerance,
};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Which base estimator quantifies the regularity of each coarse-grained
/// series.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EstimatorKind {
    #[default]
    Sample,
    Approximate,
}

impl EstimatorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sample => "sample",
            Self::Approximate => "approximate",
        }
    }
}

/// Full configuration of one multiscale evaluation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct MultiscaleConfig {
    pub scales: ScalePolicy,
    pub dimension: usize,
    pub tolerance: TolerancePolicy,
    pub estimator: EstimatorKind,
    /// 1-D coarse-graining mode used by the plain variant; the composite
    /// family always evaluates the time-shifted stack.
    pub coarse: CoarseMethod,
    pub variant: Variant,
    pub fuzzy: bool,
}

impl Default for MultiscaleConfig {
    fn default() -> Self {
        Self {
            scales: ScalePolicy::default(),
            dimension: 2,
            tolerance: TolerancePolicy::default(),
            estimator: EstimatorKind::default(),
            coarse: CoarseMethod::default(),
            variant: Variant::default(),
            fuzzy: false,
        }
    }
}

impl MultiscaleConfig {
    pub fn validate(&self) -> Result<(), MseError> {
        if self.dimension == 0 {
            return Err(MseError::invalid_input("dimension must be >= 1; got 0"));
        }
        Ok(())
    }
}

/// The per-scale entropy profile plus the parameters it was computed with.
/// Immutable once assembled; `scales` and `values` are index-aligned.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct EntropyProfile {
    pub dimension: usize,
    pub tolerance: f64,
    pub scales: Vec<usize>,
    pub values: Vec<f64>,
}

/// Scalar index plus the full info record.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct MultiscaleResult {
    pub index: f64,
    pub profile: EntropyProfile,
}

/// Collapses a per-scale profile into the area-under-curve index.
///
/// Non-finite entries are dropped first; integration runs over positions
/// in the filtered sequence, not raw scale factors, and the trapezoidal
/// sum is normalized by the retained count. No retained entries means the
/// index is undefined: NaN, not zero, and not an error.
pub fn entropy_index(values: &[f64]) -> f64 {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return f64::NAN;
    }
    stats::trapezoid(&finite) / finite.len() as f64
}

/// Multiscale entropy of a one-dimensional signal.
///
/// Rejects multichannel input, resolves the tolerance and the scale set
/// once up front, combines every scale under the configured variant, and
/// aggregates the profile into the index. Per-scale degeneracy surfaces as
/// NaN profile entries and never aborts the call.
pub fn multiscale_entropy(
    signal: &SignalView<'_>,
    config: &MultiscaleConfig,
) -> Result<MultiscaleResult, MseError> {
    multiscale_entropy_with_hooks(signal, config, &EvalHooks::default())
}

/// [`multiscale_entropy`] with observability hooks attached.
pub fn multiscale_entropy_with_hooks(
    signal: &SignalView<'_>,
    config: &MultiscaleConfig,
    hooks: &EvalHooks<'_>,
) -> Result<MultiscaleResult, MseError> {
    let samples = signal.require_univariate()?;
    config.validate()?;

    let scales = select_scales(samples.len(), config.dimension, &config.scales)?;
    let tolerance = resolve_tolerance(samples, &config.tolerance)?;

    let values = evaluate_scales(samples, &scales, config, tolerance)?;

    let profile = EntropyProfile {
        dimension: config.dimension,
        tolerance,
        scales,
        values,
    };
    let index = entropy_index(&profile.values);

    if let Some(sink) = hooks.profile {
        sink.on_profile(&profile);
    }

    Ok(MultiscaleResult { index, profile })
}

fn estimator_for(kind: EstimatorKind) -> &'static dyn EntropyEstimator {
    match kind {
        EstimatorKind::Sample => &SampleEntropy,
        EstimatorKind::Approximate => &ApproximateEntropy,
    }
}

/// Evaluates every scale factor. The scales are independent, so the loop
/// fans out across a rayon pool when the feature is enabled; collection
/// preserves scale order either way.
#[cfg(feature = "rayon")]
fn evaluate_scales(
    samples: &[f64],
    scales: &[usize],
    config: &MultiscaleConfig,
    tolerance: f64,
) -> Result<Vec<f64>, MseError> {
    let estimator = estimator_for(config.estimator);
    scales
        .par_iter()
        .map(|&scale| combine_at_scale(samples, scale, config, tolerance, estimator))
        .collect()
}

#[cfg(not(feature = "rayon"))]
fn evaluate_scales(
    samples: &[f64],
    scales: &[usize],
    config: &MultiscaleConfig,
    tolerance: f64,
) -> Result<Vec<f64>, MseError> {
    let estimator = estimator_for(config.estimator);
    scales
        .iter()
        .map(|&scale| combine_at_scale(samples, scale, config, tolerance, estimator))
        .collect()
}
