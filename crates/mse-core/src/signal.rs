// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::MseError;

/// Borrowed, shape-validated view over a row-major `n x d` series buffer.
///
/// The multiscale pipeline only operates on univariate signals; the view
/// still carries a channel count so that loaders can hand over whatever
/// shape they read and the rejection of multichannel data happens in one
/// place, with one error message.
#[derive(Clone, Copy, Debug)]
pub struct SignalView<'a> {
    pub values: &'a [f64],
    pub n: usize,
    pub d: usize,
}

impl<'a> SignalView<'a> {
    /// Constructs a validated view.
    pub fn new(values: &'a [f64], n: usize, d: usize) -> Result<Self, MseError> {
        if n == 0 {
            return Err(MseError::invalid_input("n must be >= 1"));
        }
        if d == 0 {
            return Err(MseError::invalid_input("d must be >= 1"));
        }

        let expected_len = n
            .checked_mul(d)
            .ok_or_else(|| MseError::invalid_input("n*d overflow while validating shape"))?;
        if values.len() != expected_len {
            return Err(MseError::invalid_input(format!(
                "value length mismatch: got {}, expected {expected_len} (n={n}, d={d})",
                values.len()
            )));
        }

        Ok(Self { values, n, d })
    }

    /// Convenience constructor for single-channel data.
    pub fn univariate(values: &'a [f64]) -> Result<Self, MseError> {
        Self::new(values, values.len(), 1)
    }

    /// Returns true when `d == 1`.
    pub fn is_univariate(&self) -> bool {
        self.d == 1
    }

    /// Returns the sample slice of a univariate view, or the hard
    /// multichannel rejection the pipeline contract demands.
    pub fn require_univariate(&self) -> Result<&'a [f64], MseError> {
        if !self.is_univariate() {
            return Err(MseError::invalid_input(format!(
                "multichannel input is not supported: got d={} channels, expected d=1",
                self.d
            )));
        }
        Ok(self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::SignalView;

    #[test]
    fn univariate_constructor_accepts_plain_series() {
        let data = [1.0, 2.0, 3.0, 4.0];
        let view = SignalView::univariate(&data).expect("view should be valid");
        assert_eq!(view.n, 4);
        assert_eq!(view.d, 1);
        assert!(view.is_univariate());
        assert_eq!(view.require_univariate().expect("univariate"), &data);
    }

    #[test]
    fn rejects_zero_n_and_zero_d() {
        let data = [1.0];
        let err = SignalView::new(&data, 0, 1).expect_err("n=0 must fail");
        assert!(err.to_string().contains("n must be >= 1"));

        let err = SignalView::new(&data, 1, 0).expect_err("d=0 must fail");
        assert!(err.to_string().contains("d must be >= 1"));
    }

    #[test]
    fn rejects_length_mismatch_and_shape_overflow() {
        let data = [1.0, 2.0, 3.0];
        let err = SignalView::new(&data, 2, 2).expect_err("mismatch must fail");
        assert!(err.to_string().contains("value length mismatch"));

        let empty: [f64; 0] = [];
        let err = SignalView::new(&empty, usize::MAX, 2).expect_err("overflow must fail");
        assert!(err.to_string().contains("n*d overflow"));
    }

    #[test]
    fn require_univariate_rejects_matrix_input() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let view = SignalView::new(&data, 3, 2).expect("2-channel view should construct");
        assert!(!view.is_univariate());
        let err = view
            .require_univariate()
            .expect_err("matrix input must be rejected");
        assert!(err.to_string().contains("multichannel"));
    }
}
