// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

//! SVG rendering of entropy-vs-scale profiles.
//!
//! Plotting is a side effect behind the [`ProfileSink`] hook: render
//! failures are reported on stderr and never disturb the numerical result.

use mse_multiscale::{EntropyProfile, ProfileSink};
use plotters::prelude::*;
use std::path::{Path, PathBuf};

const PLOT_SIZE: (u32, u32) = (900, 540);

/// Profile sink that renders the finite profile points to an SVG file.
pub struct SvgProfilePlot {
    path: PathBuf,
}

impl SvgProfilePlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ProfileSink for SvgProfilePlot {
    fn on_profile(&self, profile: &EntropyProfile) {
        if let Err(err) = render_profile(&self.path, profile) {
            eprintln!(
                "warning: failed to render profile plot to '{}': {err}",
                self.path.display()
            );
        }
    }
}

/// Draws entropy values across scale factors, skipping non-finite entries.
pub fn render_profile(
    path: &Path,
    profile: &EntropyProfile,
) -> Result<(), Box<dyn std::error::Error>> {
    let points: Vec<(f64, f64)> = profile
        .scales
        .iter()
        .zip(&profile.values)
        .filter(|(_, value)| value.is_finite())
        .map(|(&scale, &value)| (scale as f64, value))
        .collect();

    if points.is_empty() {
        return Err("no finite profile values to plot".into());
    }

    let x_max = points.iter().map(|p| p.0).fold(1.0f64, f64::max);
    let y_min = points.iter().map(|p| p.1).fold(0.0f64, f64::min);
    let y_max = points.iter().map(|p| p.1).fold(1e-3f64, f64::max);

    let root = SVGBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Entropy values across scale factors", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..(x_max * 1.05), (y_min * 1.05)..(y_max * 1.1))?;

    chart
        .configure_mesh()
        .x_desc("Scale")
        .y_desc("Entropy values")
        .x_labels(10)
        .draw()?;

    chart.draw_series(LineSeries::new(points.iter().copied(), &RED))?;
    chart.draw_series(points.iter().map(|&(x, y)| Circle::new((x, y), 3, RED.filled())))?;

    root.present()?;
    Ok(())
}
