//! Visualization tools for track recordings.
//!
//! This module renders a 2D (x, y) view of a track's origin channel as a
//! PNG using the plotters library: the path as a line, the samples as dots.

use std::path::Path;

use nalgebra::Vector3;
use plotters::prelude::*;
use plotters_bitmap::BitMapBackend;
use thiserror::Error;

/// Errors that can occur during visualization.
#[derive(Error, Debug)]
pub enum VisualizationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Plotting error: {0}")]
    PlottingError(String),

    #[error("Empty track")]
    EmptyTrack,
}

/// Result type for visualization operations.
pub type Result<T> = std::result::Result<T, VisualizationError>;

/// Default plot width in pixels.
const DEFAULT_WIDTH: u32 = 1920;

/// Default plot height in pixels.
const DEFAULT_HEIGHT: u32 = 1080;

/// Path line color.
const PATH_COLOR: RGBColor = RGBColor(55, 126, 184);

/// Sample dot color.
const SAMPLE_COLOR: RGBColor = RGBColor(228, 26, 28);

/// Plot the (x, y) trajectory of a track and save as PNG.
///
/// # Arguments
///
/// * `output_path` - Path to save the PNG image
/// * `positions` - Per-frame origin positions
/// * `max_points` - Maximum number of samples to draw (subsamples if exceeded)
pub fn plot_track_path(
    output_path: &Path,
    positions: &[Vector3<f64>],
    max_points: usize,
) -> Result<()> {
    if positions.is_empty() {
        return Err(VisualizationError::EmptyTrack);
    }

    let n = positions.len();
    let step = if n > max_points { n / max_points } else { 1 };

    let points: Vec<(f64, f64)> = (0..n)
        .step_by(step)
        .map(|i| (positions[i].x, positions[i].y))
        .collect();

    let (x_min, x_max, y_min, y_max) = compute_bounds(&points);
    let x_padding = (x_max - x_min) * 0.05;
    let y_padding = (y_max - y_min) * 0.05;

    let root =
        BitMapBackend::new(output_path, (DEFAULT_WIDTH, DEFAULT_HEIGHT)).into_drawing_area();

    root.fill(&WHITE)
        .map_err(|e| VisualizationError::PlottingError(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .build_cartesian_2d(
            (x_min - x_padding)..(x_max + x_padding),
            (y_min - y_padding)..(y_max + y_padding),
        )
        .map_err(|e| VisualizationError::PlottingError(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .draw()
        .map_err(|e| VisualizationError::PlottingError(e.to_string()))?;

    // Path line
    chart
        .draw_series(LineSeries::new(points.iter().copied(), &PATH_COLOR))
        .map_err(|e| VisualizationError::PlottingError(e.to_string()))?;

    // Sample dots
    chart
        .draw_series(
            points
                .iter()
                .map(|(x, y)| Circle::new((*x, *y), 3, SAMPLE_COLOR.filled())),
        )
        .map_err(|e| VisualizationError::PlottingError(e.to_string()))?;

    root.present()
        .map_err(|e| VisualizationError::PlottingError(e.to_string()))?;

    Ok(())
}

/// Compute the bounds (min/max) for x and y coordinates.
fn compute_bounds(points: &[(f64, f64)]) -> (f64, f64, f64, f64) {
    let mut x_min = f64::MAX;
    let mut x_max = f64::MIN;
    let mut y_min = f64::MAX;
    let mut y_max = f64::MIN;

    for (x, y) in points {
        if *x < x_min {
            x_min = *x;
        }
        if *x > x_max {
            x_max = *x;
        }
        if *y < y_min {
            y_min = *y;
        }
        if *y > y_max {
            y_max = *y;
        }
    }

    if (x_max - x_min).abs() < f64::EPSILON {
        x_min -= 1.0;
        x_max += 1.0;
    }
    if (y_max - y_min).abs() < f64::EPSILON {
        y_min -= 1.0;
        y_max += 1.0;
    }

    (x_min, x_max, y_min, y_max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_plot_empty_track_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("track.png");

        let result = plot_track_path(&path, &[], 1000);
        assert!(matches!(result, Err(VisualizationError::EmptyTrack)));
    }

    #[test]
    fn test_plot_track_writes_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("track.png");

        let positions: Vec<Vector3<f64>> = (0..32)
            .map(|i| Vector3::new(i as f64, (i as f64 * 0.3).sin(), 0.0))
            .collect();

        plot_track_path(&path, &positions, 1000).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_compute_bounds_degenerate() {
        let points = vec![(2.0, 3.0), (2.0, 3.0)];
        let (x_min, x_max, y_min, y_max) = compute_bounds(&points);

        assert!(x_max > x_min);
        assert!(y_max > y_min);
    }
}
