//! Grid generation: the lattice of sample points the field is evaluated on.
//!
//! A grid is derived from a viewport size and a spacing. The lattice is
//! centered on the origin and symmetric on both axes, so resizing grows or
//! shrinks it evenly around the middle of the screen instead of anchoring it
//! to a corner. Grids are never patched: any change to spacing or viewport
//! builds a new one.

use glam::DVec2;
use log::{debug, warn};

use crate::error::WaveError;

/// Upper bound on lattice size. Larger lattices are coarsened to fit.
///
/// Covers a 1920x1080 viewport at the smallest allowed spacing and a
/// 3840x2160 viewport at spacing 1.
pub const MAX_GRID_POINTS: usize = 1 << 24;

/// One lattice coordinate on the z = 0 plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    pub x: f64,
    pub y: f64,
}

impl SamplePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn to_dvec2(self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }
}

/// An immutable, origin-centered lattice of sample points.
///
/// `rows = floor(width / step)` and `cols = floor(height / step)`, where
/// `step` is the requested spacing unless that would exceed
/// [`MAX_GRID_POINTS`]. Each axis holds `2 * floor(n / 2) + 1` points at
/// integer multiples of `step`, origin included. Points are enumerated x-major: every y for the
/// first x, then every y for the next x.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    spacing: f64,
    step: f64,
    rows: usize,
    cols: usize,
    points: Vec<SamplePoint>,
}

impl Grid {
    /// Builds the lattice for a `width` x `height` viewport.
    ///
    /// Degenerate input (non-positive or non-finite spacing or dimensions) is
    /// logged and yields an empty grid.
    pub fn generate(width: f64, height: f64, spacing: f64) -> Grid {
        match Self::try_generate(width, height, spacing) {
            Ok(grid) => grid,
            Err(err) => {
                warn!("{err}; using an empty grid");
                Grid::empty(spacing)
            }
        }
    }

    /// Fallible form of [`generate`](Self::generate).
    pub fn try_generate(width: f64, height: f64, spacing: f64) -> Result<Grid, WaveError> {
        Self::build(width, height, spacing, MAX_GRID_POINTS)
    }

    fn build(width: f64, height: f64, spacing: f64, max_points: usize) -> Result<Grid, WaveError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(spacing) || !positive(width) || !positive(height) {
            return Err(WaveError::DegenerateGrid {
                width,
                height,
                spacing,
            });
        }

        let step = fitting_step(width, height, spacing, max_points.max(1));
        if step != spacing {
            warn!(
                "{width}x{height} at spacing {spacing} exceeds {max_points} points; \
                 coarsened to {step}"
            );
        }

        let rows = (width / step).floor() as usize;
        let cols = (height / step).floor() as usize;
        let half_x = (rows / 2) as i64;
        let half_y = (cols / 2) as i64;

        let mut points = Vec::with_capacity(axis_len(rows) * axis_len(cols));
        for i in -half_x..=half_x {
            let x = i as f64 * step;
            for j in -half_y..=half_y {
                points.push(SamplePoint::new(x, j as f64 * step));
            }
        }

        debug!(
            "generated {}x{} grid ({} points) at step {step}",
            rows,
            cols,
            points.len()
        );
        Ok(Grid {
            spacing,
            step,
            rows,
            cols,
            points,
        })
    }

    /// A grid with no points.
    pub fn empty(spacing: f64) -> Grid {
        Grid {
            spacing,
            step: spacing,
            rows: 0,
            cols: 0,
            points: Vec::new(),
        }
    }

    /// Requested spacing.
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Distance between neighboring points. Equals [`spacing`](Self::spacing)
    /// unless the lattice had to be coarsened.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// `floor(width / step)` at generation time.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// `floor(height / step)` at generation time.
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn points(&self) -> &[SamplePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Flat xyz position buffer (z = 0) for upload.
    pub fn positions(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.points.len() * 3);
        self.write_positions(&mut out);
        out
    }

    /// Overwrites `out` with the xyz position buffer, reusing its allocation.
    pub fn write_positions(&self, out: &mut Vec<f32>) {
        out.clear();
        out.extend(
            self.points
                .iter()
                .flat_map(|p| [p.x as f32, p.y as f32, 0.0]),
        );
    }
}

/// Points along one axis for a row or column count.
#[inline]
fn axis_len(n: usize) -> usize {
    2 * (n / 2) + 1
}

/// Lattice size for a viewport at `step`, as a float so huge counts cannot
/// overflow.
fn lattice_len(width: f64, height: f64, step: f64) -> f64 {
    let span = |extent: f64| 2.0 * ((extent / step).floor() / 2.0).floor() + 1.0;
    span(width) * span(height)
}

/// Smallest step `>= spacing` whose lattice holds at most `max_points`.
fn fitting_step(width: f64, height: f64, spacing: f64, max_points: usize) -> f64 {
    let limit = max_points as f64;
    let mut step = spacing;
    loop {
        let len = lattice_len(width, height, step);
        if len <= limit {
            return step;
        }
        if !len.is_finite() {
            // A step as wide as the viewport always leaves a single point.
            step = step.max(width.max(height));
            continue;
        }
        step *= (len / limit).sqrt().max(1.01);
    }
}
