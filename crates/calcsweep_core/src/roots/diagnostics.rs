//! Trajectory diagnostics for a recorded Newton solve.
//!
//! [`DiagnosticsBuilder`] turns a [`RootResult`] with history into the data a
//! heat-map of `|f|` needs: the bounding box of the iterates and a grid of
//! magnitudes sampled over that box.

use serde::Serialize;

use crate::error::ConfigError;
use crate::sample::{self, ComplexSample, c};

use super::result::{NewtonHistory, RootResult};

/// Samples per axis of the magnitude grid (inclusive edges, span / 10 apart)
pub const GRID_SAMPLES: usize = 11;

/// Axis-aligned box around every finite iterate
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrajectoryBounds {
    pub min_re: f64,
    pub max_re: f64,
    pub min_im: f64,
    pub max_im: f64,
}

impl TrajectoryBounds {
    fn from_points(points: &[ComplexSample]) -> Option<Self> {
        let mut finite = points.iter().filter(|z| z.is_finite());
        let first = finite.next()?;
        let init = Self {
            min_re: first.re,
            max_re: first.re,
            min_im: first.im,
            max_im: first.im,
        };
        Some(finite.fold(init, |b, z| Self {
            min_re: b.min_re.min(z.re),
            max_re: b.max_re.max(z.re),
            min_im: b.min_im.min(z.im),
            max_im: b.max_im.max(z.im),
        }))
    }

    #[must_use]
    pub fn real_span(&self) -> f64 {
        self.max_re - self.min_re
    }

    #[must_use]
    pub fn imag_span(&self) -> f64 {
        self.max_im - self.min_im
    }

    #[must_use]
    pub fn contains(&self, z: ComplexSample) -> bool {
        (self.min_re..=self.max_re).contains(&z.re) && (self.min_im..=self.max_im).contains(&z.im)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MagnitudeSample {
    pub z: ComplexSample,
    pub magnitude: f64,
}

/// `|f|` sampled over a [`TrajectoryBounds`] box, real-major
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MagnitudeGrid {
    pub bounds: TrajectoryBounds,
    pub n_real: usize,
    pub n_imag: usize,
    pub samples: Vec<MagnitudeSample>,
}

impl MagnitudeGrid {
    /// `[re, im, |f|]` per sample, ready for a delimited export
    #[must_use]
    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.samples
            .iter()
            .map(|s| vec![s.z.re, s.z.im, s.magnitude])
            .collect()
    }
}

/// Everything needed to plot a solve, serialized as one JSON document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostics<'a> {
    pub result: &'a RootResult,
    pub bounds: TrajectoryBounds,
    pub grid: MagnitudeGrid,
}

#[derive(Debug, Clone)]
pub struct DiagnosticsBuilder<'a> {
    result: &'a RootResult,
    history: &'a NewtonHistory,
    bounds: TrajectoryBounds,
}

impl<'a> DiagnosticsBuilder<'a> {
    /// Fails when the solve was run without `record_history`, or when no
    /// recorded iterate is finite.
    pub fn new(result: &'a RootResult) -> Result<Self, ConfigError> {
        let history = result
            .history
            .as_ref()
            .filter(|h| !h.is_empty())
            .ok_or(ConfigError::MissingHistory)?;
        let bounds =
            TrajectoryBounds::from_points(&history.z).ok_or(ConfigError::NoFiniteIterates)?;

        Ok(Self {
            result,
            history,
            bounds,
        })
    }

    #[must_use]
    pub fn history(&self) -> &NewtonHistory {
        self.history
    }

    #[must_use]
    pub fn bounds(&self) -> TrajectoryBounds {
        self.bounds
    }

    /// Sample `|f|` over the trajectory box.
    ///
    /// An axis whose span is zero collapses to a single sample, so a
    /// trajectory that never leaves the real line yields an 11×1 grid.
    pub fn magnitude_grid<F>(&self, mut f: F) -> MagnitudeGrid
    where
        F: FnMut(ComplexSample) -> ComplexSample,
    {
        let b = self.bounds;
        let samples_along = |span: f64| if span > 0.0 { GRID_SAMPLES } else { 1 };
        let n_real = samples_along(b.real_span());
        let n_imag = samples_along(b.imag_span());

        let samples = sample::linear_grid(
            c(b.min_re, b.min_im),
            c(b.max_re, b.max_im),
            n_real,
            n_imag,
        )
        .into_iter()
        .map(|z| MagnitudeSample {
            z,
            magnitude: f(z).norm(),
        })
        .collect();

        MagnitudeGrid {
            bounds: b,
            n_real,
            n_imag,
            samples,
        }
    }

    /// Bounds, grid and the result itself in one serializable value
    pub fn build<F>(&self, f: F) -> Diagnostics<'a>
    where
        F: FnMut(ComplexSample) -> ComplexSample,
    {
        Diagnostics {
            result: self.result,
            bounds: self.bounds,
            grid: self.magnitude_grid(f),
        }
    }
}
