//! Numerical experiment engine
//!
//! This crate sweeps labelled complex-valued variables over grids of sample
//! points and finds roots of complex functions. It supports:
//! - Linear and logarithmic complex sample generation
//! - N-dimensional Cartesian-product sweeps with ordered row accumulation
//! - Streaming export of rows to delimited text files
//! - Guarded Newton-Raphson root finding with trajectory diagnostics
//! - Header/placeholder substitution for plot scripts
//!
//! # Example
//!
//! ```ignore
//! use calcsweep_core::{Calculation, RunConfig, Variable, sample::c};
//!
//! let mut calc = Calculation::new("resonance", RunConfig::default());
//! let freq = calc.add_variable(Variable::linspace("f", "Hz", c(1.0, 0.0), c(10.0, 0.0), 10)?);
//! calc.set_headers(["f", "response"]);
//!
//! calc.work(|| {
//!     let f = freq.current();
//!     vec![f.re, (1.0 / (f * f + 1.0)).norm()]
//! });
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod calculation;
pub mod config;
pub mod error;
pub mod export;
pub mod plot;
pub mod roots;
pub mod sample;
pub mod sweep;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use calculation::Calculation;
pub use config::RunConfig;
pub use error::{ConfigError, ExportError};
pub use model::{Parameter, RowResult, Variable};
pub use roots::{
    DiagnosticsBuilder, NewtonConfig, NewtonRaphson, RestartPolicy, RootResult, Termination,
};
pub use sample::ComplexSample;
pub use sweep::{Evaluate, RowSink, SweepEngine};
