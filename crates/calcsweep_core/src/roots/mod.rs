//! Root finding for complex functions of one complex variable.
//!
//! # Example
//!
//! ```ignore
//! use calcsweep_core::roots::{DiagnosticsBuilder, NewtonConfig, NewtonRaphson};
//! use calcsweep_core::sample::c;
//!
//! let solver = NewtonRaphson::new(NewtonConfig {
//!     record_history: true,
//!     ..Default::default()
//! })?;
//!
//! let result = solver.solve(|z| z * z - 4.0, c(1.0, 0.0));
//! assert!(result.is_converged());
//!
//! // Bounding box and |f| heat map around the trajectory
//! let diagnostics = DiagnosticsBuilder::new(&result)?;
//! let grid = diagnostics.magnitude_grid(|z| z * z - 4.0);
//! ```

mod diagnostics;
mod newton;
mod restart;
mod result;

pub use diagnostics::{
    Diagnostics, DiagnosticsBuilder, GRID_SAMPLES, MagnitudeGrid, MagnitudeSample,
    TrajectoryBounds,
};
pub use newton::{NewtonConfig, NewtonRaphson};
pub use restart::{RestartOutcome, RestartPolicy, Restarter, solve_with_restarts};
pub use result::{NewtonHistory, RootResult, Termination};
