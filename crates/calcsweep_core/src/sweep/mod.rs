//! Cartesian-product sweeps over labelled variables.
//!
//! A sweep treats an ordered list of [`Variable`](crate::Variable)s as an
//! N-dimensional index space and evaluates a callback once per combination of
//! sample points. Enumeration is row-major: the first variable is the
//! outermost loop and the last variable the innermost.
//!
//! ```ignore
//! use calcsweep_core::{RunConfig, SweepEngine, Variable, sample::c};
//!
//! let x = Variable::linspace("x", "m", c(0.0, 0.0), c(1.0, 0.0), 5)?;
//! let y = Variable::linspace("y", "m", c(0.0, 0.0), c(2.0, 0.0), 3)?;
//!
//! let engine = SweepEngine::new("grid", &RunConfig::default());
//! let rows = engine.run(&[&x, &y], || vec![x.current().re, y.current().re], None);
//! assert_eq!(rows.len(), 15);
//! ```

mod engine;
mod grid;

pub use engine::{Evaluate, RowSink, SweepEngine};
pub use grid::{GridIndices, flat_index};
