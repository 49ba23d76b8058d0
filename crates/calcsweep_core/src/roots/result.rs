//! Root finder result types

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sample::ComplexSample;

/// Why a solve stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// The Newton step fell below the combined absolute/relative tolerance
    Converged,

    /// The derivative estimate was exactly zero, so no step could be taken
    DegenerateDerivative,

    /// `|f(z)|` was infinite or NaN
    NonFinite,

    /// The iteration cap was reached without converging
    Exhausted,
}

impl Termination {
    #[must_use]
    pub fn is_converged(self) -> bool {
        self == Termination::Converged
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Termination::Converged => "converged",
            Termination::DegenerateDerivative => "derivative vanished",
            Termination::NonFinite => "non-finite residual",
            Termination::Exhausted => "iteration limit reached",
        };
        f.write_str(label)
    }
}

/// Per-iteration trajectory of a solve, recorded before each stopping check
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewtonHistory {
    /// Iterate at the start of each step
    pub z: Vec<ComplexSample>,
    /// `|f(z)|` at each iterate
    pub mod_f: Vec<f64>,
    /// `|f'(z)|` estimate at each iterate
    pub mod_df: Vec<f64>,
}

impl NewtonHistory {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            z: Vec::with_capacity(capacity),
            mod_f: Vec::with_capacity(capacity),
            mod_df: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn record(&mut self, z: ComplexSample, mod_f: f64, mod_df: f64) {
        self.z.push(z);
        self.mod_f.push(mod_f);
        self.mod_df.push(mod_df);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.z.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.z.is_empty()
    }
}

/// Outcome of a single solve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootResult {
    /// Final iterate
    pub root: ComplexSample,

    /// Number of steps taken, counting the terminating one
    pub iterations_used: usize,

    /// `|f(root)|`
    pub residual: f64,

    pub termination: Termination,

    /// Trajectory, when recording was enabled
    pub history: Option<NewtonHistory>,
}

impl RootResult {
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.termination.is_converged()
    }
}
