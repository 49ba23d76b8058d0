//! Guarded Newton-Raphson iteration with a centered-difference derivative.
//!
//! Each step evaluates `f(z)` and estimates
//! `f'(z) = (f(z + h/2) - f(z - h/2)) / h`. The step is accepted when
//! `|f/f'| < atol + rtol * |z|`, so the absolute tolerance dominates near the
//! origin and the relative tolerance far from it. A zero derivative or a
//! non-finite residual stops the iteration immediately; none of these
//! outcomes is an error, they are reported in [`RootResult::termination`].

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sample::ComplexSample;

use super::result::{NewtonHistory, RootResult, Termination};

/// Upper bound on the history slots reserved before the first step
const HISTORY_PREALLOC: usize = 64;

/// Solver settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewtonConfig {
    /// Hard cap on Newton steps (at least 1)
    pub max_iterations: usize,
    pub absolute_tolerance: f64,
    pub relative_tolerance: f64,
    /// Finite difference step `h`
    pub step: f64,
    /// Keep the per-step trajectory in the result
    pub record_history: bool,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            max_iterations: 80,
            absolute_tolerance: 1e-10,
            relative_tolerance: 1e-10,
            step: 1e-6,
            record_history: false,
        }
    }
}

impl NewtonConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_iterations < 1 {
            return Err(ConfigError::InvalidIterations(self.max_iterations));
        }
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(ConfigError::InvalidStep(self.step));
        }
        for (name, value) in [
            ("absolute", self.absolute_tolerance),
            ("relative", self.relative_tolerance),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidTolerance { name, value });
            }
        }
        Ok(())
    }
}

/// Newton-Raphson solver with a validated configuration
#[derive(Debug, Clone)]
pub struct NewtonRaphson {
    config: NewtonConfig,
}

impl NewtonRaphson {
    pub fn new(config: NewtonConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &NewtonConfig {
        &self.config
    }

    /// Centered finite difference of `f` at `z`
    fn derivative<F>(&self, f: &mut F, z: ComplexSample) -> ComplexSample
    where
        F: FnMut(ComplexSample) -> ComplexSample,
    {
        let half = self.config.step / 2.0;
        (f(z + half) - f(z - half)) / self.config.step
    }

    /// Iterate from `guess` until convergence, failure or the iteration cap.
    pub fn solve<F>(&self, mut f: F, guess: ComplexSample) -> RootResult
    where
        F: FnMut(ComplexSample) -> ComplexSample,
    {
        let config = &self.config;
        let mut history = config
            .record_history
            .then(|| NewtonHistory::with_capacity(config.max_iterations.min(HISTORY_PREALLOC)));
        let mut z = guess;

        for i in 0..config.max_iterations {
            let fz = f(z);
            let df = self.derivative(&mut f, z);
            let (mod_f, mod_df) = (fz.norm(), df.norm());

            if let Some(h) = history.as_mut() {
                h.record(z, mod_f, mod_df);
            }

            let step = fz / df;
            let tolerance = config.absolute_tolerance + config.relative_tolerance * z.norm();
            let termination = if step.norm() < tolerance {
                Some(Termination::Converged)
            } else if mod_df == 0.0 {
                Some(Termination::DegenerateDerivative)
            } else if !mod_f.is_finite() {
                Some(Termination::NonFinite)
            } else {
                None
            };

            if let Some(termination) = termination {
                if !termination.is_converged() {
                    tracing::debug!(
                        z = %z,
                        residual = mod_f,
                        iterations = i + 1,
                        "newton stopped: {termination}"
                    );
                }
                return RootResult {
                    root: z,
                    iterations_used: i + 1,
                    residual: mod_f,
                    termination,
                    history,
                };
            }

            z -= step;
        }

        let residual = f(z).norm();
        tracing::debug!(
            z = %z,
            residual,
            iterations = config.max_iterations,
            "newton stopped: {}",
            Termination::Exhausted
        );
        RootResult {
            root: z,
            iterations_used: config.max_iterations,
            residual,
            termination: Termination::Exhausted,
            history,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::c;

    fn recording() -> NewtonRaphson {
        NewtonRaphson::new(NewtonConfig {
            record_history: true,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_quadratic_converges_to_two() {
        let result = recording().solve(|z| z * z - 4.0, c(1.0, 0.0));

        assert_eq!(result.termination, Termination::Converged);
        assert!((result.root - c(2.0, 0.0)).norm() < 1e-8);
        assert!(result.iterations_used < NewtonConfig::default().max_iterations);
        assert_eq!(
            result.history.as_ref().map(NewtonHistory::len),
            Some(result.iterations_used)
        );
    }

    #[test]
    fn test_complex_root() {
        let solver = NewtonRaphson::new(NewtonConfig::default()).unwrap();
        let result = solver.solve(|z| z * z + 1.0, c(0.3, 0.8));

        assert!(result.is_converged());
        assert!((result.root - c(0.0, 1.0)).norm() < 1e-8);
        assert!(result.history.is_none());
    }

    #[test]
    fn test_constant_function_is_degenerate() {
        let result = recording().solve(|_| c(1.0, 0.0), c(0.5, 0.5));

        assert_eq!(result.termination, Termination::DegenerateDerivative);
        assert_eq!(result.iterations_used, 1);
        assert_eq!(result.root, c(0.5, 0.5));
        assert_eq!(result.history.unwrap().len(), 1);
    }

    #[test]
    fn test_non_finite_residual() {
        // Pole at the guess: |f| is not finite while the derivative estimate is
        let result = recording().solve(|z| 1.0 / (z - 1.0) + z, c(1.0, 0.0));
        assert_eq!(result.termination, Termination::NonFinite);
        assert_eq!(result.iterations_used, 1);
    }

    #[test]
    fn test_iteration_cap_is_respected() {
        let solver = NewtonRaphson::new(NewtonConfig {
            max_iterations: 7,
            record_history: true,
            ..Default::default()
        })
        .unwrap();

        // No real root: Newton on z^2 + 1 from a real guess wanders on the real axis
        let mut calls = 0;
        let result = solver.solve(
            |z| {
                calls += 1;
                z * z + 1.0
            },
            c(0.5, 0.0),
        );

        assert_eq!(result.termination, Termination::Exhausted);
        assert_eq!(result.iterations_used, 7);
        assert_eq!(result.history.unwrap().len(), 7);
        // three evaluations per step plus the final residual
        assert_eq!(calls, 7 * 3 + 1);
    }

    #[test]
    fn test_huge_cap_with_history_converges() {
        let solver = NewtonRaphson::new(NewtonConfig {
            max_iterations: usize::MAX / 64,
            record_history: true,
            ..Default::default()
        })
        .unwrap();
        let result = solver.solve(|z| z * z - 4.0, c(1.0, 0.0));

        assert!(result.is_converged());
        assert!((result.root - c(2.0, 0.0)).norm() < 1e-8);
        let history = result.history.unwrap();
        assert_eq!(history.len(), result.iterations_used);
        assert!(history.z.capacity() < 1024);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let zero_iters = NewtonConfig {
            max_iterations: 0,
            ..Default::default()
        };
        assert_eq!(
            NewtonRaphson::new(zero_iters).unwrap_err(),
            ConfigError::InvalidIterations(0)
        );

        let bad_step = NewtonConfig {
            step: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            NewtonRaphson::new(bad_step),
            Err(ConfigError::InvalidStep(_))
        ));

        let bad_tol = NewtonConfig {
            relative_tolerance: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            NewtonRaphson::new(bad_tol),
            Err(ConfigError::InvalidTolerance {
                name: "relative",
                ..
            })
        ));
    }
}
