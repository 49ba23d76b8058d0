//! Retrying failed solves from perturbed starting points.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sample::{ComplexSample, c};

use super::newton::NewtonRaphson;
use super::result::RootResult;

/// How many times to try and how far to move the guess between tries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestartPolicy {
    /// Total number of solves, the unperturbed one included
    pub attempts: usize,
    /// Each retry starts at `guess + (dx, dy)` with `dx, dy` uniform in `[-radius, radius]`
    pub radius: f64,
    pub seed: u64,
}

impl Default for RestartPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            radius: 0.5,
            seed: 42,
        }
    }
}

impl RestartPolicy {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.attempts == 0 || !(self.radius.is_finite() && self.radius >= 0.0) {
            return Err(ConfigError::InvalidRestart {
                attempts: self.attempts,
                radius: self.radius,
            });
        }
        Ok(())
    }
}

/// Result of the last solve together with the guess that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestartOutcome {
    pub result: RootResult,
    pub guess: ComplexSample,
    /// Number of solves performed (1 when the first one converged)
    pub attempts_used: usize,
}

/// A solver paired with a validated [`RestartPolicy`]
#[derive(Debug, Clone)]
pub struct Restarter<'a> {
    solver: &'a NewtonRaphson,
    policy: RestartPolicy,
}

impl<'a> Restarter<'a> {
    pub fn new(solver: &'a NewtonRaphson, policy: RestartPolicy) -> Result<Self, ConfigError> {
        policy.validate()?;
        Ok(Self { solver, policy })
    }

    #[must_use]
    pub fn policy(&self) -> &RestartPolicy {
        &self.policy
    }

    /// Solve from `guess`, retrying from random perturbations until a solve
    /// converges or the attempts run out.
    ///
    /// The perturbations come from a `SmallRng` seeded with the policy seed,
    /// so every call visits the same starting points.
    pub fn solve<F>(&self, mut f: F, guess: ComplexSample) -> RestartOutcome
    where
        F: FnMut(ComplexSample) -> ComplexSample,
    {
        let policy = &self.policy;
        let mut rng = SmallRng::seed_from_u64(policy.seed);
        let mut start = guess;
        let mut result = self.solver.solve(&mut f, start);
        let mut attempts_used = 1;

        while !result.is_converged() && attempts_used < policy.attempts {
            let offset = c(
                rng.random_range(-policy.radius..=policy.radius),
                rng.random_range(-policy.radius..=policy.radius),
            );
            start = guess + offset;
            tracing::debug!(
                attempt = attempts_used + 1,
                guess = %start,
                previous = %result.termination,
                "retrying newton from perturbed guess"
            );
            result = self.solver.solve(&mut f, start);
            attempts_used += 1;
        }

        RestartOutcome {
            result,
            guess: start,
            attempts_used,
        }
    }
}

/// One-shot form of [`Restarter::solve`]; fails only on an invalid policy.
pub fn solve_with_restarts<F>(
    solver: &NewtonRaphson,
    f: F,
    guess: ComplexSample,
    policy: &RestartPolicy,
) -> Result<RestartOutcome, ConfigError>
where
    F: FnMut(ComplexSample) -> ComplexSample,
{
    Ok(Restarter::new(solver, policy.clone())?.solve(f, guess))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roots::{NewtonConfig, Termination};

    #[test]
    fn test_first_attempt_converges() {
        let solver = NewtonRaphson::new(NewtonConfig::default()).unwrap();
        let outcome =
            solve_with_restarts(&solver, |z| z * z - 4.0, c(1.0, 0.0), &RestartPolicy::default())
                .unwrap();

        assert_eq!(outcome.attempts_used, 1);
        assert_eq!(outcome.guess, c(1.0, 0.0));
        assert!(outcome.result.is_converged());
    }

    #[test]
    fn test_restart_escapes_degenerate_start() {
        // f'(0) = 0 for z^2 - 1, so the unperturbed solve cannot take a step
        let solver = NewtonRaphson::new(NewtonConfig::default()).unwrap();
        let first = solver.solve(|z| z * z - 1.0, c(0.0, 0.0));
        assert_eq!(first.termination, Termination::DegenerateDerivative);

        let outcome =
            solve_with_restarts(&solver, |z| z * z - 1.0, c(0.0, 0.0), &RestartPolicy::default())
                .unwrap();
        assert!(outcome.result.is_converged());
        assert!(outcome.attempts_used >= 2);
        assert!((outcome.result.root.norm() - 1.0).abs() < 1e-8);
    }

    #[test]
    fn test_restarts_are_deterministic() {
        let solver = NewtonRaphson::new(NewtonConfig {
            max_iterations: 3,
            ..Default::default()
        })
        .unwrap();
        let policy = RestartPolicy {
            attempts: 4,
            radius: 1.0,
            seed: 7,
        };

        let a = solve_with_restarts(&solver, |_| c(1.0, 0.0), c(0.0, 0.0), &policy).unwrap();
        let b = solve_with_restarts(&solver, |_| c(1.0, 0.0), c(0.0, 0.0), &policy).unwrap();

        assert_eq!(a.attempts_used, 4);
        assert_eq!(a, b);
    }

    #[test]
    fn test_restarter_reuses_one_policy() {
        let solver = NewtonRaphson::new(NewtonConfig::default()).unwrap();
        let restarter = Restarter::new(&solver, RestartPolicy::default()).unwrap();

        for a in [1.0, 4.0, 9.0] {
            let outcome = restarter.solve(|z| z * z - a, c(0.0, 0.0));
            assert!(outcome.result.is_converged());
            assert!((outcome.result.root.norm() - a.sqrt()).abs() < 1e-8);
        }

        let bad = RestartPolicy {
            radius: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            Restarter::new(&solver, bad),
            Err(ConfigError::InvalidRestart { .. })
        ));
    }

    #[test]
    fn test_invalid_policy() {
        let solver = NewtonRaphson::new(NewtonConfig::default()).unwrap();
        let policy = RestartPolicy {
            attempts: 0,
            ..Default::default()
        };
        assert!(solve_with_restarts(&solver, |z| z, c(1.0, 0.0), &policy).is_err());
    }
}
