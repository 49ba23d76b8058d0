//! Sweep axes.

use std::cell::Cell;
use std::fmt;

use crate::error::ConfigError;
use crate::sample::{self, ComplexSample, SampleDisplay};

use super::Parameter;

/// A named axis of a sweep.
///
/// Holds the ordered sample points and a `current` slot that the sweep engine
/// overwrites before every leaf evaluation. Evaluation closures keep a shared
/// reference (or an `Rc`) to the variable and read `current()` from it.
#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
    pub units: String,
    points: Vec<ComplexSample>,
    current: Cell<ComplexSample>,
}

impl Variable {
    /// Create a variable over explicit sample points. `points` must be non-empty.
    pub fn new(
        name: impl Into<String>,
        units: impl Into<String>,
        points: Vec<ComplexSample>,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        let Some(&first) = points.first() else {
            return Err(ConfigError::EmptyVariable(name));
        };
        Ok(Self {
            name,
            units: units.into(),
            points,
            current: Cell::new(first),
        })
    }

    /// Variable over `n` linearly spaced points on the real axis
    /// between `start` and `end`
    pub fn linspace(
        name: impl Into<String>,
        units: impl Into<String>,
        start: ComplexSample,
        end: ComplexSample,
        n: usize,
    ) -> Result<Self, ConfigError> {
        Self::new(name, units, sample::linspace(start, end, n, 1)?)
    }

    /// Variable over `n` logarithmically spaced points on the real axis
    pub fn logspace(
        name: impl Into<String>,
        units: impl Into<String>,
        start: ComplexSample,
        end: ComplexSample,
        n: usize,
    ) -> Result<Self, ConfigError> {
        Self::new(name, units, sample::logspace(start, end, n, 1)?)
    }

    #[must_use]
    pub fn points(&self) -> &[ComplexSample] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the variable has no points
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Value at the sweep position currently being evaluated
    #[must_use]
    pub fn current(&self) -> ComplexSample {
        self.current.get()
    }

    /// Move the current value to `points[index]`.
    pub(crate) fn select(&self, index: usize) {
        self.current.set(self.points[index]);
    }

    /// Snapshot of the current value as a labelled parameter
    #[must_use]
    pub fn as_parameter(&self) -> Parameter {
        Parameter::new(self.name.clone(), self.units.clone(), self.current())
    }
}

impl AsRef<Variable> for Variable {
    fn as_ref(&self) -> &Variable {
        self
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `points` is never empty, see `Variable::new`
        let first = self.points[0];
        let last = self.points[self.points.len() - 1];
        write!(
            f,
            "{} [{}->{}]",
            self.as_parameter(),
            SampleDisplay(first),
            SampleDisplay(last)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::c;

    #[test]
    fn test_empty_points_rejected() {
        let err = Variable::new("x", "m", vec![]).unwrap_err();
        assert_eq!(err, ConfigError::EmptyVariable("x".to_string()));
    }

    #[test]
    fn test_current_starts_at_first_point() {
        let v = Variable::linspace("x", "m", c(1.0, 0.0), c(2.0, 0.0), 3).unwrap();
        assert_eq!(v.len(), 3);
        assert!(!v.is_empty());
        assert_eq!(v.current(), c(1.0, 0.0));

        v.select(2);
        assert_eq!(v.current(), c(2.0, 0.0));
    }

    #[test]
    fn test_variable_display_shows_range() {
        let v = Variable::linspace("freq", "Hz", c(10.0, 0.0), c(20.0, 0.0), 11).unwrap();
        assert_eq!(v.to_string(), "freq: 10 (Hz) [10->20]");
    }
}
