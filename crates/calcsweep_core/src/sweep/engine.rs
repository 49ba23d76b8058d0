//! Sweep engine: ordered leaf evaluation with optional row streaming.

use std::io;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::RunConfig;
use crate::model::{RowResult, Variable};
use crate::sample::ComplexSample;

use super::grid::GridIndices;

/// Source of one result row per leaf of a sweep.
///
/// The evaluator takes no arguments: it reads the sweep position through the
/// variables it holds on to. Any `FnMut() -> RowResult` closure qualifies.
pub trait Evaluate {
    fn evaluate(&mut self) -> RowResult;
}

impl<F> Evaluate for F
where
    F: FnMut() -> RowResult,
{
    fn evaluate(&mut self) -> RowResult {
        self()
    }
}

/// Destination that receives rows while the sweep is still running.
pub trait RowSink {
    fn write_row(&mut self, row: &[f64]) -> io::Result<()>;
}

/// Drives the Cartesian-product enumeration for one labelled run.
#[derive(Debug, Clone)]
pub struct SweepEngine {
    label: String,
    disabled: bool,
}

impl SweepEngine {
    pub fn new(label: impl Into<String>, config: &RunConfig) -> Self {
        Self {
            label: label.into(),
            disabled: config.disabled,
        }
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Number of leaves a sweep over `variables` evaluates.
    #[must_use]
    pub fn total_points<V: AsRef<Variable>>(variables: &[V]) -> usize {
        variables.iter().map(|v| v.as_ref().len()).product()
    }

    /// Evaluate every combination of the variables' points.
    ///
    /// Before each leaf every variable's current value is moved to its point
    /// for that combination, then `evaluator` is called once. Rows come back
    /// in enumeration order and are also written to `sink` as they are
    /// produced. A sink error is logged and ends streaming for the rest of
    /// the run; rows are still collected.
    ///
    /// When the engine is disabled nothing is evaluated and no rows are
    /// returned.
    pub fn run<V, E>(
        &self,
        variables: &[V],
        mut evaluator: E,
        mut sink: Option<&mut dyn RowSink>,
    ) -> Vec<RowResult>
    where
        V: AsRef<Variable>,
        E: Evaluate,
    {
        if self.disabled {
            tracing::info!(calc = %self.label, "skip work");
            return Vec::new();
        }

        let shape: Vec<usize> = variables.iter().map(|v| v.as_ref().len()).collect();
        let indices = GridIndices::new(shape);
        tracing::info!(calc = %self.label, points = indices.total(), "begin work");

        let mut rows = Vec::with_capacity(indices.total());
        for position in indices {
            for (variable, &index) in variables.iter().zip(&position) {
                variable.as_ref().select(index);
            }

            let row = evaluator.evaluate();

            if let Some(writer) = sink.as_deref_mut()
                && let Err(e) = writer.write_row(&row)
            {
                tracing::warn!(
                    calc = %self.label,
                    error = %e,
                    "failed to stream row, export stopped"
                );
                sink = None;
            }

            rows.push(row);
        }

        tracing::info!(calc = %self.label, rows = rows.len(), "end work");
        rows
    }

    /// Evaluate every combination with a function of the grid point itself.
    ///
    /// `f` receives one sample per variable, in variable order, and does not
    /// read the variables' current values (they are left untouched). With the
    /// `parallel` feature the leaves are spread over the rayon pool; the
    /// returned rows are always in enumeration order.
    pub fn run_indexed<V, F>(&self, variables: &[V], f: F) -> Vec<RowResult>
    where
        V: AsRef<Variable>,
        F: Fn(&[ComplexSample]) -> RowResult + Sync,
    {
        if self.disabled {
            tracing::info!(calc = %self.label, "skip work");
            return Vec::new();
        }

        let shape: Vec<usize> = variables.iter().map(|v| v.as_ref().len()).collect();
        let points: Vec<Vec<ComplexSample>> = GridIndices::new(shape)
            .map(|position| {
                variables
                    .iter()
                    .zip(&position)
                    .map(|(v, &i)| v.as_ref().points()[i])
                    .collect()
            })
            .collect();
        tracing::info!(calc = %self.label, points = points.len(), "begin work");

        #[cfg(feature = "parallel")]
        let rows: Vec<RowResult> = points.par_iter().map(|p| f(p)).collect();

        #[cfg(not(feature = "parallel"))]
        let rows: Vec<RowResult> = points.iter().map(|p| f(p)).collect();

        tracing::info!(calc = %self.label, rows = rows.len(), "end work");
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::c;

    struct FailingSink {
        attempts: usize,
    }

    impl RowSink for FailingSink {
        fn write_row(&mut self, _row: &[f64]) -> io::Result<()> {
            self.attempts += 1;
            Err(io::Error::other("disk full"))
        }
    }

    #[test]
    fn test_sink_failure_stops_streaming_but_keeps_rows() {
        let x = Variable::linspace("x", "", c(0.0, 0.0), c(1.0, 0.0), 4).unwrap();
        let mut sink = FailingSink { attempts: 0 };

        let engine = SweepEngine::new("failing", &RunConfig::default());
        let rows = engine.run(&[&x], || vec![x.current().re], Some(&mut sink));

        assert_eq!(rows.len(), 4);
        assert_eq!(sink.attempts, 1);
    }

    #[test]
    fn test_total_points() {
        let x = Variable::linspace("x", "", c(0.0, 0.0), c(1.0, 0.0), 4).unwrap();
        let y = Variable::linspace("y", "", c(0.0, 0.0), c(1.0, 0.0), 3).unwrap();
        assert_eq!(SweepEngine::total_points(&[&x, &y]), 12);
        assert_eq!(SweepEngine::total_points::<&Variable>(&[]), 1);
    }

    #[test]
    fn test_run_indexed_matches_run() {
        let x = Variable::linspace("x", "", c(0.0, 0.0), c(1.0, 0.0), 5).unwrap();
        let y = Variable::logspace("y", "", c(1.0, 0.0), c(100.0, 0.0), 3).unwrap();
        let engine = SweepEngine::new("indexed", &RunConfig::default());

        let sequential = engine.run(
            &[&x, &y],
            || vec![x.current().re, y.current().re, x.current().re * y.current().re],
            None,
        );
        let indexed = engine.run_indexed(&[&x, &y], |p| vec![p[0].re, p[1].re, p[0].re * p[1].re]);

        assert_eq!(sequential, indexed);
    }
}
