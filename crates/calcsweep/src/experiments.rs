//! Built-in experiments run by the `calcsweep` binary.
//!
//! Each experiment builds a [`Calculation`], sweeps it and returns the plot
//! commands that visualise its data file.

use std::fs;

use calcsweep_core::export::write_delimited;
use calcsweep_core::roots::{DiagnosticsBuilder, Restarter};
use calcsweep_core::sample::{ComplexSample, c};
use calcsweep_core::{Calculation, NewtonConfig, NewtonRaphson, Parameter, Variable};
use color_eyre::eyre::WrapErr;

use crate::config::AppConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExperimentKind {
    /// Roots of z^2 + p z + 1 as p sweeps the real line
    Quadratic,
    /// Driven damped oscillator gain over frequency and damping
    Resonance,
    /// Newton trajectory on z^3 - 1 with a |f| heat map
    Trajectory,
}

impl ExperimentKind {
    pub const ALL: [ExperimentKind; 3] = [
        ExperimentKind::Quadratic,
        ExperimentKind::Resonance,
        ExperimentKind::Trajectory,
    ];
}

/// A finished experiment and the commands that plot it
#[derive(Debug)]
pub struct ExperimentRun {
    pub calculation: Calculation,
    pub plot_commands: Vec<String>,
}

pub fn run(kind: ExperimentKind, config: &AppConfig) -> color_eyre::Result<ExperimentRun> {
    match kind {
        ExperimentKind::Quadratic => quadratic(config),
        ExperimentKind::Resonance => resonance(config),
        ExperimentKind::Trajectory => trajectory(config),
    }
}

fn quadratic(config: &AppConfig) -> color_eyre::Result<ExperimentRun> {
    let guess = c(0.5, 0.5);

    let mut calc = Calculation::new("quadratic_roots", config.run.clone());
    calc.add_parameter(Parameter::new("guess", "", guess));
    let p = calc.add_variable(Variable::linspace("p", "", c(-3.0, 0.0), c(3.0, 0.0), 60)?);
    calc.set_headers(["p", "root_re", "root_im", "iterations", "residual"]);

    let solver = NewtonRaphson::new(config.newton.clone())?;
    let restarter = Restarter::new(&solver, config.restart.clone())?;

    calc.work(|| {
        let p = p.current();
        let outcome = restarter.solve(|z: ComplexSample| z * z + p * z + 1.0, guess);
        vec![
            p.re,
            outcome.result.root.re,
            outcome.result.root.im,
            outcome.result.iterations_used as f64,
            outcome.result.residual,
        ]
    });

    Ok(ExperimentRun {
        calculation: calc,
        plot_commands: vec![
            "set xlabel 'p'".to_string(),
            "set ylabel 'root'".to_string(),
            "plot '<data_file_path>' u <p>:<root_re> w <l_style> t 'Re z', \
             '' u <p>:<root_im> w <l_style> t 'Im z'"
                .to_string(),
        ],
    })
}

/// `|H| = 1 / |1 - w^2 + 2 i zeta w|`, phase in degrees
fn oscillator_response(omega: f64, zeta: f64) -> (f64, f64) {
    let denominator = c(1.0 - omega * omega, 2.0 * zeta * omega);
    let response = denominator.inv();
    (response.norm(), response.arg().to_degrees())
}

fn resonance(config: &AppConfig) -> color_eyre::Result<ExperimentRun> {
    let mut calc = Calculation::new("resonance", config.run.clone());
    calc.add_parameter(Parameter::new("natural frequency", "rad/s", c(1.0, 0.0)));
    let zeta = calc.add_variable(Variable::new(
        "zeta",
        "",
        vec![c(0.05, 0.0), c(0.1, 0.0), c(0.25, 0.0), c(0.5, 0.0), c(1.0, 0.0)],
    )?);
    let omega = calc.add_variable(Variable::logspace("omega", "rad/s", c(0.1, 0.0), c(10.0, 0.0), 81)?);
    calc.set_headers(["zeta", "omega", "gain", "phase"]);

    calc.work(|| {
        let (zeta, omega) = (zeta.current().re, omega.current().re);
        let (gain, phase) = oscillator_response(omega, zeta);
        vec![zeta, omega, gain, phase]
    });

    Ok(ExperimentRun {
        calculation: calc,
        plot_commands: vec![
            "set logscale xy".to_string(),
            "set xlabel 'omega (rad/s)'".to_string(),
            "set ylabel 'gain'".to_string(),
            "plot for [i=0:4] '<data_file_path>' every :::i::i u <omega>:<gain> w <l_style> \
             t sprintf('block %d', i)"
                .to_string(),
        ],
    })
}

fn trajectory(config: &AppConfig) -> color_eyre::Result<ExperimentRun> {
    let guess = c(-0.8, 1.2);
    let f = |z: ComplexSample| z * z * z - 1.0;

    let mut calc = Calculation::new("newton_trajectory", config.run.clone());
    calc.add_parameter(Parameter::new("guess", "", guess));
    calc.set_headers(["re", "im", "abs_f"]);

    let plot_commands = vec![
        "set xlabel 'Re z'".to_string(),
        "set ylabel 'Im z'".to_string(),
        "plot '<data_file_path>' u <re>:<im>:<abs_f> w image, \
         'newton_trajectory_path.data' u 1:2 w <l_style> t 'iterates'"
            .to_string(),
    ];

    if config.run.disabled {
        tracing::info!(calc = %calc.name(), "skip work");
        return Ok(ExperimentRun {
            calculation: calc,
            plot_commands,
        });
    }

    let solver = NewtonRaphson::new(NewtonConfig {
        record_history: true,
        ..config.newton.clone()
    })?;
    let result = solver.solve(f, guess);
    tracing::info!(
        calc = %calc.name(),
        root = %result.root,
        iterations = result.iterations_used,
        termination = %result.termination,
        "solved"
    );

    let builder = DiagnosticsBuilder::new(&result)?;
    let diagnostics = builder.build(f);

    let directory = calc.directory();
    let json_path = directory.join(format!("{}.diagnostics.json", calc.name()));
    let json = serde_json::to_string_pretty(&diagnostics)?;
    fs::write(&json_path, json)
        .wrap_err_with(|| format!("failed to write {}", json_path.display()))?;

    let delimiter = &config.run.delimiter;
    write_delimited(calc.data_filepath(), delimiter, calc.headers(), &diagnostics.grid.rows())?;

    let history = builder.history();
    let path_rows: Vec<Vec<f64>> = history
        .z
        .iter()
        .zip(&history.mod_f)
        .map(|(z, &mod_f)| vec![z.re, z.im, mod_f])
        .collect();
    write_delimited(
        directory.join(format!("{}_path.data", calc.name())),
        delimiter,
        calc.headers(),
        &path_rows,
    )?;

    Ok(ExperimentRun {
        calculation: calc,
        plot_commands,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use calcsweep_core::RunConfig;
    use calcsweep_core::export::read_delimited;
    use tempfile::tempdir;

    fn config_in(dir: &std::path::Path) -> AppConfig {
        AppConfig {
            run: RunConfig::with_output_root(dir),
            ..Default::default()
        }
    }

    #[test]
    fn test_oscillator_response_at_resonance() {
        let (gain, phase) = oscillator_response(1.0, 0.5);
        assert!((gain - 1.0).abs() < 1e-12);
        assert!((phase + 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_quadratic_roots_are_roots() {
        let dir = tempdir().unwrap();
        let outcome = run(ExperimentKind::Quadratic, &config_in(dir.path())).unwrap();
        let rows = outcome.calculation.rows();

        assert_eq!(rows.len(), 60);
        for row in rows {
            let (p, z) = (row[0], c(row[1], row[2]));
            assert!((z * z + p * z + 1.0).norm() < 1e-6, "p = {p}");
        }

        let table = read_delimited(outcome.calculation.data_filepath(), " ").unwrap();
        assert_eq!(table.rows.len(), 60);
    }

    #[test]
    fn test_invalid_restart_policy_fails_before_sweeping() {
        let dir = tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.restart.attempts = 0;

        assert!(run(ExperimentKind::Quadratic, &config).is_err());
        assert!(!dir.path().join("quadratic_roots").join("quadratic_roots.data").exists());
    }

    #[test]
    fn test_resonance_grid() {
        let dir = tempdir().unwrap();
        let outcome = run(ExperimentKind::Resonance, &config_in(dir.path())).unwrap();

        assert_eq!(outcome.calculation.rows().len(), 5 * 81);
        // zeta is the outer loop
        assert_eq!(outcome.calculation.rows()[80][0], 0.05);
        assert_eq!(outcome.calculation.rows()[81][0], 0.1);
    }

    #[test]
    fn test_trajectory_writes_diagnostics() {
        let dir = tempdir().unwrap();
        let outcome = run(ExperimentKind::Trajectory, &config_in(dir.path())).unwrap();
        let directory = outcome.calculation.directory();

        let json = fs::read_to_string(directory.join("newton_trajectory.diagnostics.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["result"]["termination"], "Converged");
        assert_eq!(value["grid"]["samples"].as_array().unwrap().len(), 121);

        let grid = read_delimited(outcome.calculation.data_filepath(), " ").unwrap();
        assert_eq!(grid.headers, vec!["re", "im", "abs_f"]);
        assert_eq!(grid.rows.len(), 121);
        assert!(directory.join("newton_trajectory_path.data").is_file());
    }

    #[test]
    fn test_disabled_experiments_produce_nothing() {
        let dir = tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.run.disabled = true;

        for kind in ExperimentKind::ALL {
            let outcome = run(kind, &config).unwrap();
            assert!(outcome.calculation.rows().is_empty());
            assert!(!outcome.calculation.data_filepath().exists());
        }
    }
}
