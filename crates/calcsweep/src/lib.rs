//! Command line front end for calcsweep
//!
//! This crate wires the `calcsweep_core` engine to the outside world:
//! - YAML configuration with user-directory fallback
//! - Logging to stderr and a rotating file in the output root
//! - A gnuplot adapter that renders calculation data files
//! - A set of built-in experiments

pub mod config;
pub mod experiments;
pub mod logging;
pub mod plot;

pub use config::{AppConfig, ConfigFileError, PlotConfig, locate};
pub use experiments::{ExperimentKind, ExperimentRun};
pub use logging::init_logging;
pub use plot::{PlotScript, Term, plot_calculation};
