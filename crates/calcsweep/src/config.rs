//! YAML configuration file for the command line front end.
//!
//! ```yaml
//! run:
//!   output_root: calculations_output
//!   disabled: false
//!   delimiter: " "
//!   export_live: true
//! newton:
//!   max_iterations: 80
//!   record_history: false
//! restart:
//!   attempts: 5
//! plot:
//!   enabled: true
//!   term: png
//! ```
//!
//! Every section and field is optional; missing values take their defaults.

use std::path::{Path, PathBuf};

use calcsweep_core::{NewtonConfig, RestartPolicy, RunConfig};
use serde::{Deserialize, Serialize};

use crate::plot::Term;

pub const CONFIG_FILE_NAME: &str = "calcsweep.yaml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("failed to serialize config: {0}")]
    Serialize(String),
}

/// Plot rendering options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Render each experiment through gnuplot
    pub enabled: bool,
    pub term: Term,
    /// Also write `<name>.plt` next to the data file
    pub export_script: bool,
    /// Program spawned to render plots
    pub gnuplot: String,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            term: Term::Png,
            export_script: true,
            gnuplot: "gnuplot".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub run: RunConfig,
    pub newton: NewtonConfig,
    pub restart: RestartPolicy,
    pub plot: PlotConfig,
}

impl AppConfig {
    /// Parse a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigFileError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_saphyr::from_str(&content).map_err(|e| ConfigFileError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load `explicit` if given, otherwise the first existing default
    /// location, otherwise the built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigFileError> {
        match locate(explicit) {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigFileError> {
        let yaml =
            serde_saphyr::to_string(self).map_err(|e| ConfigFileError::Serialize(e.to_string()))?;
        std::fs::write(path, yaml).map_err(|source| ConfigFileError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// The file [`AppConfig::load`] reads: `explicit` as given, otherwise the
/// first default location that exists.
pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => default_locations().into_iter().find(|p| p.is_file()),
    }
}

/// `./calcsweep.yaml`, then `<user config dir>/calcsweep/calcsweep.yaml`
pub fn default_locations() -> Vec<PathBuf> {
    let mut locations = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        locations.push(dir.join("calcsweep").join(CONFIG_FILE_NAME));
    }
    locations
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            "run:\n  output_root: out\n  disabled: true\nnewton:\n  max_iterations: 12\n",
        )
        .unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.run.output_root, PathBuf::from("out"));
        assert!(config.run.disabled);
        assert_eq!(config.run.delimiter, " ");
        assert_eq!(config.newton.max_iterations, 12);
        assert_eq!(config.newton.step, 1e-6);
        assert_eq!(config.plot, PlotConfig::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("saved.yaml");

        let mut config = AppConfig::default();
        config.run.delimiter = ",".to_string();
        config.newton.record_history = true;
        config.restart.seed = 1234;
        config.plot.term = Term::Epslatex;
        config.save(&path).unwrap();

        assert_eq!(AppConfig::load(Some(&path)).unwrap(), config);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let err = AppConfig::load(Some(&dir.path().join("nope.yaml"))).unwrap_err();
        assert!(matches!(err, ConfigFileError::Read { .. }));
    }

    #[test]
    fn test_malformed_file_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "newton:\n  max_iterations: lots\n").unwrap();

        let err = AppConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigFileError::Parse { .. }));
        assert!(err.to_string().contains("bad.yaml"));
    }

    #[test]
    fn test_locate_prefers_explicit_path() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.yaml");

        // explicit paths are returned unchecked so loading reports the error
        assert_eq!(locate(Some(&missing)), Some(missing.clone()));
        if let Some(found) = locate(None) {
            assert!(found.is_file());
        }
    }

    #[test]
    fn test_default_locations_start_with_working_dir() {
        assert_eq!(default_locations()[0], PathBuf::from(CONFIG_FILE_NAME));
    }
}
