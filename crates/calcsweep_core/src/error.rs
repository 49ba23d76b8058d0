use std::path::PathBuf;

/// Caller mistakes detected when a grid, variable or solver is set up.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A sample generator was asked for zero points along an axis
    #[error("grid needs at least one point per axis (got {n_real}x{n_imag})")]
    EmptyGrid { n_real: usize, n_imag: usize },

    #[error("variable '{0}' has no sample points")]
    EmptyVariable(String),

    /// `logspace` endpoint outside the domain of `log10`
    #[error("logspace {axis} endpoints must be positive (start={start}, end={end})")]
    LogDomain {
        axis: &'static str,
        start: f64,
        end: f64,
    },

    #[error("max_iterations must be at least 1 (got {0})")]
    InvalidIterations(usize),

    #[error("finite difference step must be positive and finite (got {0})")]
    InvalidStep(f64),

    #[error("{name} tolerance must be non-negative and finite (got {value})")]
    InvalidTolerance { name: &'static str, value: f64 },

    #[error("restart policy needs at least one attempt and a non-negative radius (got {attempts}, {radius})")]
    InvalidRestart { attempts: usize, radius: f64 },

    #[error("root finder result has no recorded history")]
    MissingHistory,

    #[error("recorded trajectory has no finite iterates")]
    NoFiniteIterates,
}

/// Failures reading or writing delimited export files.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: cannot parse field '{field}' as a number", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        field: String,
    },

    #[error("{}: file is empty, expected a header line", .path.display())]
    MissingHeader { path: PathBuf },
}

impl ExportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExportError::Io {
            path: path.into(),
            source,
        }
    }
}
