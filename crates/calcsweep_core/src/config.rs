//! Run configuration shared by calculations and the sweep engine.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Literal process argument that disables sweep execution.
pub const NOWORK_FLAG: &str = "nowork";

/// Settings scoped to a single calculation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Root directory that receives one sub-directory per calculation
    pub output_root: PathBuf,
    /// When set, sweeps log their lifecycle but evaluate nothing
    pub disabled: bool,
    /// Field separator used for exported rows and header lines
    pub delimiter: String,
    /// Stream rows to the data file while the sweep runs
    pub export_live: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("calculations_output"),
            disabled: false,
            delimiter: " ".to_string(),
            export_live: true,
        }
    }
}

impl RunConfig {
    /// Create a config writing below `output_root`
    #[must_use]
    pub fn with_output_root(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
            ..Default::default()
        }
    }

    /// Disable the run if any argument is exactly [`NOWORK_FLAG`].
    pub fn apply_flags<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if args.into_iter().any(|arg| arg.as_ref() == NOWORK_FLAG) {
            self.disabled = true;
        }
        self
    }
}
