//! A named run: parameters, sweep variables, headers and collected rows.
//!
//! Every calculation owns the directory `<output_root>/<name>/`. Rows produced
//! by [`Calculation::work`] land in `<name>.data` inside it, either streamed
//! while the sweep runs or written afterwards by [`Calculation::export`].

use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use crate::config::RunConfig;
use crate::error::ExportError;
use crate::export::{self, ExportWriter};
use crate::model::{Parameter, RowResult, Variable};
use crate::plot::PlotContext;
use crate::sweep::{Evaluate, RowSink, SweepEngine};

#[derive(Debug)]
pub struct Calculation {
    name: String,
    config: RunConfig,
    parameters: Vec<Parameter>,
    variables: Vec<Rc<Variable>>,
    headers: Vec<String>,
    rows: Vec<RowResult>,
    width_warned: bool,
}

impl Calculation {
    /// Create the calculation and, best effort, its output directories.
    pub fn new(name: impl Into<String>, config: RunConfig) -> Self {
        let calc = Self {
            name: name.into(),
            config,
            parameters: Vec::new(),
            variables: Vec::new(),
            headers: Vec::new(),
            rows: Vec::new(),
            width_warned: false,
        };

        let directory = calc.directory();
        if let Err(e) = fs::create_dir_all(&directory) {
            tracing::warn!(
                calc = %calc.name,
                path = %directory.display(),
                error = %e,
                "failed to create output directory"
            );
        }
        calc
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn add_parameter(&mut self, parameter: Parameter) -> &mut Self {
        self.parameters.push(parameter);
        self
    }

    /// Register a sweep axis. The returned handle lets the evaluator read the
    /// variable's current value while [`work`](Self::work) runs.
    pub fn add_variable(&mut self, variable: Variable) -> Rc<Variable> {
        let variable = Rc::new(variable);
        self.variables.push(Rc::clone(&variable));
        variable
    }

    pub fn set_headers<I, S>(&mut self, headers: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers = headers.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    #[must_use]
    pub fn variables(&self) -> &[Rc<Variable>] {
        &self.variables
    }

    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    #[must_use]
    pub fn rows(&self) -> &[RowResult] {
        &self.rows
    }

    /// `<output_root>/<name>`
    #[must_use]
    pub fn directory(&self) -> PathBuf {
        self.config.output_root.join(&self.name)
    }

    #[must_use]
    pub fn data_filename(&self) -> String {
        format!("{}.data", self.name)
    }

    /// `<output_root>/<name>/<name>.data`
    #[must_use]
    pub fn data_filepath(&self) -> PathBuf {
        self.directory().join(self.data_filename())
    }

    /// Sweep the registered variables, calling `evaluator` once per grid point.
    ///
    /// Rows are appended to [`rows`](Self::rows) and, with `export_live`,
    /// streamed to the data file (header line first). Export problems are
    /// logged and never abort the sweep. Returns the number of rows added.
    pub fn work<E: Evaluate>(&mut self, evaluator: E) -> usize {
        let engine = SweepEngine::new(self.name.as_str(), &self.config);

        let mut writer = None;
        if !engine.is_disabled() {
            for parameter in &self.parameters {
                tracing::info!(calc = %self.name, "param: {parameter}");
            }
            if self.config.export_live {
                writer = self.open_export();
            }
        }

        let rows = engine.run(
            &self.variables,
            evaluator,
            writer.as_mut().map(|w| w as &mut dyn RowSink),
        );

        if let Some(writer) = writer {
            let path = writer.path().to_path_buf();
            match writer.finish() {
                Ok(written) => tracing::debug!(
                    calc = %self.name,
                    path = %path.display(),
                    rows = written,
                    "data file closed"
                ),
                Err(e) => tracing::warn!(calc = %self.name, error = %e, "failed to flush data file"),
            }
        }

        self.check_row_widths(&rows);
        let added = rows.len();
        self.rows.extend(rows);
        added
    }

    /// Write every collected row to the data file in one go.
    pub fn export(&self) -> Result<usize, ExportError> {
        let path = self.data_filepath();
        let written =
            export::write_delimited(&path, &self.config.delimiter, &self.headers, &self.rows)?;
        tracing::info!(
            calc = %self.name,
            path = %path.display(),
            rows = written,
            "exported rows"
        );
        Ok(written)
    }

    /// 1-based column of `header` in the data file.
    pub fn header_index(&self, header: &str) -> Option<usize> {
        let index = self.headers.iter().position(|h| h == header).map(|i| i + 1);
        if index.is_none() {
            tracing::warn!(calc = %self.name, header, "could not find header by name");
        }
        index
    }

    #[must_use]
    pub fn plot_context(&self) -> PlotContext {
        PlotContext::new(&self.headers, self.data_filename())
    }

    /// `name: value (units)` for every parameter, for plot captions
    #[must_use]
    pub fn parameter_labels(&self) -> Vec<String> {
        self.parameters.iter().map(ToString::to_string).collect()
    }

    fn open_export(&self) -> Option<ExportWriter> {
        match ExportWriter::create(self.data_filepath(), &self.config.delimiter, &self.headers) {
            Ok(writer) => Some(writer),
            Err(e) => {
                tracing::warn!(calc = %self.name, error = %e, "rows will not be exported");
                None
            }
        }
    }

    fn check_row_widths(&mut self, rows: &[RowResult]) {
        if self.width_warned || self.headers.is_empty() {
            return;
        }
        if let Some(row) = rows.iter().find(|r| r.len() != self.headers.len()) {
            tracing::warn!(
                calc = %self.name,
                headers = self.headers.len(),
                fields = row.len(),
                "row width does not match headers"
            );
            self.width_warned = true;
        }
    }
}
