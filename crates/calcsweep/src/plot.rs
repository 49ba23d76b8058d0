//! Gnuplot adapter.
//!
//! A [`PlotScript`] records every command it is given and forwards it to a
//! `gnuplot` process over stdin. The recorded history can be written out as a
//! `.plt` file and replayed later with `gnuplot <name>.plt`.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, Command, Stdio};

use calcsweep_core::Calculation;
use serde::{Deserialize, Serialize};

use crate::config::PlotConfig;

/// Gnuplot terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Term {
    Png,
    Epslatex,
}

impl Term {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Term::Png => "png",
            Term::Epslatex => "epslatex",
        }
    }

    /// Raster output carries a title and the parameter caption
    #[must_use]
    pub fn shows_parameters(self) -> bool {
        self == Term::Png
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const TERM_SETTINGS: &[&str] = &[
    "",
    "#begin term settings",
    "if (chosen_term eq 'png') {",
    "  set term png enhanced size 1200,1200 font 'Ubuntu,28' lw 2",
    "  output_ext = '.png'",
    "  line_lw = 2.6",
    "  default_ps = 1.5",
    "}",
    "if (chosen_term eq 'epslatex') {",
    "  set term epslatex size 15cm,16cm font ',20pt' lw 2",
    "  output_ext = '.tex'",
    "  line_lw = 4",
    "  default_ps = 2.5",
    "  set key samplen 5",
    "  set key spacing 3",
    "}",
    "#end term settings",
    "",
];

// Styles 1-9 are for lines, 10-18 for points; see calcsweep_core::plot.
const STYLE_SETTINGS: &[&str] = &[
    "#begin styles",
    "c_blue = '#0088aa'",
    "c_dgreen = '#325a0a'",
    "c_orange = '#ff6600'",
    "c_brown = '#9b745c'",
    "c_green = '#30ae30'",
    "c_purple = '#6600ff'",
    "c_gold = '#bf9800'",
    "c_maroon = '#8d2727'",
    "c_light_gray = '#a3a3a3'",
    "c_dark_gray = '#424242'",
    "c_pink = '#ff0066'",
    "set style line 1 lw line_lw lc rgb c_blue",
    "set style line 2 lw line_lw lc rgb c_purple",
    "set style line 3 lw line_lw lc rgb c_orange",
    "set style line 4 lw line_lw lc rgb c_brown",
    "set style line 5 lw line_lw lc rgb c_green",
    "set style line 6 lw line_lw lc rgb c_pink",
    "set style line 7 lw line_lw lc rgb c_gold",
    "set style line 8 lw line_lw lc rgb c_maroon",
    "set style line 9 lw line_lw lc rgb c_light_gray",
    "point_lw = 1.3",
    "set style line 10 lw point_lw ps default_ps lc rgb c_maroon",
    "set style line 11 lw point_lw ps default_ps lc rgb c_blue",
    "set style line 12 lw point_lw ps default_ps lc rgb c_dgreen",
    "set style line 13 lw point_lw ps default_ps lc rgb c_orange",
    "set style line 14 lw point_lw ps default_ps lc rgb c_brown",
    "set style line 15 lw point_lw ps default_ps lc rgb c_green",
    "set style line 16 lw point_lw ps default_ps lc rgb c_purple",
    "set style line 17 lw point_lw ps default_ps lc rgb c_gold",
    "set style line 18 lw point_lw ps default_ps lc rgb c_maroon",
    "#end styles",
    "",
];

/// Running gnuplot process fed through its stdin
#[derive(Debug)]
struct GnuplotPipe {
    child: Child,
    stdin: ChildStdin,
}

impl GnuplotPipe {
    fn spawn(program: &str) -> io::Result<Self> {
        let mut child = Command::new(program)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::other("gnuplot stdin is not piped"))?;
        Ok(Self { child, stdin })
    }

    fn send_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.stdin, "{line}")
    }

    fn close(self) -> io::Result<std::process::ExitStatus> {
        let Self { mut child, stdin } = self;
        drop(stdin);
        child.wait()
    }
}

/// Recorded gnuplot session for one calculation
#[derive(Debug)]
pub struct PlotScript {
    name: String,
    term: Term,
    history: Vec<String>,
    parameter_info: Vec<String>,
    labels: usize,
    pipe: Option<GnuplotPipe>,
}

impl PlotScript {
    /// Start `program` and send the terminal and style preamble.
    ///
    /// If the process cannot be started the failure is logged and the script
    /// only records commands, so it can still be exported.
    pub fn spawn(name: impl Into<String>, term: Term, program: &str) -> Self {
        let name = name.into();
        let pipe = match GnuplotPipe::spawn(program) {
            Ok(pipe) => Some(pipe),
            Err(e) => {
                tracing::warn!(calc = %name, program, error = %e, "could not start gnuplot");
                None
            }
        };
        Self::with_pipe(name, term, pipe)
    }

    /// A script that only records commands
    pub fn detached(name: impl Into<String>, term: Term) -> Self {
        Self::with_pipe(name.into(), term, None)
    }

    fn with_pipe(name: String, term: Term, pipe: Option<GnuplotPipe>) -> Self {
        let mut script = Self {
            name,
            term,
            history: Vec::new(),
            parameter_info: Vec::new(),
            labels: 0,
            pipe,
        };
        script.set_term();
        script.set_extra();
        script.r_all(STYLE_SETTINGS);
        script
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn term(&self) -> Term {
        self.term
    }

    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.pipe.is_some()
    }

    /// Record `command` and send it to gnuplot.
    pub fn r(&mut self, command: impl Into<String>) -> &mut Self {
        let command = command.into();
        self.send(&command);
        self.history.push(command);
        self
    }

    /// Send `command` without recording it.
    pub fn r_unrecorded(&mut self, command: &str) -> &mut Self {
        self.send(command);
        self
    }

    pub fn r_all(&mut self, commands: &[&str]) -> &mut Self {
        for command in commands {
            self.r(*command);
        }
        self
    }

    pub fn set(&mut self, rest: &str) -> &mut Self {
        self.r(format!("set {rest}"))
    }

    pub fn set_output(&mut self, file_stem: &str) -> &mut Self {
        self.r(format!("set output '{file_stem}'.output_ext"))
    }

    pub fn set_separator(&mut self, delimiter: &str) -> &mut Self {
        self.r(format!("set datafile separator '{delimiter}'"))
    }

    /// Add a `set label` command and return its 1-based gnuplot label number.
    pub fn set_label(&mut self, text: &str, position: &str, extra: &str) -> usize {
        self.labels += 1;
        let index = self.labels;
        self.r(format!("set label {index} at {position} \"{text}\" {extra}"));
        index
    }

    pub fn append_parameter_info(&mut self, line: impl Into<String>) -> &mut Self {
        self.parameter_info.push(line.into());
        self
    }

    /// Caption listing the parameters below the graph, shown on raster terms.
    pub fn set_parameter_info(&mut self) -> &mut Self {
        let show = u8::from(self.term.shows_parameters());
        self.r(format!("show_parameters = {show}"));

        let bottom_margin = 4 + self.parameter_info.len();
        let mut caption = String::from("\\n\\n\\n\\n");
        for line in &self.parameter_info {
            caption.push_str(line);
            caption.push_str("\\n");
        }

        self.r("if (show_parameters == 1) {");
        self.r(format!("set bmargin {bottom_margin}"));
        self.set_label(&caption, "graph 0,graph 0", "tc rgb c_light_gray");
        self.r("}")
    }

    /// Close the output and the gnuplot session.
    pub fn end(&mut self) {
        self.r("unset output");
        self.r("exit");
        if let Some(pipe) = self.pipe.take() {
            match pipe.close() {
                Ok(status) if status.success() => {}
                Ok(status) => {
                    tracing::warn!(calc = %self.name, %status, "gnuplot exited with failure")
                }
                Err(e) => tracing::warn!(calc = %self.name, error = %e, "failed to wait for gnuplot"),
            }
        }
    }

    /// Write the recorded commands to `path`, preceded by a comment header.
    pub fn export_script(&self, path: &Path) -> io::Result<()> {
        let mut out = String::new();
        out.push_str(&format!(
            "# {} plot script, generated {}\n",
            self.name,
            jiff::Timestamp::now()
        ));
        for command in &self.history {
            out.push_str(command);
            out.push('\n');
        }
        fs::write(path, out)
    }

    fn set_term(&mut self) {
        self.r(format!("chosen_term = '{}'", self.term));
        self.r_all(TERM_SETTINGS);
    }

    fn set_extra(&mut self) {
        self.r("set encoding utf8");
        self.r("set key font 'Ubuntu,22'");
        if self.term.shows_parameters() {
            let title = self.name.replace('_', " ");
            self.set(&format!("title '{title}'"));
        }
    }

    fn send(&mut self, command: &str) {
        let Some(pipe) = self.pipe.as_mut() else {
            return;
        };
        tracing::trace!(calc = %self.name, "gnuplot: {command}");
        if let Err(e) = pipe.send_line(command) {
            tracing::warn!(calc = %self.name, error = %e, "lost connection to gnuplot");
            self.pipe = None;
        }
    }
}

impl Drop for PlotScript {
    fn drop(&mut self) {
        if let Some(pipe) = self.pipe.take() {
            let _ = pipe.close();
        }
    }
}

/// Render `commands` for `calc` and, if configured, export the script.
///
/// Placeholders in the commands (`<header>`, `<data_file_path>`,
/// `<l_style>`, `<p_style>`) are resolved against the calculation first.
/// Gnuplot runs inside the calculation directory so the data file and the
/// output image sit side by side.
pub fn plot_calculation(calc: &Calculation, commands: &[String], config: &PlotConfig) -> PlotScript {
    let mut script = if config.enabled {
        PlotScript::spawn(calc.name(), config.term, &config.gnuplot)
    } else {
        PlotScript::detached(calc.name(), config.term)
    };

    script.r_unrecorded(&format!("cd '{}'", calc.directory().display()));
    script.set_output(calc.name());
    script.set_separator(&calc.config().delimiter);
    for label in calc.parameter_labels() {
        script.append_parameter_info(label);
    }
    script.set_parameter_info();

    let mut context = calc.plot_context();
    for command in commands {
        script.r(context.render(command));
    }
    script.end();

    if config.export_script {
        let path = calc.directory().join(format!("{}.plt", calc.name()));
        match script.export_script(&path) {
            Ok(()) => tracing::info!(calc = %calc.name(), path = %path.display(), "exported plot script"),
            Err(e) => tracing::warn!(calc = %calc.name(), error = %e, "failed to export plot script"),
        }
    }

    script
}
