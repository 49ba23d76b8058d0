//! Placeholder substitution for plot commands.
//!
//! Plot commands are written against column *names* and resolved here:
//!
//! | token              | replaced with                               |
//! |--------------------|---------------------------------------------|
//! | `<header_name>`    | 1-based column index of that header         |
//! | `<data_file_path>` | the calculation's data file name            |
//! | `<l_style>`        | `l ls N`, N cycling through line styles 1-9 |
//! | `<p_style>`        | `p ls N`, N cycling through styles 10-18    |
//!
//! Unknown tokens are left as they are.

use rustc_hash::FxHashMap;

pub const DATA_FILE_TOKEN: &str = "<data_file_path>";
pub const LINE_STYLE_TOKEN: &str = "<l_style>";
pub const POINT_STYLE_TOKEN: &str = "<p_style>";

const LINE_STYLES: [u8; 9] = [1, 2, 3, 4, 5, 6, 7, 8, 9];
const POINT_STYLES: [u8; 9] = [10, 11, 12, 13, 14, 15, 16, 17, 18];

/// Kind of style handed out by [`StyleCycle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleKind {
    Line,
    Point,
}

/// Round-robin generator of line and point style numbers.
#[derive(Debug, Clone, Default)]
pub struct StyleCycle {
    line: usize,
    point: usize,
}

impl StyleCycle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Next style number of the given kind, wrapping after nine.
    pub fn next_style(&mut self, kind: StyleKind) -> u8 {
        match kind {
            StyleKind::Line => {
                let style = LINE_STYLES[self.line % LINE_STYLES.len()];
                self.line += 1;
                style
            }
            StyleKind::Point => {
                let style = POINT_STYLES[self.point % POINT_STYLES.len()];
                self.point += 1;
                style
            }
        }
    }
}

/// Everything a plot adapter needs to resolve placeholders for one calculation.
#[derive(Debug, Clone)]
pub struct PlotContext {
    columns: FxHashMap<String, usize>,
    data_file: String,
    styles: StyleCycle,
}

impl PlotContext {
    /// Build a context from ordered header names. Duplicate names resolve to
    /// their first occurrence.
    pub fn new<S: AsRef<str>>(headers: &[S], data_file: impl Into<String>) -> Self {
        let mut columns = FxHashMap::default();
        for (i, header) in headers.iter().enumerate() {
            columns.entry(header.as_ref().to_string()).or_insert(i + 1);
        }
        Self {
            columns,
            data_file: data_file.into(),
            styles: StyleCycle::new(),
        }
    }

    /// 1-based column of `header`, if present
    #[must_use]
    pub fn column(&self, header: &str) -> Option<usize> {
        self.columns.get(header).copied()
    }

    /// Resolve every placeholder in `command`.
    pub fn render(&mut self, command: &str) -> String {
        let mut out = String::with_capacity(command.len());
        let mut rest = command;

        while let Some(open) = rest.find('<') {
            out.push_str(&rest[..open]);
            let tail = &rest[open..];
            let Some(close) = tail.find('>') else {
                out.push_str(tail);
                return out;
            };

            let token = &tail[..=close];
            if token[1..].contains('<') {
                out.push('<');
                rest = &tail[1..];
                continue;
            }
            match self.resolve(token) {
                Some(replacement) => out.push_str(&replacement),
                None => out.push_str(token),
            }
            rest = &tail[close + 1..];
        }

        out.push_str(rest);
        out
    }

    fn resolve(&mut self, token: &str) -> Option<String> {
        match token {
            DATA_FILE_TOKEN => Some(self.data_file.clone()),
            LINE_STYLE_TOKEN => Some(format!("l ls {}", self.styles.next_style(StyleKind::Line))),
            POINT_STYLE_TOKEN => Some(format!(
                "p ls {}",
                self.styles.next_style(StyleKind::Point)
            )),
            _ => {
                let name = &token[1..token.len() - 1];
                self.column(name).map(|c| c.to_string())
            }
        }
    }
}
