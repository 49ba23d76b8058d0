//! Labelled scalar values used to annotate a run.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sample::{ComplexSample, SampleDisplay};

/// A named, unit-labelled complex value, e.g. a fixed physical constant of
/// the experiment. Shows up in log lines and plot captions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub units: String,
    value: ComplexSample,
}

impl Parameter {
    pub fn new(name: impl Into<String>, units: impl Into<String>, value: ComplexSample) -> Self {
        Self {
            name: name.into(),
            units: units.into(),
            value,
        }
    }

    #[must_use]
    pub fn value(&self) -> ComplexSample {
        self.value
    }

    pub fn set_value(&mut self, value: ComplexSample) {
        self.value = value;
    }

    /// Render the value with optional `name: ` prefix and ` (units)` suffix.
    #[must_use]
    pub fn label(&self, include_name: bool, include_units: bool) -> String {
        let mut label = String::new();
        if include_name {
            label.push_str(&self.name);
            label.push_str(": ");
        }
        label.push_str(&SampleDisplay(self.value).to_string());
        if include_units {
            label.push_str(" (");
            label.push_str(&self.units);
            label.push(')');
        }
        label
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label(true, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::c;

    #[test]
    fn test_parameter_display() {
        let p = Parameter::new("gap", "nm", c(12.5, 0.0));
        assert_eq!(p.to_string(), "gap: 12.5 (nm)");
        assert_eq!(p.label(false, true), "12.5 (nm)");
        assert_eq!(p.label(true, false), "gap: 12.5");
        assert_eq!(p.label(false, false), "12.5");
    }

    #[test]
    fn test_parameter_complex_value() {
        let mut p = Parameter::new("eps", "", c(2.0, 0.0));
        p.set_value(c(-1.5, 0.25));
        assert_eq!(p.value(), c(-1.5, 0.25));
        assert_eq!(p.to_string(), "eps: -1.5 + 0.25i ()");
    }
}
