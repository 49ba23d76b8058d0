mod parameter;
mod variable;

pub use parameter::Parameter;
pub use variable::Variable;

/// One row of sweep output, produced by a single leaf evaluation
pub type RowResult = Vec<f64>;
