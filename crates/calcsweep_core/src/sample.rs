//! Complex sample points and grid generators.
//!
//! Samples are plain `Complex64` values; arithmetic comes from `num-complex`.
//! The generators lay out an `n_real × n_imag` grid in real-major order:
//! the outer loop walks the real axis, the inner loop the imaginary axis.

use std::fmt;

use num_complex::Complex64;

use crate::error::ConfigError;

/// A single complex-valued sample point.
pub type ComplexSample = Complex64;

/// Shorthand constructor, `c(re, im)`.
#[inline]
#[must_use]
pub const fn c(re: f64, im: f64) -> ComplexSample {
    Complex64::new(re, im)
}

/// Linearly spaced samples between `start` and `end`.
///
/// The real component is interpolated across `n_real` points and the
/// imaginary component independently across `n_imag` points. With a single
/// point on an axis that axis stays at `start`.
pub fn linspace(
    start: ComplexSample,
    end: ComplexSample,
    n_real: usize,
    n_imag: usize,
) -> Result<Vec<ComplexSample>, ConfigError> {
    if n_real == 0 || n_imag == 0 {
        return Err(ConfigError::EmptyGrid { n_real, n_imag });
    }

    Ok(linear_grid(start, end, n_real, n_imag))
}

/// Unchecked [`linspace`]; callers guarantee `n_real, n_imag >= 1`.
pub(crate) fn linear_grid(
    start: ComplexSample,
    end: ComplexSample,
    n_real: usize,
    n_imag: usize,
) -> Vec<ComplexSample> {
    let real_axis = axis_points(start.re, end.re, n_real);
    let imag_axis = axis_points(start.im, end.im, n_imag);
    cartesian(&real_axis, &imag_axis)
}

/// Logarithmically spaced samples between `start` and `end`.
///
/// Interpolates `log10` of each component and exponentiates. When
/// `n_imag == 1` and `start.im == 0.0` every imaginary part is exactly zero,
/// so purely real decades can be generated without touching `log10(0)`.
pub fn logspace(
    start: ComplexSample,
    end: ComplexSample,
    n_real: usize,
    n_imag: usize,
) -> Result<Vec<ComplexSample>, ConfigError> {
    if n_real == 0 || n_imag == 0 {
        return Err(ConfigError::EmptyGrid { n_real, n_imag });
    }

    check_log_domain("real", start.re, end.re)?;
    let real_axis = log_axis_points(start.re, end.re, n_real);

    let imag_axis = if n_imag == 1 && start.im == 0.0 {
        vec![0.0]
    } else {
        check_log_domain("imaginary", start.im, end.im)?;
        log_axis_points(start.im, end.im, n_imag)
    };

    Ok(cartesian(&real_axis, &imag_axis))
}

fn cartesian(real_axis: &[f64], imag_axis: &[f64]) -> Vec<ComplexSample> {
    let mut samples = Vec::with_capacity(real_axis.len() * imag_axis.len());
    for &re in real_axis {
        for &im in imag_axis {
            samples.push(c(re, im));
        }
    }
    samples
}

fn axis_points(start: f64, end: f64, n: usize) -> Vec<f64> {
    let spaces = n.saturating_sub(1).max(1) as f64;
    let step = (end - start) / spaces;
    (0..n).map(|i| start + step * i as f64).collect()
}

fn log_axis_points(start: f64, end: f64, n: usize) -> Vec<f64> {
    axis_points(start.log10(), end.log10(), n)
        .into_iter()
        .map(|p| 10f64.powf(p))
        .collect()
}

fn check_log_domain(axis: &'static str, start: f64, end: f64) -> Result<(), ConfigError> {
    let valid = |x: f64| x.is_finite() && x > 0.0;
    if valid(start) && valid(end) {
        Ok(())
    } else {
        Err(ConfigError::LogDomain { axis, start, end })
    }
}

/// Round to `digits` significant digits.
fn round_significant(x: f64, digits: usize) -> f64 {
    if x == 0.0 || !x.is_finite() || digits == 0 {
        return x;
    }
    format!("{:.*e}", digits - 1, x).parse().unwrap_or(x)
}

/// Human-readable form of a sample: `1.235` or `1.235 + 0.5i`.
///
/// Both parts are shown to four significant digits; the imaginary part is
/// omitted when it is exactly zero.
#[derive(Debug, Clone, Copy)]
pub struct SampleDisplay(pub ComplexSample);

impl fmt::Display for SampleDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", round_significant(self.0.re, 4))?;
        if self.0.im != 0.0 {
            write!(f, " + {}i", round_significant(self.0.im, 4))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-12, "{a} != {b}");
    }

    #[test]
    fn test_linspace_real_endpoints_and_spacing() {
        let points = linspace(c(1.0, 0.0), c(3.0, 0.0), 5, 1).unwrap();
        assert_eq!(points.len(), 5);
        assert_close(points[0].re, 1.0);
        assert_close(points[4].re, 3.0);
        for pair in points.windows(2) {
            assert_close(pair[1].re - pair[0].re, 0.5);
            assert_eq!(pair[0].im, 0.0);
        }
    }

    #[test]
    fn test_linspace_real_major_order() {
        let points = linspace(c(0.0, 0.0), c(1.0, 2.0), 2, 3).unwrap();
        let expected = [
            c(0.0, 0.0),
            c(0.0, 1.0),
            c(0.0, 2.0),
            c(1.0, 0.0),
            c(1.0, 1.0),
            c(1.0, 2.0),
        ];
        assert_eq!(points, expected);
    }

    #[test]
    fn test_linspace_single_point_does_not_divide_by_zero() {
        let points = linspace(c(2.0, -1.0), c(5.0, 4.0), 1, 1).unwrap();
        assert_eq!(points, vec![c(2.0, -1.0)]);
    }

    #[test]
    fn test_linspace_zero_points_is_an_error() {
        assert_eq!(
            linspace(c(0.0, 0.0), c(1.0, 0.0), 0, 1),
            Err(ConfigError::EmptyGrid {
                n_real: 0,
                n_imag: 1
            })
        );
    }

    #[test]
    fn test_logspace_decades() {
        let points = logspace(c(1.0, 0.0), c(1000.0, 0.0), 4, 1).unwrap();
        let expected = [1.0, 10.0, 100.0, 1000.0];
        for (p, e) in points.iter().zip(expected) {
            assert!((p.re - e).abs() / e < 1e-12);
            assert_eq!(p.im, 0.0);
        }
    }

    #[test]
    fn test_logspace_zero_imaginary_never_nan() {
        let points = logspace(c(1e-3, 0.0), c(1e3, 0.0), 13, 1).unwrap();
        assert_eq!(points.len(), 13);
        assert!(points.iter().all(|p| p.im == 0.0 && p.re.is_finite()));
    }

    #[test]
    fn test_logspace_complex_grid() {
        let points = logspace(c(1.0, 1.0), c(100.0, 10.0), 3, 2).unwrap();
        assert_eq!(points.len(), 6);
        assert!((points[0].im - 1.0).abs() < 1e-12);
        assert!((points[1].im - 10.0).abs() < 1e-12);
        assert!((points[2].re - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_logspace_rejects_non_positive_real_endpoint() {
        let err = logspace(c(0.0, 0.0), c(10.0, 0.0), 3, 1).unwrap_err();
        assert!(matches!(err, ConfigError::LogDomain { axis: "real", .. }));

        let err = logspace(c(-1.0, 0.0), c(10.0, 0.0), 3, 1).unwrap_err();
        assert!(matches!(err, ConfigError::LogDomain { axis: "real", .. }));
    }

    #[test]
    fn test_logspace_rejects_zero_imaginary_with_several_points() {
        let err = logspace(c(1.0, 0.0), c(10.0, 5.0), 3, 2).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::LogDomain {
                axis: "imaginary",
                ..
            }
        ));
    }

    #[test]
    fn test_sample_display() {
        assert_eq!(SampleDisplay(c(1.23456, 0.0)).to_string(), "1.235");
        assert_eq!(SampleDisplay(c(2.0, 0.5)).to_string(), "2 + 0.5i");
        assert_eq!(SampleDisplay(c(0.0, -3.0)).to_string(), "0 + -3i");
    }
}
