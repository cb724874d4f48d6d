//! Scalar types and helpers shared by every time series in the model.
//!
//! All series are dense, aligned on the same period index `t = 0..nt` and stored as
//! [`ndarray::Array1`]. There is no interpolation; period `t` covers
//! `tstep` years starting at the `t`-th point of the time axis.

use ndarray::Array1;

pub type FloatValue = f64;
pub type Time = f64;

/// A fixed-length series aligned on the model periods.
pub type Series = Array1<FloatValue>;

/// Conversion factor from tonnes of CO2 to tonnes of carbon (44/12).
pub const CO2_PER_C: FloatValue = 3.666;

/// Linearly spaced values from `start` to `end` inclusive.
///
/// Returns an empty series for `n == 0` and `[start]` for `n == 1`.
pub fn linspace(start: Time, end: Time, n: usize) -> Series {
    match n {
        0 => Array1::zeros(0),
        1 => Array1::from_elem(1, start),
        _ => Array1::linspace(start, end, n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linspace_endpoints() {
        let axis = linspace(2000.0, 2500.0, 100);
        assert_eq!(axis.len(), 100);
        assert_relative_eq!(axis[0], 2000.0);
        assert_relative_eq!(axis[99], 2500.0);
    }

    #[test]
    fn test_linspace_degenerate() {
        assert_eq!(linspace(1.0, 2.0, 0).len(), 0);
        assert_eq!(linspace(1.0, 2.0, 1).to_vec(), vec![1.0]);
    }
}
