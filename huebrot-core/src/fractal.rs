use crate::complex::Complex;
use crate::error::CoreError;

/// Squared escape radius: an orbit with `|z| > 2` is guaranteed to diverge.
pub const ESCAPE_RADIUS_SQ: f64 = 4.0;

/// The outcome of iterating a single point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeTime {
    /// `|z|` exceeded the escape radius at iteration `n`.
    Escaped(u32),

    /// The orbit stayed within the escape radius for the whole budget.
    NoEscape,
}

impl EscapeTime {
    /// Iteration count, or `None` for points that never escaped.
    #[inline]
    pub fn iterations(self) -> Option<u32> {
        match self {
            Self::Escaped(n) => Some(n),
            Self::NoEscape => None,
        }
    }

    #[inline]
    pub fn escaped(self) -> bool {
        matches!(self, Self::Escaped(_))
    }
}

/// Escape-time iteration of `z_{n+1} = z_n² + c` from `z0`.
///
/// The escape test runs before each update, so a `z0` already outside the
/// radius escapes at iteration 0. Returns [`EscapeTime::NoEscape`] when the
/// orbit survives `max_iterations` tests.
#[inline]
pub fn escape_time(z0: Complex, c: Complex, max_iterations: u32) -> EscapeTime {
    let (mut re, mut im) = (z0.re, z0.im);
    let (mut re2, mut im2) = (re * re, im * im);

    for n in 0..max_iterations {
        if re2 + im2 > ESCAPE_RADIUS_SQ {
            return EscapeTime::Escaped(n);
        }
        im = 2.0 * re * im + c.im;
        re = re2 - im2 + c.re;
        re2 = re * re;
        im2 = im * im;
    }

    EscapeTime::NoEscape
}

/// Reject an empty iteration budget.
pub fn check_max_iterations(max_iterations: u32) -> crate::Result<u32> {
    if max_iterations < 1 {
        return Err(CoreError::InvalidMaxIterations(max_iterations));
    }
    Ok(max_iterations)
}

/// Trait implemented by both recurrences.
///
/// Renderers should be generic over `F: Fractal` so the iteration call is
/// statically dispatched and inlined into the per-pixel loop.
pub trait Fractal {
    /// Iterate the pixel whose complex-plane coordinate is `point`.
    fn iterate(&self, point: Complex) -> EscapeTime;

    /// The iteration budget.
    fn max_iterations(&self) -> u32;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_outside_radius_escapes_at_zero() {
        for z0 in [
            Complex::new(2.5, 0.0),
            Complex::new(0.0, -2.01),
            Complex::new(1.5, 1.5),
            Complex::new(-10.0, 3.0),
        ] {
            for budget in [1, 10, 1000] {
                assert_eq!(
                    escape_time(z0, Complex::new(0.3, -0.2), budget),
                    EscapeTime::Escaped(0)
                );
            }
        }
    }

    #[test]
    fn origin_with_zero_c_never_escapes() {
        assert_eq!(
            escape_time(Complex::ZERO, Complex::ZERO, 500),
            EscapeTime::NoEscape
        );
    }

    #[test]
    fn known_counts() {
        // c = 0.5: 0, 0.5, 0.75, 1.0625, 1.6289, 3.1533 → escapes at n = 5
        assert_eq!(
            escape_time(Complex::ZERO, Complex::new(0.5, 0.0), 10),
            EscapeTime::Escaped(5)
        );
        // c = 1: 0, 1, 2, 5 → |2|² = 4 is not > 4, so n = 3
        assert_eq!(
            escape_time(Complex::ZERO, Complex::new(1.0, 0.0), 10),
            EscapeTime::Escaped(3)
        );
    }

    #[test]
    fn budget_is_the_number_of_escape_tests() {
        let c = Complex::new(0.5, 0.0);
        assert_eq!(escape_time(Complex::ZERO, c, 5), EscapeTime::NoEscape);
        assert_eq!(escape_time(Complex::ZERO, c, 6), EscapeTime::Escaped(5));
    }

    #[test]
    fn zero_budget_never_escapes() {
        assert_eq!(
            escape_time(Complex::new(9.0, 9.0), Complex::ZERO, 0),
            EscapeTime::NoEscape
        );
    }

    #[test]
    fn iterations_accessor() {
        assert_eq!(EscapeTime::Escaped(7).iterations(), Some(7));
        assert_eq!(EscapeTime::NoEscape.iterations(), None);
        assert!(EscapeTime::Escaped(0).escaped());
        assert!(!EscapeTime::NoEscape.escaped());
    }

    #[test]
    fn max_iterations_check() {
        assert_eq!(check_max_iterations(0), Err(CoreError::InvalidMaxIterations(0)));
        assert_eq!(check_max_iterations(100), Ok(100));
    }
}
