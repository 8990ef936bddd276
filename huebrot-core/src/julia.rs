use crate::complex::Complex;
use crate::fractal::{check_max_iterations, escape_time, EscapeTime, Fractal};

/// A Julia set: `z_{n+1} = z_n² + c`, where `c` is the fixed seed and the
/// pixel's coordinate is `z₀`.
#[derive(Debug, Clone)]
pub struct Julia {
    seed: Complex,
    max_iterations: u32,
}

impl Julia {
    pub fn new(seed: Complex, max_iterations: u32) -> crate::Result<Self> {
        Ok(Self {
            seed,
            max_iterations: check_max_iterations(max_iterations)?,
        })
    }

    /// The constant `c` defining this Julia set.
    pub fn seed(&self) -> Complex {
        self.seed
    }
}

impl Fractal for Julia {
    #[inline]
    fn iterate(&self, z0: Complex) -> EscapeTime {
        escape_time(z0, self.seed, self.max_iterations)
    }

    fn max_iterations(&self) -> u32 {
        self.max_iterations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mandelbrot::Mandelbrot;

    #[test]
    fn point_outside_radius_escapes_immediately() {
        let j = Julia::new(Complex::new(-0.7, 0.27), 100).unwrap();
        assert_eq!(j.iterate(Complex::new(3.0, 0.0)), EscapeTime::Escaped(0));
    }

    #[test]
    fn zero_seed_unit_disk_is_bounded() {
        // c = 0: z ↦ z², so |z₀| < 1 stays bounded.
        let j = Julia::new(Complex::ZERO, 200).unwrap();
        assert_eq!(j.iterate(Complex::new(0.5, 0.0)), EscapeTime::NoEscape);
        assert_eq!(j.iterate(Complex::ZERO), EscapeTime::NoEscape);
    }

    #[test]
    fn zero_seed_known_count() {
        // 1.5 → 2.25 → escapes on the second test.
        let j = Julia::new(Complex::ZERO, 50).unwrap();
        assert_eq!(j.iterate(Complex::new(1.5, 0.0)), EscapeTime::Escaped(1));
    }

    #[test]
    fn roles_of_point_and_seed_differ() {
        // Mandelbrot at c = p versus Julia seeded with p at z₀ = p.
        let p = Complex::new(-1.5, -1.5);
        let m = Mandelbrot::new(10).unwrap();
        let j = Julia::new(Complex::ZERO, 10).unwrap();
        assert_eq!(m.iterate(p), EscapeTime::Escaped(1));
        assert_eq!(j.iterate(p), EscapeTime::Escaped(0));
    }

    #[test]
    fn seed_accessor() {
        let seed = Complex::new(0.3, 0.0);
        assert_eq!(Julia::new(seed, 10).unwrap().seed(), seed);
    }

    #[test]
    fn zero_budget_rejected() {
        assert!(Julia::new(Complex::ZERO, 0).is_err());
    }
}
