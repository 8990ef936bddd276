use crate::complex::Complex;
use crate::fractal::{check_max_iterations, escape_time, EscapeTime, Fractal};

/// The Mandelbrot set: `z_{n+1} = z_n² + c`, starting from `z₀ = 0`.
///
/// The pixel's coordinate is `c`.
#[derive(Debug, Clone)]
pub struct Mandelbrot {
    max_iterations: u32,
}

impl Mandelbrot {
    pub fn new(max_iterations: u32) -> crate::Result<Self> {
        Ok(Self {
            max_iterations: check_max_iterations(max_iterations)?,
        })
    }
}

impl Fractal for Mandelbrot {
    #[inline]
    fn iterate(&self, c: Complex) -> EscapeTime {
        escape_time(Complex::ZERO, c, self.max_iterations)
    }

    fn max_iterations(&self) -> u32 {
        self.max_iterations
    }
}
