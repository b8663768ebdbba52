//! Sampling distributions used by the dataset generator
//!
//! Poisson sampling follows the approach of most numeric libraries:
//! - λ < 10: sequential search inversion (one uniform per draw)
//! - λ >= 10: Hörmann's PTRS transformed rejection with squeeze
//!   (Hörmann 1993, "The transformed rejection method for generating
//!   Poisson random variables")

use crate::error::{InsightsError, Result};
use crate::special::ln_gamma;
use rand::Rng;

/// Crossover between inversion and transformed rejection
const INVERSION_LIMIT: f64 = 10.0;

/// Poisson distribution with rate λ
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Poisson {
    lambda: f64,
    method: PoissonMethod,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PoissonMethod {
    Inversion {
        exp_neg_lambda: f64,
    },
    Ptrs {
        ln_lambda: f64,
        a: f64,
        b: f64,
        inv_alpha: f64,
        v_r: f64,
    },
}

impl Poisson {
    /// Create a Poisson distribution
    ///
    /// # Errors
    /// `InvalidConfiguration` when λ is not a finite positive number.
    pub fn new(lambda: f64) -> Result<Self> {
        if !lambda.is_finite() || lambda <= 0.0 {
            return Err(InsightsError::invalid(format!(
                "Poisson rate must be finite and > 0, got {lambda}"
            )));
        }

        let method = if lambda < INVERSION_LIMIT {
            PoissonMethod::Inversion {
                exp_neg_lambda: (-lambda).exp(),
            }
        } else {
            let b = 0.931 + 2.53 * lambda.sqrt();
            PoissonMethod::Ptrs {
                ln_lambda: lambda.ln(),
                a: -0.059 + 0.024_83 * b,
                b,
                inv_alpha: 1.1239 + 1.1328 / (b - 3.4),
                v_r: 0.9277 - 3.6224 / (b - 2.0),
            }
        };

        Ok(Self { lambda, method })
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Mean and variance are both λ
    pub fn mean(&self) -> f64 {
        self.lambda
    }

    pub fn variance(&self) -> f64 {
        self.lambda
    }

    /// Draw one non-negative count
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        match self.method {
            PoissonMethod::Inversion { exp_neg_lambda } => {
                self.sample_inversion(exp_neg_lambda, rng)
            }
            PoissonMethod::Ptrs {
                ln_lambda,
                a,
                b,
                inv_alpha,
                v_r,
            } => self.sample_ptrs(ln_lambda, a, b, inv_alpha, v_r, rng),
        }
    }

    fn sample_inversion<R: Rng + ?Sized>(&self, exp_neg_lambda: f64, rng: &mut R) -> u64 {
        let u: f64 = rng.gen();
        let mut k = 0u64;
        let mut p = exp_neg_lambda;
        let mut cdf = p;

        // p shrinks geometrically past the mode; the p > 0 guard stops
        // the walk if rounding leaves cdf just below u
        while u > cdf && p > 0.0 {
            k += 1;
            p *= self.lambda / k as f64;
            cdf += p;
        }
        k
    }

    fn sample_ptrs<R: Rng + ?Sized>(
        &self,
        ln_lambda: f64,
        a: f64,
        b: f64,
        inv_alpha: f64,
        v_r: f64,
        rng: &mut R,
    ) -> u64 {
        loop {
            let u: f64 = rng.gen::<f64>() - 0.5;
            let v: f64 = rng.gen();
            let us = 0.5 - u.abs();
            let k = ((2.0 * a / us + b) * u + self.lambda + 0.43).floor();

            // Squeeze: accept without evaluating the density
            if us >= 0.07 && v <= v_r {
                return k as u64;
            }

            if k < 0.0 || (us < 0.013 && v > us) {
                continue;
            }

            let lhs = v.ln() + inv_alpha.ln() - (a / (us * us) + b).ln();
            let rhs = -self.lambda + k * ln_lambda - ln_gamma(k + 1.0);
            if lhs <= rhs {
                return k as u64;
            }
        }
    }
}
