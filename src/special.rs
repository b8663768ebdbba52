//! Special functions backing the Student-t distribution and the KDE overlay
//!
//! - `ln_gamma`: Lanczos approximation (g = 7, n = 9)
//! - `regularized_incomplete_beta`: continued fraction evaluated with the
//!   modified Lentz method (Numerical Recipes 3rd ed., §6.4)
//! - `t_cdf` / `t_two_tailed_p`: Student-t via I_x(df/2, 1/2)
//! - `standard_normal_pdf`: Gaussian kernel

use std::f64::consts::PI;

const LANCZOS_G: f64 = 7.0;

#[allow(clippy::excessive_precision)]
const LANCZOS_COEFFICIENTS: [f64; 9] = [
    0.99999999999980993,
    676.5203681218851,
    -1259.1392167224028,
    771.32342877765313,
    -176.61502916214059,
    12.507343278686905,
    -0.13857109526572012,
    9.9843695780195716e-6,
    1.5056327351493116e-7,
];

/// Natural log of the gamma function
///
/// Uses the reflection formula below 0.5.
pub fn ln_gamma(x: f64) -> f64 {
    if x < 0.5 {
        return (PI / (PI * x).sin()).ln() - ln_gamma(1.0 - x);
    }

    let x = x - 1.0;
    let series = LANCZOS_COEFFICIENTS[1..]
        .iter()
        .enumerate()
        .fold(LANCZOS_COEFFICIENTS[0], |acc, (i, &c)| {
            acc + c / (x + i as f64 + 1.0)
        });

    let t = x + LANCZOS_G + 0.5;
    0.5 * (2.0 * PI).ln() + (x + 0.5) * t.ln() - t + series.ln()
}

/// ln B(a, b)
pub fn ln_beta(a: f64, b: f64) -> f64 {
    ln_gamma(a) + ln_gamma(b) - ln_gamma(a + b)
}

/// Regularized incomplete beta function I_x(a, b)
///
/// Clamps to 0 for `x <= 0` and to 1 for `x >= 1`. Swaps to
/// `1 - I_{1-x}(b, a)` past the mean so the continued fraction converges
/// quickly.
pub fn regularized_incomplete_beta(x: f64, a: f64, b: f64) -> f64 {
    if x.is_nan() || a.is_nan() || b.is_nan() {
        return f64::NAN;
    }
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    if x > (a + 1.0) / (a + b + 2.0) {
        return 1.0 - regularized_incomplete_beta(1.0 - x, b, a);
    }

    let ln_front = a * x.ln() + b * (1.0 - x).ln() - ln_beta(a, b);
    ln_front.exp() * beta_continued_fraction(x, a, b) / a
}

fn beta_continued_fraction(x: f64, a: f64, b: f64) -> f64 {
    const MAX_ITERATIONS: usize = 300;
    const EPSILON: f64 = 1e-15;
    const FLOOR: f64 = 1e-300;

    let guard = |v: f64| if v.abs() < FLOOR { FLOOR } else { v };

    let mut c = 1.0;
    let mut d = 1.0 / guard(1.0 - (a + b) * x / (a + 1.0));
    let mut h = d;

    for m in 1..=MAX_ITERATIONS {
        let m = m as f64;
        let two_m = 2.0 * m;

        let even = m * (b - m) * x / ((a + two_m - 1.0) * (a + two_m));
        d = 1.0 / guard(1.0 + even * d);
        c = guard(1.0 + even / c);
        h *= d * c;

        let odd = -(a + m) * (a + b + m) * x / ((a + two_m) * (a + two_m + 1.0));
        d = 1.0 / guard(1.0 + odd * d);
        c = guard(1.0 + odd / c);
        let delta = d * c;
        h *= delta;

        if (delta - 1.0).abs() < EPSILON {
            break;
        }
    }

    h
}

/// CDF of Student's t-distribution with `df` degrees of freedom
///
/// Returns NaN when `df <= 0` or either argument is NaN.
pub fn t_cdf(t: f64, df: f64) -> f64 {
    if t.is_nan() || df.is_nan() || df <= 0.0 {
        return f64::NAN;
    }
    if t == f64::INFINITY {
        return 1.0;
    }
    if t == f64::NEG_INFINITY {
        return 0.0;
    }

    let tail = 0.5 * regularized_incomplete_beta(df / (df + t * t), df / 2.0, 0.5);
    if t >= 0.0 {
        1.0 - tail
    } else {
        tail
    }
}

/// Two-tailed p-value P(|T| >= |t|)
///
/// Computed directly from I_x rather than `2 * (1 - cdf)` to keep precision
/// in the far tail.
pub fn t_two_tailed_p(t: f64, df: f64) -> f64 {
    if t.is_nan() || df.is_nan() || df <= 0.0 {
        return f64::NAN;
    }
    if t.is_infinite() {
        return 0.0;
    }
    regularized_incomplete_beta(df / (df + t * t), df / 2.0, 0.5).clamp(0.0, 1.0)
}

/// φ(x) = exp(-x²/2) / √(2π)
pub fn standard_normal_pdf(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_normal_pdf() {
        assert!((standard_normal_pdf(0.0) - 0.398_942_280_401_432_7).abs() < 1e-15);
        assert_eq!(standard_normal_pdf(1.5), standard_normal_pdf(-1.5));
        assert!(standard_normal_pdf(40.0) < 1e-300);
        assert!(standard_normal_pdf(f64::NAN).is_nan());
    }

    #[test]
    fn test_ln_gamma_factorials() {
        // Γ(n) = (n-1)!
        assert!((ln_gamma(1.0)).abs() < 1e-12);
        assert!((ln_gamma(5.0) - 24.0_f64.ln()).abs() < 1e-12);
        assert!((ln_gamma(11.0) - 3_628_800.0_f64.ln()).abs() < 1e-10);
    }

    #[test]
    fn test_ln_gamma_half() {
        // Γ(1/2) = √π
        assert!((ln_gamma(0.5) - PI.sqrt().ln()).abs() < 1e-12);
    }

    #[test]
    fn test_incomplete_beta_bounds() {
        assert_eq!(regularized_incomplete_beta(0.0, 2.0, 3.0), 0.0);
        assert_eq!(regularized_incomplete_beta(1.0, 2.0, 3.0), 1.0);
        assert!((regularized_incomplete_beta(0.5, 1.0, 1.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_incomplete_beta_closed_form() {
        // I_x(1, b) = 1 - (1-x)^b
        let x: f64 = 0.3;
        let expected = 1.0 - (1.0 - x).powi(4);
        assert!((regularized_incomplete_beta(x, 1.0, 4.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_t_cdf_symmetry() {
        for &t in &[0.5, 1.0, 2.5, 4.0] {
            let lower = t_cdf(-t, 7.0);
            let upper = t_cdf(t, 7.0);
            assert!((lower + upper - 1.0).abs() < 1e-12);
        }
        assert!((t_cdf(0.0, 3.0) - 0.5).abs() < 1e-15);
    }

    #[test]
    fn test_t_cdf_cauchy() {
        // df = 1 is the Cauchy distribution: F(t) = 1/2 + atan(t)/π
        for &t in &[-3.0_f64, -0.5, 0.7, 2.0] {
            let expected = 0.5 + t.atan() / PI;
            assert!((t_cdf(t, 1.0) - expected).abs() < 1e-10);
        }
    }

    #[test]
    fn test_t_critical_values() {
        // Two-tailed 5% critical values from standard tables
        assert!((t_two_tailed_p(2.093, 19.0) - 0.05).abs() < 1e-3);
        assert!((t_two_tailed_p(2.228, 10.0) - 0.05).abs() < 1e-3);
        assert!((t_two_tailed_p(12.706, 1.0) - 0.05).abs() < 1e-3);
    }

    #[test]
    fn test_two_tailed_p_at_zero() {
        assert_eq!(t_two_tailed_p(0.0, 19.0), 1.0);
        assert_eq!(t_two_tailed_p(f64::INFINITY, 19.0), 0.0);
    }

    #[test]
    fn test_invalid_degrees_of_freedom() {
        assert!(t_cdf(1.0, 0.0).is_nan());
        assert!(t_two_tailed_p(1.0, -1.0).is_nan());
    }
}
