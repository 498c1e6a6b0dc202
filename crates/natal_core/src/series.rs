//! Periodic-series evaluation in the VSOP87 form.
//!
//! A coordinate is Σ_k τ^k · Σ_i A_i cos(B_i + C_i τ), with one term table
//! per power of τ.

/// One `[A, B, C]` term: amplitude, phase (rad), frequency (rad per τ unit).
pub type Term = [f64; 3];

/// Sum of A cos(B + C τ) over one table.
pub fn sum_terms(terms: &[Term], tau: f64) -> f64 {
    terms.iter().map(|[a, b, c]| a * (b + c * tau).cos()).sum()
}

/// Evaluate a series given as tables for τ⁰, τ¹, τ², …
pub fn evaluate(series: &[&[Term]], tau: f64) -> f64 {
    series
        .iter()
        .rev()
        .fold(0.0, |acc, terms| acc * tau + sum_terms(terms, tau))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_term_only() {
        let s0: &[Term] = &[[5.0, 0.0, 0.0]];
        assert_eq!(evaluate(&[s0], 123.0), 5.0);
    }

    #[test]
    fn powers_of_tau() {
        let s0: &[Term] = &[[1.0, 0.0, 0.0]];
        let s1: &[Term] = &[[2.0, 0.0, 0.0]];
        let s2: &[Term] = &[[3.0, 0.0, 0.0]];
        // 1 + 2τ + 3τ²
        assert!((evaluate(&[s0, s1, s2], 2.0) - 17.0).abs() < 1e-12);
    }

    #[test]
    fn periodic_argument() {
        let s0: &[Term] = &[[2.0, std::f64::consts::FRAC_PI_2, 0.0]];
        assert!(evaluate(&[s0], 0.0).abs() < 1e-12);
    }
}
