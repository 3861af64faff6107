//! Distribution samplers.
//!
//! Thin constructors over `rand` and `rand_distr` so callers never have to
//! deal with the distribution crates' own error types.

use rand::Rng;
use rand_distr::{Beta, Normal};

use crate::prior::PriorError;

/// A uniform draw in `[0, 1)`.
pub fn uniform<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.random::<f64>()
}

/// A uniform draw in `[min, max]`. Returns `min` when the range is empty.
pub fn uniform_in<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    if max <= min {
        return min;
    }
    rng.random_range(min..=max)
}

/// A Beta(`alpha`, `beta`) distribution.
///
/// # Errors
///
/// Returns [`PriorError::InvalidShape`] unless both shapes are positive and
/// finite.
pub fn beta_sampler(alpha: f64, beta: f64) -> Result<Beta<f64>, PriorError> {
    for (name, value) in [("alpha", alpha), ("beta", beta)] {
        if !(value.is_finite() && value > 0.0) {
            return Err(PriorError::InvalidShape { name, value });
        }
    }
    Beta::new(alpha, beta).map_err(|err| PriorError::Distribution {
        reason: err.to_string(),
    })
}

/// A Normal(`mean`, `std_dev`) distribution.
///
/// # Errors
///
/// Returns [`PriorError::InvalidShape`] for a non-finite mean or a negative
/// or non-finite standard deviation.
pub fn normal_sampler(mean: f64, std_dev: f64) -> Result<Normal<f64>, PriorError> {
    if !mean.is_finite() {
        return Err(PriorError::InvalidShape {
            name: "mean",
            value: mean,
        });
    }
    if !(std_dev.is_finite() && std_dev >= 0.0) {
        return Err(PriorError::InvalidShape {
            name: "std_dev",
            value: std_dev,
        });
    }
    Normal::new(mean, std_dev).map_err(|err| PriorError::Distribution {
        reason: err.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use rand_distr::Distribution;

    #[test]
    fn uniform_draws_stay_in_range() {
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..1000 {
            let u = uniform(&mut rng);
            assert!((0.0..1.0).contains(&u));
            let v = uniform_in(&mut rng, 2.5, 15.0);
            assert!((2.5..=15.0).contains(&v));
        }
        assert!((uniform_in(&mut rng, 3.0, 3.0) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn beta_draws_are_probabilities() {
        let mut rng = SmallRng::seed_from_u64(2);
        let beta = beta_sampler(2.0, 5.0).unwrap();
        for _ in 0..1000 {
            let x = beta.sample(&mut rng);
            assert!((0.0..=1.0).contains(&x));
        }
    }

    #[test]
    fn invalid_shapes_are_rejected() {
        assert!(matches!(
            beta_sampler(0.0, 1.0),
            Err(PriorError::InvalidShape { name: "alpha", .. })
        ));
        assert!(matches!(
            beta_sampler(1.0, -2.0),
            Err(PriorError::InvalidShape { name: "beta", .. })
        ));
        assert!(normal_sampler(0.0, -1.0).is_err());
        assert!(normal_sampler(f64::NAN, 1.0).is_err());
        assert!(normal_sampler(0.5, 0.1).is_ok());
    }
}
