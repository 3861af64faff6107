//! Cultural update rules.
//!
//! Two rules, one per culture representation:
//!
//! - **Trait adoption** ([`adopt_features`]) for discrete feature vectors.
//!   Interaction happens with probability equal to similarity, and changes at
//!   most one feature of the receiving agent.
//! - **Relative agreement** ([`relative_agreement`]) for continuous opinions
//!   with uncertainty. Only the overlapping part of two intervals exerts
//!   influence.

use echo_types::{FeatureVector, Opinion};
use rand::Rng;

/// Similarity at or above which two feature vectors no longer interact.
pub const CONVERGED_SIMILARITY: f64 = 0.99;

/// Roll a die: `true` with probability `p`.
///
/// Values outside `[0, 1]` saturate (`p <= 0` never fires, `p >= 1` always
/// does) instead of panicking.
pub fn roll<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    rng.random::<f64>() < p
}

/// Draw a uniformly random trait value in `[0, trait_count)`.
fn random_trait<R: Rng + ?Sized>(rng: &mut R, trait_count: u32) -> u32 {
    if trait_count == 0 {
        return 0;
    }
    rng.random_range(0..trait_count)
}

// ---------------------------------------------------------------------------
// Trait adoption
// ---------------------------------------------------------------------------

/// Let `own` adopt one trait from `other`.
///
/// Nothing happens when the vectors are already (nearly) identical, or when
/// a uniform draw exceeds their similarity. Otherwise the first position in
/// which they differ is rewritten:
///
/// - with `transmission_error` enabled, with probability `1 - similarity` a
///   random trait is written instead of the partner's;
/// - otherwise the partner's trait is copied with probability
///   `understanding`, and a random trait is written when the copy fails.
///
/// Returns whether `own` changed.
pub fn adopt_features<R: Rng + ?Sized>(
    own: &mut FeatureVector,
    other: &FeatureVector,
    trait_count: u32,
    understanding: f64,
    transmission_error: bool,
    rng: &mut R,
) -> bool {
    let similarity = own.similarity(other);
    if similarity >= CONVERGED_SIMILARITY {
        return false;
    }
    if rng.random::<f64>() > similarity {
        return false;
    }
    let Some(position) = own.first_mismatch(other) else {
        return false;
    };

    let garbled = transmission_error && roll(rng, 1.0 - similarity);
    let value = if !garbled && roll(rng, understanding) {
        match other.get(position) {
            Some(v) => v,
            None => return false,
        }
    } else {
        random_trait(rng, trait_count)
    };
    own.set(position, value)
}

// ---------------------------------------------------------------------------
// Relative agreement
// ---------------------------------------------------------------------------

/// Result of applying relative agreement to one side of a pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpinionUpdate {
    /// The opinion after the update (unchanged if no influence applied).
    pub opinion: Opinion,
    /// Whether the overlap exceeded the agent's uncertainty.
    pub influenced: bool,
}

/// One-sided relative agreement: move `own` toward `other`.
///
/// With `H` the overlap of the two intervals, `own` is influenced only when
/// `H > own.uncertainty`; then with `RA = H / own.uncertainty - 1` both
/// position and uncertainty move by `mu * RA` of the distance to `other`.
pub fn relative_agreement_toward(own: Opinion, other: Opinion, mu: f64) -> OpinionUpdate {
    let overlap = own.overlap(&other);
    if own.uncertainty <= 0.0 || overlap <= own.uncertainty {
        return OpinionUpdate {
            opinion: own,
            influenced: false,
        };
    }
    let agreement = overlap / own.uncertainty - 1.0;
    let factor = mu * agreement;
    OpinionUpdate {
        opinion: Opinion {
            position: own.position + factor * (other.position - own.position),
            uncertainty: own.uncertainty + factor * (other.uncertainty - own.uncertainty),
        },
        influenced: true,
    }
}

/// Symmetric relative agreement between `i` and `j`.
///
/// Both updates are computed from the pre-update values, so the order of
/// the pair does not matter.
pub fn relative_agreement(i: Opinion, j: Opinion, mu: f64) -> (OpinionUpdate, OpinionUpdate) {
    (
        relative_agreement_toward(i, j, mu),
        relative_agreement_toward(j, i, mu),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    /// Rng whose every draw is zero: uniform floats come out as `0.0`, so
    /// every probability check with `p > 0` succeeds.
    struct ZeroRng;

    impl rand::RngCore for ZeroRng {
        fn next_u32(&mut self) -> u32 {
            0
        }
        fn next_u64(&mut self) -> u64 {
            0
        }
        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(0);
        }
    }

    fn fv(values: &[u32]) -> FeatureVector {
        FeatureVector::new(values.to_vec()).unwrap()
    }

    #[test]
    fn adopts_first_mismatch_from_partner() {
        let mut own = fv(&[0, 1, 2, 3, 4]);
        let other = fv(&[0, 1, 2, 3, 0]);
        assert!((own.similarity(&other) - 0.8).abs() < 1e-12);

        let changed = adopt_features(&mut own, &other, 5, 1.0, false, &mut ZeroRng);
        assert!(changed);
        assert_eq!(own.values(), &[0, 1, 2, 3, 0]);
    }

    #[test]
    fn transmission_error_garbles_the_copied_trait() {
        let other = fv(&[0, 1, 2, 3, 3]);

        let mut faithful = fv(&[0, 1, 2, 3, 4]);
        assert!(adopt_features(&mut faithful, &other, 5, 1.0, false, &mut ZeroRng));
        assert_eq!(faithful.values(), &[0, 1, 2, 3, 3]);

        // ZeroRng always garbles and always draws trait 0.
        let mut garbled = fv(&[0, 1, 2, 3, 4]);
        assert!(adopt_features(&mut garbled, &other, 5, 1.0, true, &mut ZeroRng));
        assert_eq!(garbled.values(), &[0, 1, 2, 3, 0]);
    }

    #[test]
    fn identical_vectors_never_interact() {
        let mut own = fv(&[1, 2, 3]);
        let other = own.clone();
        assert!(!adopt_features(&mut own, &other, 5, 1.0, false, &mut ZeroRng));
    }

    #[test]
    fn nearly_identical_vectors_count_as_converged() {
        let mut values = vec![1_u32; 200];
        let other = fv(&values);
        if let Some(last) = values.last_mut() {
            *last = 0;
        }
        let mut own = fv(&values);
        let similarity = own.similarity(&other);
        assert!(similarity >= CONVERGED_SIMILARITY && similarity < 1.0);

        // ZeroRng would pass every other roll, so only the threshold stops it.
        assert!(!adopt_features(&mut own, &other, 5, 1.0, false, &mut ZeroRng));
        assert!(!adopt_features(&mut own, &other, 5, 1.0, true, &mut ZeroRng));
        assert_eq!(own.values(), values.as_slice());
    }

    #[test]
    fn dissimilar_vectors_never_interact() {
        let mut own = fv(&[1, 1, 1]);
        let other = fv(&[2, 2, 2]);
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..100 {
            assert!(!adopt_features(&mut own, &other, 5, 1.0, false, &mut rng));
        }
        assert_eq!(own.values(), &[1, 1, 1]);
    }

    #[test]
    fn adoption_changes_at_most_one_feature() {
        let mut rng = SmallRng::seed_from_u64(42);
        let other = fv(&[4, 4, 4, 4, 4, 4]);
        for _ in 0..200 {
            let mut own = fv(&[4, 4, 0, 1, 2, 3]);
            let before = own.clone();
            adopt_features(&mut own, &other, 5, 0.5, true, &mut rng);
            let differences = own
                .values()
                .iter()
                .zip(before.values())
                .filter(|(a, b)| a != b)
                .count();
            assert!(differences <= 1);
        }
    }

    #[test]
    fn relative_agreement_pair_matches_closed_form() {
        let i = Opinion::new(0.2, 0.3).unwrap();
        let j = Opinion::new(0.6, 0.4).unwrap();
        let mu = 0.3;

        let h = (i.position + i.uncertainty).min(j.position + j.uncertainty)
            - (i.position - i.uncertainty).max(j.position - j.uncertainty);
        assert!((h - 0.3).abs() < 1e-9);

        let expected = |a: Opinion, b: Opinion| {
            if h > a.uncertainty {
                let ra = h / a.uncertainty - 1.0;
                (
                    a.position + mu * ra * (b.position - a.position),
                    a.uncertainty + mu * ra * (b.uncertainty - a.uncertainty),
                )
            } else {
                (a.position, a.uncertainty)
            }
        };

        let (ui, uj) = relative_agreement(i, j, mu);
        let (xi, ei) = expected(i, j);
        let (xj, ej) = expected(j, i);
        assert!((ui.opinion.position - xi).abs() < 1e-9);
        assert!((ui.opinion.uncertainty - ei).abs() < 1e-9);
        assert!((uj.opinion.position - xj).abs() < 1e-9);
        assert!((uj.opinion.uncertainty - ej).abs() < 1e-9);

        // H does not exceed j's uncertainty, so j is untouched.
        assert!(!uj.influenced);
        assert_eq!(uj.opinion, j);
    }

    #[test]
    fn disjoint_opinions_do_not_influence() {
        let i = Opinion::new(-0.8, 0.1).unwrap();
        let j = Opinion::new(0.8, 0.1).unwrap();
        let (ui, uj) = relative_agreement(i, j, 0.5);
        assert!(!ui.influenced);
        assert!(!uj.influenced);
    }

    #[test]
    fn uncertainty_stays_within_pair_range() {
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..500 {
            let i = Opinion::new(rng.random_range(-1.0..1.0), rng.random_range(0.01..1.0)).unwrap();
            let j = Opinion::new(rng.random_range(-1.0..1.0), rng.random_range(0.01..1.0)).unwrap();
            let mu = rng.random_range(0.0..=1.0);
            let low = i.uncertainty.min(j.uncertainty) - 1e-12;
            let high = i.uncertainty.max(j.uncertainty) + 1e-12;
            let (ui, uj) = relative_agreement(i, j, mu);
            for update in [ui, uj] {
                assert!(update.opinion.uncertainty >= low);
                assert!(update.opinion.uncertainty <= high);
            }
        }
    }

    #[test]
    fn roll_saturates() {
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(!roll(&mut rng, 0.0));
        assert!(!roll(&mut rng, -1.0));
        assert!(roll(&mut rng, 1.0));
        assert!(roll(&mut rng, 2.0));
    }
}
