use crate::Real;
use rand::Rng;

/// Expected flows below this value are sampled as a sum of Bernoulli trials.
/// Larger flows are rounded to the nearest integer.
pub const SMALL_FLOW_THRESHOLD: Real = 10.0;

/// Number of Bernoulli trials used to sample a small expected flow.
///
/// `ceil(10 * e + eps)` with `e` taken at single precision and `eps` the
/// single precision machine epsilon: at least one trial, and a probability
/// of success `e / m` below 0.1. Whole values of `10 * e` get one extra
/// trial, e.g. `m(2.5) = 26`.
pub fn trial_count(expected: Real) -> usize {
    ((expected as f32) as Real * 10.0 + f32::EPSILON as Real).ceil() as usize
}

/// Round to the nearest integer, ties to even.
pub fn round_half_even(x: Real) -> Real {
    let r = x.round();
    if (r - x).abs() == 0.5 {
        2.0 * (x / 2.0).round()
    } else {
        r
    }
}

/// Sample an integer flow with the given expected value.
///
/// Small flows draw `m` independent Bernoulli trials of probability `e/m`
/// and return the number of successes, so the mean is `e`. Larger flows are
/// deterministic, rounding ties to even. Non-positive expectations
/// yield zero without consuming randomness.
pub fn stochastic_round<R: Rng + ?Sized>(expected: Real, rng: &mut R) -> Real {
    if !(expected > 0.0) {
        return 0.0;
    }
    if expected >= SMALL_FLOW_THRESHOLD {
        return round_half_even(expected);
    }
    let m = trial_count(expected);
    let p = expected / m as Real;
    let mut hits = 0usize;
    for _ in 0..m {
        if rng.gen::<Real>() < p {
            hits += 1;
        }
    }
    hits as Real
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{PointStatsAcc, Stats};
    use assert_approx_eq::assert_approx_eq;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn trial_counts() {
        assert_eq!(trial_count(0.05), 1);
        assert_eq!(trial_count(0.0), 1);
        assert_eq!(trial_count(2.3), 23);
        assert_eq!(trial_count(9.99), 100);
    }

    #[test]
    fn whole_trial_counts_get_an_extra_trial() {
        assert_eq!(trial_count(2.5), 26);
        assert_eq!(trial_count(1.0), 11);
        assert_eq!(trial_count(0.2), 3);
    }

    #[test]
    fn large_flows_are_rounded() {
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(stochastic_round(10.0, &mut rng), 10.0);
        assert_eq!(stochastic_round(12.4, &mut rng), 12.0);
        assert_eq!(stochastic_round(12.5, &mut rng), 12.0);
        assert_eq!(stochastic_round(13.5, &mut rng), 14.0);
        assert_eq!(stochastic_round(12.6, &mut rng), 13.0);
        assert_eq!(stochastic_round(1e6 + 0.7, &mut rng), 1e6 + 1.0);
    }

    #[test]
    fn ties_round_to_even() {
        assert_eq!(round_half_even(0.5), 0.0);
        assert_eq!(round_half_even(1.5), 2.0);
        assert_eq!(round_half_even(2.5), 2.0);
        assert_eq!(round_half_even(4500.5), 4500.0);
        assert_eq!(round_half_even(2.49), 2.0);
        assert_eq!(round_half_even(-2.5), -2.0);
    }

    #[test]
    fn small_flows_are_bounded_integers() {
        let mut rng = SmallRng::seed_from_u64(1);
        for &e in &[0.01, 0.5, 2.3, 7.9] {
            for _ in 0..100 {
                let dx = stochastic_round(e, &mut rng);
                assert_eq!(dx, dx.round());
                assert!(dx >= 0.0 && dx <= trial_count(e) as Real);
            }
        }
    }

    #[test]
    fn non_positive_flows_are_zero() {
        let mut rng = SmallRng::seed_from_u64(2);
        assert_eq!(stochastic_round(0.0, &mut rng), 0.0);
        assert_eq!(stochastic_round(-3.0, &mut rng), 0.0);
    }

    #[test]
    fn small_flows_are_unbiased() {
        let mut rng = SmallRng::seed_from_u64(42);
        for &e in &[0.3, 2.3, 6.0] {
            let mut acc = PointStatsAcc::new();
            for _ in 0..20_000 {
                acc.add(stochastic_round(e, &mut rng));
            }
            assert_approx_eq!(acc.mean(), e, 0.05 * e.max(1.0));
        }
    }

    #[test]
    fn seeded_draws_are_reproducible() {
        let draw = |seed| {
            let mut rng = SmallRng::seed_from_u64(seed);
            (0..50).map(|_| stochastic_round(3.7, &mut rng)).collect::<Vec<_>>()
        };
        assert_eq!(draw(7), draw(7));
    }
}
