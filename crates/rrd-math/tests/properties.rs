//! Property-based tests for the interpolator.
//!
//! Uses proptest to check that construction, range handling, and the search
//! cursor behave across many random sample sets and query orders.

use proptest::prelude::*;
use rrd_math::{scan_value, InterpolationMethod, Interpolator, ValidationError};

/// Same value, treating NaN as equal to NaN.
fn same(a: f64, b: f64) -> bool {
    (a.is_nan() && b.is_nan()) || a == b
}

/// Strictly increasing timestamps (2..=24 samples) with matching values,
/// roughly one in ten of which is unknown.
fn samples() -> impl Strategy<Value = (Vec<i64>, Vec<f64>)> {
    (
        -1_000_000i64..1_000_000,
        prop::collection::vec(1i64..900, 1..24),
    )
        .prop_flat_map(|(start, gaps)| {
            let mut timestamps = Vec::with_capacity(gaps.len() + 1);
            timestamps.push(start);
            for gap in gaps {
                let next = timestamps[timestamps.len() - 1] + gap;
                timestamps.push(next);
            }
            let n = timestamps.len();
            let value = prop_oneof![9 => -1.0e6..1.0e6f64, 1 => Just(f64::NAN)];
            (Just(timestamps), prop::collection::vec(value, n))
        })
}

fn methods() -> impl Strategy<Value = InterpolationMethod> {
    prop_oneof![
        Just(InterpolationMethod::Left),
        Just(InterpolationMethod::Right),
        Just(InterpolationMethod::Linear),
        (3i32..100).prop_map(InterpolationMethod::Unsupported),
    ]
}

/// Samples plus a set of queries spanning slightly beyond the sampled range.
fn samples_with_queries() -> impl Strategy<Value = (Vec<i64>, Vec<f64>, Vec<i64>)> {
    samples().prop_flat_map(|(ts, vs)| {
        let lo = ts[0] - 50;
        let hi = ts[ts.len() - 1] + 50;
        let queries = prop::collection::vec(lo..=hi, 1..64);
        (Just(ts), Just(vs), queries)
    })
}

// ============================================================================
// Construction
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Strictly increasing input of matching length always constructs.
    #[test]
    fn valid_input_constructs((ts, vs) in samples()) {
        prop_assert!(Interpolator::new(ts, vs).is_ok());
    }

    /// Repeating any timestamp makes construction fail.
    #[test]
    fn duplicate_timestamp_rejected((ts, vs) in samples(), pick in any::<prop::sample::Index>()) {
        let mut ts = ts;
        let mut vs = vs;
        let i = pick.index(ts.len());
        ts.insert(i, ts[i]);
        vs.insert(i, 0.0);
        let err = Interpolator::new(ts, vs).unwrap_err();
        let is_order_error = matches!(err, ValidationError::NotIncreasing { .. });
        prop_assert!(is_order_error);
    }

    /// Swapping two adjacent timestamps makes construction fail.
    #[test]
    fn decreasing_pair_rejected((ts, vs) in samples(), pick in any::<prop::sample::Index>()) {
        let mut ts = ts;
        let i = pick.index(ts.len() - 1);
        ts.swap(i, i + 1);
        let is_order_error = matches!(
            Interpolator::new(ts, vs),
            Err(ValidationError::NotIncreasing { .. })
        );
        prop_assert!(is_order_error);
    }

    /// Dropping one value makes construction fail with a length mismatch.
    #[test]
    fn length_mismatch_rejected((ts, vs) in samples()) {
        let mut vs = vs;
        vs.pop();
        let is_length_error = matches!(
            Interpolator::new(ts, vs),
            Err(ValidationError::LengthMismatch { .. })
        );
        prop_assert!(is_length_error);
    }
}

// ============================================================================
// Query semantics
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Queries outside [first, last] are NaN.
    #[test]
    fn outside_range_is_nan((ts, vs) in samples(), method in methods(), delta in 1i64..10_000) {
        let first = ts[0];
        let last = ts[ts.len() - 1];
        let mut ip = Interpolator::new(ts, vs).unwrap();
        ip.set_interpolation_method(method);
        prop_assert!(ip.value_at(first - delta).is_nan());
        prop_assert!(ip.value_at(last + delta).is_nan());
    }

    /// Every sample timestamp returns its own value under every method.
    #[test]
    fn exact_hits_return_sample((ts, vs) in samples(), method in methods()) {
        let ip = Interpolator::new(ts.clone(), vs.clone()).unwrap().with_method(method);
        for (t, v) in ts.iter().zip(vs.iter()) {
            prop_assert!(same(ip.value_at(*t), *v), "at {} expected {}", t, v);
        }
    }

    /// LEFT and RIGHT return one of the bracketing samples; LINEAR stays
    /// between them when both are known.
    #[test]
    fn results_bounded_by_bracket((ts, vs, queries) in samples_with_queries()) {
        for method in [InterpolationMethod::Left, InterpolationMethod::Right, InterpolationMethod::Linear] {
            let ip = Interpolator::new(ts.clone(), vs.clone()).unwrap().with_method(method);
            for q in &queries {
                let Some(i) = ts.windows(2).position(|w| w[0] < *q && *q < w[1]) else {
                    continue;
                };
                let (a, b) = (vs[i], vs[i + 1]);
                let out = ip.value_at(*q);
                match method {
                    InterpolationMethod::Left => prop_assert!(same(out, a)),
                    InterpolationMethod::Right => prop_assert!(same(out, b)),
                    _ if a.is_nan() || b.is_nan() => prop_assert!(out.is_nan()),
                    _ => {
                        let tol = 1e-6 * a.abs().max(b.abs()).max(1.0);
                        prop_assert!(out >= a.min(b) - tol && out <= a.max(b) + tol,
                            "{} not within [{}, {}]", out, a, b);
                    }
                }
            }
        }
    }
}

// ============================================================================
// Cursor never changes results
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Random query order matches the rescan-from-zero reference.
    #[test]
    fn random_order_matches_reference((ts, vs, queries) in samples_with_queries(), method in methods()) {
        let ip = Interpolator::new(ts.clone(), vs.clone()).unwrap().with_method(method);
        for q in &queries {
            let reference = scan_value(&ts, &vs, method, *q);
            prop_assert!(same(ip.value_at(*q), reference), "query {}", q);
        }
    }

    /// Ascending and descending query order match the reference.
    #[test]
    fn sorted_orders_match_reference((ts, vs, queries) in samples_with_queries(), method in methods()) {
        let mut ascending = queries.clone();
        ascending.sort_unstable();
        let mut descending = ascending.clone();
        descending.reverse();

        for order in [ascending, descending] {
            let ip = Interpolator::new(ts.clone(), vs.clone()).unwrap().with_method(method);
            for q in &order {
                prop_assert!(same(ip.value_at(*q), ip.value_at_uncached(*q)), "query {}", q);
            }
        }
    }

    /// Shuffled repeats of the same query set give identical answers each pass.
    #[test]
    fn shuffled_passes_agree(
        (ts, vs, queries) in samples_with_queries(),
        seed in any::<u64>(),
    ) {
        let ip = Interpolator::new(ts, vs).unwrap();
        let first_pass: Vec<f64> = queries.iter().map(|q| ip.value_at(*q)).collect();

        // Deterministic permutation from the seed.
        let mut order: Vec<usize> = (0..queries.len()).collect();
        let mut state = seed | 1;
        for i in (1..order.len()).rev() {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            order.swap(i, (state % (i as u64 + 1)) as usize);
        }
        for i in order {
            prop_assert!(same(ip.value_at(queries[i]), first_pass[i]));
        }
    }
}
