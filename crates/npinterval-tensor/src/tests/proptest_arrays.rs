//! Property tests for conversions, subdivision and array arithmetic.

use ndarray::{ArrayD, IxDyn};
use proptest::prelude::*;

use crate::convert::{as_iarray, as_lu, from_cent_pert, get_cent_pert, get_iarray, get_lu};
use crate::diagnostics::has_nan;
use crate::ops::{BinaryOp, CompareOp};
use crate::subdivide::half_intervals;
use crate::{Interval, IntervalArray};

const FP_TOLERANCE: f64 = 1e-12;

fn valid_interval(range: f64) -> impl Strategy<Value = Interval> {
    (-range..range, -range..range).prop_map(|(a, b)| Interval::from_unordered(a, b))
}

/// Arrays of up to three dimensions with up to 24 elements.
fn interval_array(range: f64) -> impl Strategy<Value = IntervalArray> {
    prop::collection::vec(1usize..4, 0..4).prop_flat_map(move |shape| {
        let len: usize = shape.iter().product();
        prop::collection::vec(valid_interval(range), len).prop_map(move |data| {
            IntervalArray::from_shape_vec(&shape, data).unwrap()
        })
    })
}

fn interval_box(max_dims: usize) -> impl Strategy<Value = IntervalArray> {
    prop::collection::vec(valid_interval(100.0), 0..=max_dims).prop_map(IntervalArray::from_vec)
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= FP_TOLERANCE * (1.0 + a.abs().max(b.abs()))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn lower_upper_round_trip(x in interval_array(1e6)) {
        let (lower, upper) = get_lu(&x);
        prop_assert_eq!(get_iarray(&lower, &upper).unwrap(), x.clone());
        prop_assert_eq!(as_iarray(&as_lu(&x)).unwrap(), x);
    }

    #[test]
    fn swapped_bounds_give_same_array(x in interval_array(1e6)) {
        let (lower, upper) = get_lu(&x);
        prop_assert_eq!(get_iarray(&upper, &lower).unwrap(), x);
    }

    #[test]
    fn center_perturbation_round_trip(x in interval_array(1e6)) {
        let (center, perturbation) = get_cent_pert(&x);
        let y = from_cent_pert(&center, &perturbation).unwrap();
        prop_assert_eq!(y.shape(), x.shape());
        for (a, b) in x.iter().zip(y.iter()) {
            prop_assert!(close(a.lower(), b.lower()), "{} vs {}", a, b);
            prop_assert!(close(a.upper(), b.upper()), "{} vs {}", a, b);
            prop_assert!(b.lower() <= b.upper());
        }
    }

    #[test]
    fn half_intervals_partition_box(b in interval_box(6)) {
        let parts = half_intervals(&b).unwrap();
        prop_assert_eq!(parts.len(), 1usize << b.len());

        // Per dimension, the hull of all parts is the source interval.
        for j in 0..b.len() {
            let hull = parts
                .iter()
                .map(|p| p.get(&[j]).unwrap())
                .reduce(Interval::hull)
                .unwrap();
            prop_assert_eq!(hull, b.get(&[j]).unwrap());
        }

        // Sub-box 0 replaces every upper bound by the midpoint.
        let first = &parts[0];
        for (orig, part) in b.iter().zip(first.iter()) {
            prop_assert_eq!(part.lower(), orig.lower());
            prop_assert_eq!(part.upper(), orig.midpoint());
        }
    }

    #[test]
    fn has_nan_detects_any_nan_bound(
        x in interval_array(10.0),
        pick in any::<prop::sample::Index>(),
        upper_side in any::<bool>(),
    ) {
        prop_assert!(!has_nan(&x));
        if !x.is_empty() {
            let (mut lower, mut upper) = get_lu(&x);
            let i = pick.index(x.len());
            let target = if upper_side { &mut upper } else { &mut lower };
            if let Some(slot) = target.iter_mut().nth(i) {
                *slot = f64::NAN;
            }
            let y = get_iarray(&lower, &upper).unwrap();
            prop_assert!(has_nan(&y));
        }
    }

    #[test]
    fn array_ops_match_scalar_ops(x in interval_array(1e3), y in valid_interval(1e3)) {
        let rhs = IntervalArray::from_elem(&[], y);
        for &op in BinaryOp::ALL {
            let out = x.binary(op, &rhs).unwrap();
            prop_assert_eq!(out.shape(), x.shape());
            for (a, r) in x.iter().zip(out.iter()) {
                prop_assert_eq!(r, op.apply(a, y));
            }
        }
        let less = x.compare(CompareOp::Less, &rhs).unwrap();
        for (a, &r) in x.iter().zip(less.iter()) {
            prop_assert_eq!(r, a.less(y));
        }
    }

    #[test]
    fn self_subtraction_spans_width(x in interval_array(1e6)) {
        let d = x.sub(&x).unwrap();
        for (a, r) in x.iter().zip(d.iter()) {
            prop_assert_eq!(r.lower(), -a.width());
            prop_assert_eq!(r.upper(), a.width());
        }
    }
}

#[test]
fn has_nan_concrete_case() {
    let lu = ArrayD::from_shape_vec(IxDyn(&[2, 2]), vec![1.0, 2.0, f64::NAN, 3.0]).unwrap();
    let x = as_iarray(&lu).unwrap();
    assert!(has_nan(&x));
}
