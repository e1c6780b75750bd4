//! Property tests for the range grammar

use cfgtree_sections::{Scalar, parse_range};
use proptest::prelude::*;

fn as_f64(value: &Scalar) -> f64 {
    match value {
        Scalar::Int(n) => *n as f64,
        Scalar::Float(x) => *x,
        Scalar::Str(s) => panic!("unexpected string {s}"),
    }
}

#[test]
fn integer_range_examples() {
    let ints = |v: &[i64]| v.iter().copied().map(Scalar::Int).collect::<Vec<_>>();
    assert_eq!(parse_range("irange(2,5)").unwrap(), ints(&[2, 3, 4, 5]));
    assert_eq!(parse_range("range(2,5)").unwrap(), ints(&[2, 3, 4]));
}

proptest! {
    #[test]
    fn inclusive_colon_range_hits_both_ends(start in -50i32..50, len in 0i32..40, step_id in 0usize..4) {
        let step = [0.1, 0.25, 0.5, 1.0][step_id];
        let a = start as f64 * step;
        let b = a + len as f64 * step;
        let values = parse_range(&format!("{a}:{b}:{step}")).unwrap();

        prop_assert_eq!(values.len(), len as usize + 1);
        prop_assert!((as_f64(&values[0]) - a).abs() < 1e-9);
        prop_assert!((as_f64(values.last().unwrap()) - b).abs() < 1e-9);
    }

    #[test]
    fn exclusive_end_stays_below_bound(start in -50i32..50, len in 1i32..40, step_id in 0usize..4) {
        let step = [0.1, 0.25, 0.5, 1.0][step_id];
        let a = start as f64 * step;
        let b = a + len as f64 * step;
        let values = parse_range(&format!("{a}:{b}:{step})")).unwrap();

        prop_assert_eq!(values.len(), len as usize);
        prop_assert!(as_f64(values.last().unwrap()) < b - step / 2.0);
    }

    #[test]
    fn irange_is_range_with_end(a in -100i64..100, len in 0i64..50) {
        let b = a + len;
        let mut exclusive = parse_range(&format!("range({a},{b})")).unwrap();
        exclusive.push(Scalar::Int(b));
        prop_assert_eq!(parse_range(&format!("irange({a},{b})")).unwrap(), exclusive);
    }
}
