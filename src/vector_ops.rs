use crate::config::Number;
use wide::f64x4;

const LANES: usize = 4;

/// Euclidean distance from `target` to `source` over the target's dimensions.
///
/// Source components missing past the end of `source` count as zero, so a short
/// source row yields an inflated distance instead of an error. Extra source
/// components beyond the target's length are ignored. `NaN` inputs propagate.
pub fn euclidean_distance(target: &[Number], source: &[Number]) -> Number {
    let len = target.len();
    let simd_len = len - (len % LANES);
    let at = |i: usize| source.get(i).copied().unwrap_or(0.0);

    let mut acc = f64x4::splat(0.0);
    for i in (0..simd_len).step_by(LANES) {
        let vt = f64x4::new([target[i], target[i + 1], target[i + 2], target[i + 3]]);
        let vs = f64x4::new([at(i), at(i + 1), at(i + 2), at(i + 3)]);
        let diff = vt - vs;
        acc += diff * diff;
    }

    let mut sum = acc.reduce_add();
    for i in simd_len..len {
        let diff = target[i] - at(i);
        sum += diff * diff;
    }

    sum.sqrt()
}

/// Rounds to the 5-decimal display precision, reading the value back from its
/// formatted form so ranking agrees with what is printed.
pub fn round_distance(distance: Number) -> Number {
    format!("{:.5}", distance)
        .parse::<Number>()
        .unwrap_or(Number::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Number, b: Number) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn identity_is_zero() {
        let a: Vec<Number> = (0..25).map(|i| i as Number * 0.013 - 0.1).collect();
        assert_eq!(euclidean_distance(&a, &a), 0.0);
    }

    #[test]
    fn symmetric_for_equal_lengths() {
        let a: Vec<Number> = (0..25).map(|i| (i as Number).sin() * 0.1).collect();
        let b: Vec<Number> = (0..25).map(|i| (i as Number).cos() * 0.1).collect();
        assert_eq!(euclidean_distance(&a, &b), euclidean_distance(&b, &a));
    }

    #[test]
    fn triangle_inequality_holds() {
        let a: Vec<Number> = (0..25)
            .map(|i| (i as Number * 0.7).sin() * 0.05)
            .collect();
        let b: Vec<Number> = (0..25)
            .map(|i| (i as Number * 1.3).cos() * 0.04)
            .collect();
        let c: Vec<Number> = (0..25).map(|i| i as Number * 0.002).collect();
        let ab = euclidean_distance(&a, &b);
        let bc = euclidean_distance(&b, &c);
        let ac = euclidean_distance(&a, &c);
        assert!(ac <= ab + bc + 1e-12);
    }

    #[test]
    fn matches_scalar_reference() {
        let a: Vec<Number> = (0..25).map(|i| i as Number * 0.01).collect();
        let b: Vec<Number> = (0..25).map(|i| 0.3 - i as Number * 0.02).collect();
        let expected = a
            .iter()
            .zip(&b)
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<Number>()
            .sqrt();
        assert!(close(euclidean_distance(&a, &b), expected));
    }

    #[test]
    fn short_source_is_zero_padded() {
        let target = [3.0, 4.0];
        assert_eq!(euclidean_distance(&target, &[]), 5.0);
        assert_eq!(euclidean_distance(&target, &[3.0]), 4.0);
    }

    #[test]
    fn long_source_extra_components_are_ignored() {
        assert_eq!(euclidean_distance(&[1.0], &[1.0, 100.0]), 0.0);
    }

    #[test]
    fn nan_propagates() {
        assert!(euclidean_distance(&[Number::NAN, 0.2], &[0.1, 0.2]).is_nan());
    }

    #[test]
    fn rounds_to_five_decimals() {
        assert_eq!(round_distance(0.0141421356), 0.01414);
        assert_eq!(round_distance(0.0223606797), 0.02236);
        assert!(round_distance(Number::NAN).is_nan());
        assert_eq!(round_distance(Number::INFINITY), Number::INFINITY);
    }
}
