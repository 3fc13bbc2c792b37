//! Row-major flat index space over a torus: both axes wrap.
//! `index = x + y * width`.

/// Moore neighborhood offsets.
pub const NEIGHBORS8: [(i32, i32); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-1, 0),           (1, 0),
    (-1, 1),  (0, 1),  (1, 1),
];

/// Wrap any (x, y) onto the torus and return its linear index.
/// Equivalent to `((x mod w) + w) mod w + (((y mod h) + h) mod h) * w`
/// for every i32 input.
#[inline]
pub fn wrap_index(x: i32, y: i32, width: i32, height: i32) -> i32 {
    debug_assert!(width > 0 && height > 0);
    x.rem_euclid(width) + y.rem_euclid(height) * width
}

/// Inverse of the in-range mapping.
#[inline]
pub fn coords(index: usize, width: usize) -> (usize, usize) {
    (index % width, index / width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn edges_wrap_to_opposite_side() {
        let (w, h) = (7, 5);
        assert_eq!(wrap_index(-1, 0, w, h), wrap_index(w - 1, 0, w, h));
        assert_eq!(wrap_index(w, 0, w, h), wrap_index(0, 0, w, h));
        assert_eq!(wrap_index(0, -1, w, h), wrap_index(0, h - 1, w, h));
        assert_eq!(wrap_index(0, h, w, h), wrap_index(0, 0, w, h));
        assert_eq!(wrap_index(-1, -1, w, h), (w * h - 1));
    }

    #[test]
    fn coords_round_trip() {
        assert_eq!(coords(13, 5), (3, 2));
        assert_eq!(wrap_index(3, 2, 5, 4), 13);
    }

    proptest! {
        #[test]
        fn prop_matches_modular_formula(
            w in 1i32..64,
            h in 1i32..64,
            fx in -2.0f64..2.0,
            fy in -2.0f64..2.0,
        ) {
            let x = (fx * w as f64) as i32;
            let y = (fy * h as f64) as i32;
            let expected = ((x % w) + w) % w + (((y % h) + h) % h) * w;
            let got = wrap_index(x, y, w, h);
            prop_assert_eq!(got, expected);
            prop_assert!(got >= 0 && got < w * h);
        }
    }
}
