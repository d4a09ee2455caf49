//! Mean-profile post-processing.
//!
//! A small set of elementwise transforms applied to a mean profile before
//! fitting/plotting. Each corrects a known measurement artifact:
//!
//! - `Roll` repositions the profile's reference site (the raw table puts the
//!   vacancy mid-file; rolling centers the kink in the index range).
//! - `SegmentShift` adds a fixed constant to a contiguous suffix, undoing the
//!   periodic branch cut at the defect core (sites past the vacancy report
//!   displacements one lattice period off).
//! - `Flip` (`m <- 1 - m`) overlays profiles measured with the opposite
//!   orientation convention.
//!
//! Transforms are applied in the order listed by the preset; order matters
//! because a roll changes which indices a later suffix shift covers.

use crate::domain::Transform;

/// Cyclic rotation with numpy `np.roll` semantics: positive `k` moves each
/// element toward higher indices, wrapping at the end.
pub fn roll(values: &mut [f64], k: i64) {
    let n = values.len();
    if n == 0 {
        return;
    }
    let shift = k.rem_euclid(n as i64) as usize;
    values.rotate_right(shift);
}

/// Add `delta` to every element from `start` (clamped to len) onward.
pub fn segment_shift(values: &mut [f64], start: usize, delta: f64) {
    let start = start.min(values.len());
    for v in &mut values[start..] {
        *v += delta;
    }
}

/// Orientation flip: `m <- 1 - m`.
pub fn flip(values: &mut [f64]) {
    for v in values.iter_mut() {
        *v = 1.0 - *v;
    }
}

/// Apply a transform sequence in order.
pub fn apply(transforms: &[Transform], values: &mut [f64]) {
    for t in transforms {
        match *t {
            Transform::Roll(k) => roll(values, k),
            Transform::SegmentShift { start, delta } => segment_shift(values, start, delta),
            Transform::Flip => flip(values),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roll_matches_numpy_semantics() {
        let mut v = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        roll(&mut v, 2);
        assert_eq!(v, vec![4.0, 5.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn roll_by_k_then_minus_k_is_identity() {
        let original = vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7];
        for k in [-9i64, -3, 0, 1, 5, 14] {
            let mut v = original.clone();
            roll(&mut v, k);
            roll(&mut v, -k);
            assert_eq!(v, original, "k={k}");
        }
    }

    #[test]
    fn roll_handles_empty_and_oversized_shift() {
        let mut empty: Vec<f64> = vec![];
        roll(&mut empty, 3);
        assert!(empty.is_empty());

        let mut v = vec![1.0, 2.0, 3.0];
        roll(&mut v, 7); // 7 mod 3 == 1
        assert_eq!(v, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn segment_shift_hits_suffix_only() {
        let mut v = vec![0.0; 6];
        segment_shift(&mut v, 3, 1.5);
        assert_eq!(v, vec![0.0, 0.0, 0.0, 1.5, 1.5, 1.5]);

        // Clamped start is a no-op.
        segment_shift(&mut v, 10, 9.0);
        assert_eq!(v, vec![0.0, 0.0, 0.0, 1.5, 1.5, 1.5]);
    }

    #[test]
    fn flip_is_involutive() {
        let original = vec![0.0, 0.25, 1.0];
        let mut v = original.clone();
        flip(&mut v);
        assert_eq!(v, vec![1.0, 0.75, 0.0]);
        flip(&mut v);
        assert_eq!(v, original);
    }

    #[test]
    fn apply_respects_order() {
        // Roll first, then shift the suffix: the shift must hit the rolled
        // positions, not the original ones.
        let mut v = vec![1.0, 2.0, 3.0, 4.0];
        apply(
            &[
                Transform::Roll(1),
                Transform::SegmentShift { start: 2, delta: 10.0 },
            ],
            &mut v,
        );
        assert_eq!(v, vec![4.0, 1.0, 12.0, 13.0]);
    }
}
