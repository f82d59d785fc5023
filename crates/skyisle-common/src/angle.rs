//! Heading math shared by every movable body.
//!
//! Headings are radians in `[0, 2π)`, measured from the +x axis toward +y
//! (screen down), matching `atan2(dy, dx)` on world deltas.

use std::f32::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

/// Which way a heading rotates to reach its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnDirection {
    /// Heading decreases
    Left,
    /// Heading increases
    Right,
}

/// Folds an angle into `[0, 2π)`.
#[must_use]
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Heading of a direction vector, normalized into `[0, 2π)`.
#[must_use]
pub fn heading_of(dx: f32, dy: f32) -> f32 {
    normalize_angle(dy.atan2(dx))
}

/// Unsigned shortest rotation between two headings, in `[0, π]`.
#[must_use]
pub fn angular_distance(a: f32, b: f32) -> f32 {
    let d = normalize_angle(a - b);
    d.min(TAU - d)
}

/// Picks the rotation direction from `heading` toward `desired`.
///
/// `da = heading - desired`, folded into `[0, 2π)`. Turns left iff
/// `da < -π || 0 <= da < π`; an exactly opposite target turns right.
#[must_use]
pub fn turn_direction(heading: f32, desired: f32) -> TurnDirection {
    let mut da = heading - desired;
    if da < 0.0 {
        da += TAU;
    }
    if da < -PI || (0.0..PI).contains(&da) {
        TurnDirection::Left
    } else {
        TurnDirection::Right
    }
}

/// Rotates `heading` toward `desired` by at most `max_step` radians.
///
/// Never overshoots the target and always returns a normalized heading.
#[must_use]
pub fn turn_toward(heading: f32, desired: f32, max_step: f32) -> f32 {
    let step = max_step.max(0.0).min(angular_distance(heading, desired));
    match turn_direction(heading, desired) {
        TurnDirection::Left => normalize_angle(heading - step),
        TurnDirection::Right => normalize_angle(heading + step),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_heading_of_axes() {
        assert!(heading_of(1.0, 0.0).abs() < f32::EPSILON);
        assert!((heading_of(0.0, 1.0) - PI / 2.0).abs() < 1e-6);
        assert!((heading_of(-1.0, 0.0) - PI).abs() < 1e-6);
        assert!((heading_of(0.0, -1.0) - 3.0 * PI / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_opposite_heading_tie_break() {
        let heading = 0.1;
        let desired = 0.1 + PI;
        let first = turn_direction(heading, desired);
        for _ in 0..16 {
            assert_eq!(turn_direction(heading, desired), first);
        }

        // Repeated turning from the same start follows the same path
        let a = turn_toward(heading, desired, 0.05);
        let b = turn_toward(heading, desired, 0.05);
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_half_plane_rule() {
        // da in [0, π) turns left
        assert_eq!(turn_direction(1.0, 0.5), TurnDirection::Left);
        // da in [π, 2π) turns right
        assert_eq!(turn_direction(0.5, 1.0), TurnDirection::Right);
        assert_eq!(turn_direction(0.0, PI / 2.0), TurnDirection::Right);
    }

    #[test]
    fn test_turn_takes_short_way_across_zero() {
        // From just below 2π toward a small angle: increasing is shorter
        let heading = TAU - 0.1;
        let turned = turn_toward(heading, 0.1, 0.05);
        assert!(turned > heading || turned < 0.1);
        assert!(angular_distance(turned, 0.1) < angular_distance(heading, 0.1));
    }

    #[test]
    fn test_turn_does_not_overshoot() {
        let turned = turn_toward(1.0, 1.02, 0.5);
        assert!((turned - 1.02).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_turn_stays_normalized(
            heading in 0.0f32..TAU,
            desired in 0.0f32..TAU,
            step in 0.0f32..10.0,
        ) {
            let turned = turn_toward(heading, desired, step);
            prop_assert!((0.0..TAU).contains(&turned));
        }

        #[test]
        fn prop_normalize_in_range(angle in -1000.0f32..1000.0) {
            let normalized = normalize_angle(angle);
            prop_assert!((0.0..TAU).contains(&normalized));
        }
    }
}
