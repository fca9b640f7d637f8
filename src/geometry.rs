//! Planar predicates used by the triangulation engine
//!
//! All predicates evaluate plain `f64` arithmetic on [`DVec2`]; inputs are expected
//! to be in general position, so no tolerance is applied.

use glam::DVec2;
use std::cmp::Ordering;

/// Turn direction of an ordered point triple
///
/// Variants are ordered `Clockwise < Collinear < CounterClockwise`, so
/// `turn >= Orientation::Collinear` reads as "does not turn clockwise".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Orientation {
    /// Right turn (negative cross product)
    Clockwise,
    /// No turn
    Collinear,
    /// Left turn (positive cross product)
    CounterClockwise,
}

/// Sign of the cross product of `(p2 - p1)` and `(p3 - p1)`
pub fn orientation(p1: DVec2, p2: DVec2, p3: DVec2) -> Orientation {
    let cross = (p2 - p1).perp_dot(p3 - p1);
    if cross > 0.0 {
        Orientation::CounterClockwise
    } else if cross < 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

/// Sign of the dot product of `(p2 - p1)` and `(p3 - p1)`
///
/// For collinear inputs, `Ordering::Less` means `p1` lies strictly between `p2` and `p3`.
pub fn collinear_direction(p1: DVec2, p2: DVec2, p3: DVec2) -> Ordering {
    (p2 - p1)
        .dot(p3 - p1)
        .partial_cmp(&0.0)
        .unwrap_or(Ordering::Equal)
}

/// Euclidean distance
#[inline]
pub fn distance(p1: DVec2, p2: DVec2) -> f64 {
    p1.distance(p2)
}

/// Whether the cycle turns strictly counter-clockwise at every vertex
pub fn is_convex_cycle(points: &[DVec2]) -> bool {
    let n = points.len();
    (0..n).all(|i| {
        orientation(points[i], points[(i + 1) % n], points[(i + 2) % n])
            == Orientation::CounterClockwise
    })
}

/// Whether the open segments `p1p2` and `q1q2` cross at a single interior point
///
/// Touching and collinear overlap do not count as crossing.
pub fn segments_cross(p1: DVec2, p2: DVec2, q1: DVec2, q2: DVec2) -> bool {
    let opposite = |a: Orientation, b: Orientation| {
        matches!(
            (a, b),
            (Orientation::Clockwise, Orientation::CounterClockwise)
                | (Orientation::CounterClockwise, Orientation::Clockwise)
        )
    };

    opposite(orientation(p1, p2, q1), orientation(p1, p2, q2))
        && opposite(orientation(q1, q2, p1), orientation(q1, q2, p2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> DVec2 {
        DVec2::new(x, y)
    }

    #[test]
    fn test_orientation_signs() {
        assert_eq!(orientation(p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0)), Orientation::CounterClockwise);
        assert_eq!(orientation(p(0.0, 0.0), p(0.0, 1.0), p(1.0, 0.0)), Orientation::Clockwise);
        assert_eq!(orientation(p(0.0, 0.0), p(1.0, 1.0), p(3.0, 3.0)), Orientation::Collinear);
    }

    #[test]
    fn test_orientation_ordering() {
        assert!(Orientation::Clockwise < Orientation::Collinear);
        assert!(Orientation::Collinear < Orientation::CounterClockwise);
    }

    #[test]
    fn test_collinear_direction() {
        // Origin between the two points
        assert_eq!(collinear_direction(p(1.0, 0.0), p(0.0, 0.0), p(2.0, 0.0)), Ordering::Less);
        // Both points ahead of the origin
        assert_eq!(collinear_direction(p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0)), Ordering::Greater);
        // Perpendicular
        assert_eq!(collinear_direction(p(0.0, 0.0), p(1.0, 0.0), p(0.0, 2.0)), Ordering::Equal);
    }

    #[test]
    fn test_distance() {
        assert!((distance(p(0.0, 0.0), p(3.0, 4.0)) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_convex_cycle_square() {
        let square = [p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)];
        assert!(is_convex_cycle(&square));

        // Same points with one pair swapped form a bow tie
        let swapped = [p(0.0, 0.0), p(1.0, 1.0), p(1.0, 0.0), p(0.0, 1.0)];
        assert!(!is_convex_cycle(&swapped));

        // Clockwise order is not accepted
        let clockwise = [p(0.0, 0.0), p(0.0, 1.0), p(1.0, 1.0), p(1.0, 0.0)];
        assert!(!is_convex_cycle(&clockwise));
    }

    #[test]
    fn test_convex_cycle_rejects_straight_vertex() {
        let with_straight = [p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0), p(1.0, 1.0)];
        assert!(!is_convex_cycle(&with_straight));
    }

    #[test]
    fn test_segments_cross() {
        assert!(segments_cross(p(0.0, 0.0), p(2.0, 2.0), p(0.0, 2.0), p(2.0, 0.0)));
        // Shared endpoint
        assert!(!segments_cross(p(0.0, 0.0), p(2.0, 2.0), p(2.0, 2.0), p(3.0, 0.0)));
        // T-junction touching
        assert!(!segments_cross(p(0.0, 0.0), p(2.0, 0.0), p(1.0, 0.0), p(1.0, 1.0)));
        // Disjoint
        assert!(!segments_cross(p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0), p(1.0, 1.0)));
    }
}
