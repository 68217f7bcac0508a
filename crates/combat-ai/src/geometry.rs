//! Planar geometry between two fighters.

/// Offset, distance, and bearing from one point to another.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vector {
    pub dx: f64,
    pub dy: f64,
    pub distance: f64,
    /// Bearing in radians, `atan2(dy, dx)`.
    pub angle: f64,
}

/// Vector from `(ax, ay)` to `(bx, by)`.
pub fn vector_to(ax: f64, ay: f64, bx: f64, by: f64) -> Vector {
    let dx = bx - ax;
    let dy = by - ay;
    Vector {
        dx,
        dy,
        distance: dx.hypot(dy),
        angle: dy.atan2(dx),
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use super::*;

    #[test]
    fn three_four_five() {
        let v = vector_to(1.0, 1.0, 4.0, 5.0);
        assert_eq!((v.dx, v.dy), (3.0, 4.0));
        assert_eq!(v.distance, 5.0);
    }

    #[test]
    fn bearing_points_at_target() {
        assert_eq!(vector_to(0.0, 0.0, 10.0, 0.0).angle, 0.0);
        assert!((vector_to(0.0, 0.0, 0.0, 10.0).angle - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn coincident_points_have_zero_distance() {
        let v = vector_to(3.0, 3.0, 3.0, 3.0);
        assert_eq!(v.distance, 0.0);
        assert_eq!(v.angle, 0.0);
    }
}
