use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// A tracked point in normalized coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f32,
    pub y: f32,
}

impl Point2D {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Displacement from `other` to `self`.
    #[inline]
    pub fn displacement_from(&self, other: &Point2D) -> Vector2<f32> {
        Point2::from(*self) - Point2::from(*other)
    }

    /// Euclidean distance between two points.
    #[inline]
    pub fn distance_to(&self, other: &Point2D) -> f32 {
        self.displacement_from(other).norm()
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<Point2D> for Point2<f32> {
    fn from(p: Point2D) -> Self {
        Point2::new(p.x, p.y)
    }
}

impl From<Point2<f32>> for Point2D {
    fn from(p: Point2<f32>) -> Self {
        Self::new(p.x, p.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(0.3, 0.4);
        assert!((a.distance_to(&b) - 0.5).abs() < 1e-6);
        assert!((b.distance_to(&a) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_displacement() {
        let d = Point2D::new(0.5, 0.2).displacement_from(&Point2D::new(0.2, 0.5));
        assert!((d.x - 0.3).abs() < 1e-6);
        assert!((d.y + 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_nalgebra_roundtrip() {
        let p = Point2D::new(0.25, 0.75);
        let q: Point2<f32> = p.into();
        assert_eq!(Point2D::from(q), p);
    }
}
