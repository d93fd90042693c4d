//! Vector types for survey coordinates and drawing positions

use std::fmt;
use std::ops::{Add, Mul, Sub};

/// 2D vector, used for drawing positions in document units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    /// Create a new 2D vector
    pub const fn new(x: f64, y: f64) -> Self {
        Vector2 { x, y }
    }

    /// Zero vector
    pub const ZERO: Vector2 = Vector2::new(0.0, 0.0);

    /// Calculate the length (magnitude) of the vector
    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Distance to another point
    pub fn distance(&self, other: &Vector2) -> f64 {
        (*self - *other).length()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vector2 {
    type Output = Vector2;
    fn add(self, other: Vector2) -> Vector2 {
        Vector2::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Vector2 {
    type Output = Vector2;
    fn sub(self, other: Vector2) -> Vector2 {
        Vector2::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f64> for Vector2 {
    type Output = Vector2;
    fn mul(self, scalar: f64) -> Vector2 {
        Vector2::new(self.x * scalar, self.y * scalar)
    }
}

impl fmt::Display for Vector2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// 3D vector in survey space: x = east, y = north, z = up, in metres
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    /// Create a new 3D vector
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Vector3 { x, y, z }
    }

    /// Zero vector
    pub const ZERO: Vector3 = Vector3::new(0.0, 0.0, 0.0);

    /// Build a position from the integer centimetre triple stored in 3D files.
    pub fn from_centimetres(xyz: [i32; 3]) -> Self {
        Vector3::new(
            f64::from(xyz[0]) / 100.0,
            f64::from(xyz[1]) / 100.0,
            f64::from(xyz[2]) / 100.0,
        )
    }

    /// Calculate the length (magnitude) of the vector
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Length of the projection onto the horizontal plane
    pub fn horizontal_length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Distance to another point
    pub fn distance(&self, other: &Vector3) -> f64 {
        (*self - *other).length()
    }

    /// Compass bearing towards `other` in degrees, 0 = north, clockwise.
    pub fn bearing_to(&self, other: &Vector3) -> f64 {
        let d = *other - *self;
        d.x.atan2(d.y).to_degrees().rem_euclid(360.0)
    }

    /// Drop the vertical component.
    pub fn plan(&self) -> Vector2 {
        Vector2::new(self.x, self.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vector3 {
    type Output = Vector3;
    fn add(self, other: Vector3) -> Vector3 {
        Vector3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for Vector3 {
    type Output = Vector3;
    fn sub(self, other: Vector3) -> Vector3 {
        Vector3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_centimetres() {
        let v = Vector3::from_centimetres([1250, -300, 7]);
        assert_eq!(v, Vector3::new(12.5, -3.0, 0.07));
    }

    #[test]
    fn test_horizontal_length_ignores_z() {
        let v = Vector3::new(3.0, 4.0, 100.0);
        assert_eq!(v.horizontal_length(), 5.0);
        assert!((v.length() - (25.0f64 + 10000.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_bearing_to() {
        let a = Vector3::ZERO;
        assert_eq!(a.bearing_to(&Vector3::new(0.0, 5.0, 0.0)), 0.0);
        assert!((a.bearing_to(&Vector3::new(5.0, 0.0, 0.0)) - 90.0).abs() < 1e-12);
        assert!((a.bearing_to(&Vector3::new(-5.0, 0.0, 0.0)) - 270.0).abs() < 1e-12);
    }

    #[test]
    fn test_vector2_operations() {
        let v1 = Vector2::new(1.0, 2.0);
        let v2 = Vector2::new(4.0, 6.0);
        assert_eq!(v1 + v2, Vector2::new(5.0, 8.0));
        assert_eq!(v2 - v1, Vector2::new(3.0, 4.0));
        assert_eq!(v1.distance(&v2), 5.0);
        assert_eq!(v1 * 2.0, Vector2::new(2.0, 4.0));
    }
}
