//! Kinematics primitives shared by every model.
//!
//! - [`Vec2`] / [`Vec3`]: plain `f64` vectors with the handful of operations
//!   the integrators need (add, scale, length, normalize, dot, cross)
//! - [`Trail`]: bounded history of past positions (push newest, drop oldest)

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// 2D vector for planar models.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    /// X component.
    pub x: f64,
    /// Y component (up).
    pub y: f64,
}

impl Vec2 {
    /// Zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new vector.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector at `angle` radians from the +x axis.
    #[must_use]
    pub fn from_angle(angle: f64) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    /// Squared length.
    #[must_use]
    pub fn length_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Unit vector in the same direction, or zero for a degenerate vector.
    #[must_use]
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len < f64::EPSILON {
            Self::ZERO
        } else {
            Self::new(self.x / len, self.y / len)
        }
    }

    /// Dot product.
    #[must_use]
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Scale by scalar.
    #[must_use]
    pub fn scale(&self, s: f64) -> Self {
        Self::new(self.x * s, self.y * s)
    }

    /// Lift into the z = 0 plane.
    #[must_use]
    pub const fn extend(&self, z: f64) -> Vec3 {
        Vec3::new(self.x, self.y, z)
    }

    /// Check if all components are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        self.scale(rhs)
    }
}

impl Neg for Vec2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// 3D vector for positions and velocities.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component.
    pub x: f64,
    /// Y component (up).
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vec3 {
    /// Zero vector.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Unit vector along +y.
    pub const UP: Self = Self {
        x: 0.0,
        y: 1.0,
        z: 0.0,
    };

    /// Create a new vector.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Squared length.
    #[must_use]
    pub fn length_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Dot product.
    #[must_use]
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product.
    #[must_use]
    pub fn cross(&self, other: &Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Unit vector in the same direction, or zero for a degenerate vector.
    #[must_use]
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len < f64::EPSILON {
            Self::ZERO
        } else {
            self.scale(1.0 / len)
        }
    }

    /// Scale by scalar.
    #[must_use]
    pub fn scale(&self, s: f64) -> Self {
        Self {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }

    /// Distance in the horizontal (x, z) plane from the y axis.
    #[must_use]
    pub fn horizontal_radius(&self) -> f64 {
        (self.x * self.x + self.z * self.z).sqrt()
    }

    /// Drop the z component.
    #[must_use]
    pub const fn truncate(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Check if all components are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for Vec3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vec3 {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        self.scale(rhs)
    }
}

impl Neg for Vec3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

/// Bounded history of past positions.
///
/// Memory stays O(capacity) regardless of how long the simulation runs.
#[derive(Debug, Clone, Serialize)]
pub struct Trail<T> {
    capacity: usize,
    points: VecDeque<T>,
}

impl<T: Copy> Trail<T> {
    /// Create an empty trail holding at most `capacity` points.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            points: VecDeque::with_capacity(capacity),
        }
    }

    /// Push the newest point, dropping the oldest once full.
    pub fn push(&mut self, point: T) {
        if self.capacity == 0 {
            return;
        }
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    /// Number of stored points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the trail is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Maximum number of stored points.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent point.
    #[must_use]
    pub fn newest(&self) -> Option<T> {
        self.points.back().copied()
    }

    /// Oldest retained point.
    #[must_use]
    pub fn oldest(&self) -> Option<T> {
        self.points.front().copied()
    }

    /// Iterate from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.points.iter()
    }

    /// Drop all points.
    pub fn clear(&mut self) {
        self.points.clear();
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Normalized non-degenerate vectors have unit length.
        #[test]
        fn prop_normalize_unit_length(
            x in -1e6f64..1e6, y in -1e6f64..1e6, z in -1e6f64..1e6,
        ) {
            let v = Vec3::new(x, y, z);
            if v.length() < 1e-6 {
                return Ok(());
            }
            prop_assert!((v.normalize().length() - 1.0).abs() < 1e-9);
        }

        /// Dot product is commutative.
        #[test]
        fn prop_dot_commutative(
            x1 in -1e3f64..1e3, y1 in -1e3f64..1e3,
            x2 in -1e3f64..1e3, y2 in -1e3f64..1e3,
        ) {
            let a = Vec2::new(x1, y1);
            let b = Vec2::new(x2, y2);
            prop_assert!((a.dot(&b) - b.dot(&a)).abs() < 1e-9);
        }

        /// Cross product is perpendicular to both inputs.
        #[test]
        fn prop_cross_perpendicular(
            x1 in -10f64..10.0, y1 in -10f64..10.0, z1 in -10f64..10.0,
            x2 in -10f64..10.0, y2 in -10f64..10.0, z2 in -10f64..10.0,
        ) {
            let a = Vec3::new(x1, y1, z1);
            let b = Vec3::new(x2, y2, z2);
            let c = a.cross(&b);
            prop_assert!(c.dot(&a).abs() < 1e-9);
            prop_assert!(c.dot(&b).abs() < 1e-9);
        }

        /// A trail never grows past its capacity.
        #[test]
        fn prop_trail_bounded(capacity in 0usize..64, pushes in 0usize..500) {
            let mut trail = Trail::new(capacity);
            for i in 0..pushes {
                trail.push(i);
            }
            prop_assert_eq!(trail.len(), pushes.min(capacity));
            if pushes > 0 && capacity > 0 {
                prop_assert_eq!(trail.newest(), Some(pushes - 1));
            }
        }
    }
}
