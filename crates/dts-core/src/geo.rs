//! Planar geometry: `Vec2`, `Pose`, and heading helpers.
//!
//! The facility is a flat 2-D lane, so positions are plain Cartesian `f32`
//! pairs in metres.  Headings are radians measured counter-clockwise from
//! the +x axis; the forward unit vector of heading `h` is `(cos h, sin h)`.

use std::f32::consts::{PI, TAU};
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// A 2-D vector / point stored as single-precision floats.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `heading` (radians, CCW from +x).
    #[inline]
    pub fn from_heading(heading: f32) -> Self {
        let (sin, cos) = heading.sin_cos();
        Self { x: cos, y: sin }
    }

    #[inline]
    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    #[inline]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    #[inline]
    pub fn distance_squared(self, other: Vec2) -> f32 {
        (other - self).length_squared()
    }

    #[inline]
    pub fn distance(self, other: Vec2) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Unit vector in the same direction, or `Vec2::ZERO` for a zero-length
    /// input.
    pub fn normalized(self) -> Vec2 {
        let len = self.length();
        if len <= f32::EPSILON {
            Vec2::ZERO
        } else {
            Vec2::new(self.x / len, self.y / len)
        }
    }

    /// Bearing of this vector in radians, CCW from +x, in `(-π, π]`.
    #[inline]
    pub fn heading(self) -> f32 {
        self.y.atan2(self.x)
    }

    /// Rotate CCW by `angle` radians.
    pub fn rotated(self, angle: f32) -> Vec2 {
        let (sin, cos) = angle.sin_cos();
        Vec2::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Unsigned angle in radians between two vectors, in `[0, π]`.
    ///
    /// Returns `0.0` if either vector has zero length.
    pub fn angle_between(self, other: Vec2) -> f32 {
        let denom = (self.length_squared() * other.length_squared()).sqrt();
        if denom <= f32::EPSILON {
            return 0.0;
        }
        (self.dot(other) / denom).clamp(-1.0, 1.0).acos()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    #[inline]
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl std::fmt::Display for Vec2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

// ── Heading helpers ───────────────────────────────────────────────────────────

/// Wrap an angle into `(-π, π]`.
pub fn wrap_angle(angle: f32) -> f32 {
    let mut a = angle.rem_euclid(TAU);
    if a > PI {
        a -= TAU;
    }
    a
}

/// Signed shortest rotation from `from` to `to`, in `(-π, π]`.
#[inline]
pub fn shortest_angle_delta(from: f32, to: f32) -> f32 {
    wrap_angle(to - from)
}

/// Interpolate from heading `from` toward `to` along the shorter arc by
/// fraction `t` (clamped to `[0, 1]`).
pub fn lerp_heading(from: f32, to: f32, t: f32) -> f32 {
    wrap_angle(from + shortest_angle_delta(from, to) * t.clamp(0.0, 1.0))
}

// ── Pose ──────────────────────────────────────────────────────────────────────

/// Position plus heading: the whole of a vehicle's transform.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pose {
    pub position: Vec2,
    /// Radians, CCW from +x.
    pub heading: f32,
}

impl Pose {
    #[inline]
    pub fn new(position: Vec2, heading: f32) -> Self {
        Self { position, heading: wrap_angle(heading) }
    }

    /// Unit vector the vehicle is facing.
    #[inline]
    pub fn forward(&self) -> Vec2 {
        Vec2::from_heading(self.heading)
    }

    /// Move `distance` metres along the current heading.
    #[inline]
    pub fn advance(&mut self, distance: f32) {
        self.position += self.forward() * distance;
    }
}
