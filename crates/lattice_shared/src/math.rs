//! Mathematical types shared across the framework.
//!
//! These are the canonical representations stored inside Vector4 and
//! Matrix4 values.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// 4D Vector - position, color, rotation axis + angle
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec4 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
    /// W component
    pub w: f32,
}

impl Vec4 {
    /// Creates a new Vec4
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Unit X vector
    pub const X: Self = Self::new(1.0, 0.0, 0.0, 0.0);

    /// Unit Y vector
    pub const Y: Self = Self::new(0.0, 1.0, 0.0, 0.0);

    /// Unit Z vector
    pub const Z: Self = Self::new(0.0, 0.0, 1.0, 0.0);

    /// Unit W vector
    pub const W: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Converts to array
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    /// Creates from array
    #[must_use]
    pub const fn from_array(arr: [f32; 4]) -> Self {
        Self::new(arr[0], arr[1], arr[2], arr[3])
    }

    /// Dot product
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Length squared (avoids sqrt)
    #[must_use]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Length
    #[must_use]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }
}

impl std::ops::Add for Vec4 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z, self.w + rhs.w)
    }
}

impl std::ops::Sub for Vec4 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z, self.w - rhs.w)
    }
}

impl std::ops::Mul<f32> for Vec4 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs, self.w * rhs)
    }
}

/// 4x4 Matrix - transforms, stored as four row vectors
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Mat4 {
    /// The four rows of the matrix.
    pub rows: [Vec4; 4],
}

impl Mat4 {
    /// Creates a new Mat4 from four row vectors
    #[must_use]
    pub const fn new(r0: Vec4, r1: Vec4, r2: Vec4, r3: Vec4) -> Self {
        Self {
            rows: [r0, r1, r2, r3],
        }
    }

    /// All-zero matrix
    pub const ZERO: Self = Self::new(Vec4::ZERO, Vec4::ZERO, Vec4::ZERO, Vec4::ZERO);

    /// Identity matrix
    pub const IDENTITY: Self = Self::new(Vec4::X, Vec4::Y, Vec4::Z, Vec4::W);

    /// Returns one row of the matrix
    ///
    /// # Panics
    ///
    /// Panics if `index > 3`.
    #[must_use]
    pub const fn row(&self, index: usize) -> Vec4 {
        self.rows[index]
    }

    /// Converts to a flat 16-element array, row-major
    #[must_use]
    pub const fn to_array(self) -> [f32; 16] {
        [
            self.rows[0].x,
            self.rows[0].y,
            self.rows[0].z,
            self.rows[0].w,
            self.rows[1].x,
            self.rows[1].y,
            self.rows[1].z,
            self.rows[1].w,
            self.rows[2].x,
            self.rows[2].y,
            self.rows[2].z,
            self.rows[2].w,
            self.rows[3].x,
            self.rows[3].y,
            self.rows[3].z,
            self.rows[3].w,
        ]
    }

    /// Uniform scale matrix
    #[must_use]
    pub const fn scale(factor: f32) -> Self {
        Self::new(
            Vec4::new(factor, 0.0, 0.0, 0.0),
            Vec4::new(0.0, factor, 0.0, 0.0),
            Vec4::new(0.0, 0.0, factor, 0.0),
            Vec4::W,
        )
    }
}
