//! Integer index vectors and the spatial dimension.
//!
//! All index-space quantities are stored in three-component vectors.
//! In two dimensions the third component is inactive and kept at zero;
//! operations that walk axes take a [`Dim`] and never touch inactive
//! components.

use std::fmt;
use std::ops::{Add, Index, IndexMut, Mul, Neg, Sub};

use crate::error::ConfigError;

/// Largest supported spatial dimension.
pub const MAX_DIM: usize = 3;

/// Spatial dimension of a hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dim {
    /// Two spatial dimensions.
    Two,
    /// Three spatial dimensions.
    Three,
}

impl Dim {
    /// Number of active axes.
    pub fn count(self) -> usize {
        match self {
            Self::Two => 2,
            Self::Three => 3,
        }
    }

    /// Iterator over the active axis numbers.
    pub fn axes(self) -> std::ops::Range<usize> {
        0..self.count()
    }
}

impl TryFrom<usize> for Dim {
    type Error = ConfigError;

    fn try_from(n: usize) -> Result<Self, Self::Error> {
        match n {
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            other => Err(ConfigError::UnsupportedDimension(other)),
        }
    }
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}D", self.count())
    }
}

/// A point, extent, shift or ratio in integer index space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct IntVector(pub [i32; MAX_DIM]);

impl IntVector {
    /// The zero vector.
    pub const ZERO: Self = Self([0; MAX_DIM]);

    /// Build a vector from explicit components.
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self([x, y, z])
    }

    /// Vector with `v` on every active axis of `dim` and zero elsewhere.
    pub fn splat(dim: Dim, v: i32) -> Self {
        let mut out = Self::ZERO;
        for a in dim.axes() {
            out.0[a] = v;
        }
        out
    }

    /// Unit vector along `axis`.
    pub fn unit(axis: usize) -> Self {
        let mut out = Self::ZERO;
        out.0[axis] = 1;
        out
    }

    /// Smallest active component.
    pub fn min_over(self, dim: Dim) -> i32 {
        dim.axes().map(|a| self.0[a]).min().unwrap_or(0)
    }

    /// Largest active component.
    pub fn max_over(self, dim: Dim) -> i32 {
        dim.axes().map(|a| self.0[a]).max().unwrap_or(0)
    }

    /// True when every active component equals the same value.
    pub fn is_uniform(self, dim: Dim) -> bool {
        self.min_over(dim) == self.max_over(dim)
    }

    /// True when every active component is `>= bound`.
    pub fn all_at_least(self, dim: Dim, bound: i32) -> bool {
        dim.axes().all(|a| self.0[a] >= bound)
    }

    /// Componentwise floor division by a positive ratio on active axes.
    pub fn floor_div(self, ratio: IntVector, dim: Dim) -> Self {
        let mut out = Self::ZERO;
        for a in dim.axes() {
            out.0[a] = self.0[a].div_euclid(ratio.0[a]);
        }
        out
    }

    /// Componentwise product restricted to active axes.
    pub fn scale(self, ratio: IntVector, dim: Dim) -> Self {
        let mut out = Self::ZERO;
        for a in dim.axes() {
            out.0[a] = self.0[a] * ratio.0[a];
        }
        out
    }
}

impl fmt::Display for IntVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.0[0], self.0[1], self.0[2])
    }
}

impl From<[i32; MAX_DIM]> for IntVector {
    fn from(v: [i32; MAX_DIM]) -> Self {
        Self(v)
    }
}

impl Index<usize> for IntVector {
    type Output = i32;

    fn index(&self, axis: usize) -> &i32 {
        &self.0[axis]
    }
}

impl IndexMut<usize> for IntVector {
    fn index_mut(&mut self, axis: usize) -> &mut i32 {
        &mut self.0[axis]
    }
}

impl Add for IntVector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self([self.0[0] + rhs.0[0], self.0[1] + rhs.0[1], self.0[2] + rhs.0[2]])
    }
}

impl Sub for IntVector {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self([self.0[0] - rhs.0[0], self.0[1] - rhs.0[1], self.0[2] - rhs.0[2]])
    }
}

impl Neg for IntVector {
    type Output = Self;

    fn neg(self) -> Self {
        Self([-self.0[0], -self.0[1], -self.0[2]])
    }
}

impl Mul<i32> for IntVector {
    type Output = Self;

    fn mul(self, rhs: i32) -> Self {
        Self([self.0[0] * rhs, self.0[1] * rhs, self.0[2] * rhs])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splat_leaves_inactive_axis_zero() {
        assert_eq!(IntVector::splat(Dim::Two, 3), IntVector::new(3, 3, 0));
        assert_eq!(IntVector::splat(Dim::Three, 3), IntVector::new(3, 3, 3));
    }

    #[test]
    fn floor_div_rounds_toward_negative_infinity() {
        let r = IntVector::splat(Dim::Two, 2);
        let v = IntVector::new(-1, 5, 9).floor_div(r, Dim::Two);
        assert_eq!(v, IntVector::new(-1, 2, 0));
    }

    #[test]
    fn uniformity_ignores_inactive_axis() {
        assert!(IntVector::new(1, 1, 0).is_uniform(Dim::Two));
        assert!(!IntVector::new(1, 1, 0).is_uniform(Dim::Three));
    }

    #[test]
    fn dim_from_usize() {
        assert_eq!(Dim::try_from(2).unwrap(), Dim::Two);
        assert_eq!(Dim::try_from(3).unwrap(), Dim::Three);
        assert!(Dim::try_from(1).is_err());
    }
}
