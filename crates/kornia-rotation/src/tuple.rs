//! Accessor contracts for the tuple, vector and quaternion types consumed by the kernels.
//!
//! The kernels of this crate never depend on a concrete vector type. They only read
//! components through `x()`, `y()`, `z()`, `s()` and write them back through `set(...)`.
//! Implementations are provided for the `glam` double precision types and for plain arrays.

use glam::{DQuat, DVec2, DVec3, DVec4};

/// A tuple with two components.
pub trait Tuple2 {
    /// The x component.
    fn x(&self) -> f64;
    /// The y component.
    fn y(&self) -> f64;
    /// Overwrite both components.
    fn set(&mut self, x: f64, y: f64);
}

/// A tuple with three components.
pub trait Tuple3 {
    /// The x component.
    fn x(&self) -> f64;
    /// The y component.
    fn y(&self) -> f64;
    /// The z component.
    fn z(&self) -> f64;
    /// Overwrite the three components.
    fn set(&mut self, x: f64, y: f64, z: f64);

    /// Euclidean norm of the tuple.
    #[inline]
    fn norm(&self) -> f64 {
        (self.x() * self.x() + self.y() * self.y() + self.z() * self.z()).sqrt()
    }

    /// Whether any component is NaN.
    #[inline]
    fn contains_nan(&self) -> bool {
        self.x().is_nan() || self.y().is_nan() || self.z().is_nan()
    }
}

/// A tuple with four components, `s` being the scalar (or homogeneous) part.
pub trait Tuple4 {
    /// The x component.
    fn x(&self) -> f64;
    /// The y component.
    fn y(&self) -> f64;
    /// The z component.
    fn z(&self) -> f64;
    /// The scalar component.
    fn s(&self) -> f64;
    /// Overwrite the four components.
    fn set(&mut self, x: f64, y: f64, z: f64, s: f64);

    /// Whether any component is NaN.
    #[inline]
    fn contains_nan(&self) -> bool {
        self.x().is_nan() || self.y().is_nan() || self.z().is_nan() || self.s().is_nan()
    }
}

impl Tuple2 for DVec2 {
    #[inline]
    fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    fn y(&self) -> f64 {
        self.y
    }

    #[inline]
    fn set(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }
}

impl Tuple2 for [f64; 2] {
    #[inline]
    fn x(&self) -> f64 {
        self[0]
    }

    #[inline]
    fn y(&self) -> f64 {
        self[1]
    }

    #[inline]
    fn set(&mut self, x: f64, y: f64) {
        *self = [x, y];
    }
}

impl Tuple3 for DVec3 {
    #[inline]
    fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    fn y(&self) -> f64 {
        self.y
    }

    #[inline]
    fn z(&self) -> f64 {
        self.z
    }

    #[inline]
    fn set(&mut self, x: f64, y: f64, z: f64) {
        *self = DVec3::new(x, y, z);
    }
}

impl Tuple3 for [f64; 3] {
    #[inline]
    fn x(&self) -> f64 {
        self[0]
    }

    #[inline]
    fn y(&self) -> f64 {
        self[1]
    }

    #[inline]
    fn z(&self) -> f64 {
        self[2]
    }

    #[inline]
    fn set(&mut self, x: f64, y: f64, z: f64) {
        *self = [x, y, z];
    }
}

impl Tuple4 for DVec4 {
    #[inline]
    fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    fn y(&self) -> f64 {
        self.y
    }

    #[inline]
    fn z(&self) -> f64 {
        self.z
    }

    #[inline]
    fn s(&self) -> f64 {
        self.w
    }

    #[inline]
    fn set(&mut self, x: f64, y: f64, z: f64, s: f64) {
        *self = DVec4::new(x, y, z, s);
    }
}

impl Tuple4 for DQuat {
    #[inline]
    fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    fn y(&self) -> f64 {
        self.y
    }

    #[inline]
    fn z(&self) -> f64 {
        self.z
    }

    #[inline]
    fn s(&self) -> f64 {
        self.w
    }

    #[inline]
    fn set(&mut self, x: f64, y: f64, z: f64, s: f64) {
        *self = DQuat::from_xyzw(x, y, z, s);
    }
}

/// Arrays follow the `[x, y, z, s]` layout used by `glam::DQuat::to_array`.
impl Tuple4 for [f64; 4] {
    #[inline]
    fn x(&self) -> f64 {
        self[0]
    }

    #[inline]
    fn y(&self) -> f64 {
        self[1]
    }

    #[inline]
    fn z(&self) -> f64 {
        self[2]
    }

    #[inline]
    fn s(&self) -> f64 {
        self[3]
    }

    #[inline]
    fn set(&mut self, x: f64, y: f64, z: f64, s: f64) {
        *self = [x, y, z, s];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glam_accessors() {
        let mut v = DVec3::new(1.0, 2.0, 3.0);
        assert_eq!((v.x(), Tuple3::y(&v), Tuple3::z(&v)), (1.0, 2.0, 3.0));
        Tuple3::set(&mut v, -1.0, -2.0, -3.0);
        assert_eq!(v, DVec3::new(-1.0, -2.0, -3.0));

        let mut q = DQuat::IDENTITY;
        assert_eq!(q.s(), 1.0);
        Tuple4::set(&mut q, 0.0, 0.0, 1.0, 0.0);
        assert_eq!(q.z, 1.0);
        assert_eq!(q.w, 0.0);
    }

    #[test]
    fn test_array_accessors() {
        let mut a = [3.0, 4.0, 0.0];
        assert_eq!(Tuple3::norm(&a), 5.0);
        Tuple3::set(&mut a, 0.0, f64::NAN, 0.0);
        assert!(Tuple3::contains_nan(&a));

        let q = [0.0, 0.0, 0.0, 1.0];
        assert_eq!(q.s(), 1.0);
    }
}
