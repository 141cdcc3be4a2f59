//! Capability traits shared by the 3x3 matrix types.
//!
//! - [`Matrix3ReadOnly`]: read access plus every query that does not mutate.
//! - [`Matrix3Basics`]: the mutations every matrix type can honour without breaking its invariant.
//! - [`RotationMatrixReadOnly`]: queries only meaningful on a proper rotation.
//! - [`Transform`]: the double-dispatch hook used to apply an arbitrary transform to a matrix.

use glam::{DQuat, DVec3};

use crate::conversion::{self, AxisAngle, YawPitchRoll};
use crate::error::Matrix3Error;
use crate::matrix3::Matrix3;
use crate::tuple::{Tuple2, Tuple3, Tuple4};
use crate::{faer_bridge, features, tools};

/// Read access to the nine coefficients of a 3x3 matrix.
pub trait Matrix3ReadOnly {
    /// Coefficient at row 0, column 0.
    fn m00(&self) -> f64;
    /// Coefficient at row 0, column 1.
    fn m01(&self) -> f64;
    /// Coefficient at row 0, column 2.
    fn m02(&self) -> f64;
    /// Coefficient at row 1, column 0.
    fn m10(&self) -> f64;
    /// Coefficient at row 1, column 1.
    fn m11(&self) -> f64;
    /// Coefficient at row 1, column 2.
    fn m12(&self) -> f64;
    /// Coefficient at row 2, column 0.
    fn m20(&self) -> f64;
    /// Coefficient at row 2, column 1.
    fn m21(&self) -> f64;
    /// Coefficient at row 2, column 2.
    fn m22(&self) -> f64;

    /// Transform the tuple in place by the inverse of this matrix.
    fn inverse_transform(&self, tuple: &mut impl Tuple3) -> Result<(), Matrix3Error>
    where
        Self: Sized;

    /// The coefficients in row-major order.
    #[inline]
    fn to_array(&self) -> [f64; 9] {
        [
            self.m00(),
            self.m01(),
            self.m02(),
            self.m10(),
            self.m11(),
            self.m12(),
            self.m20(),
            self.m21(),
            self.m22(),
        ]
    }

    /// The coefficient at (`row`, `col`).
    fn element(&self, row: usize, col: usize) -> Result<f64, Matrix3Error> {
        match (row, col) {
            (0, 0) => Ok(self.m00()),
            (0, 1) => Ok(self.m01()),
            (0, 2) => Ok(self.m02()),
            (1, 0) => Ok(self.m10()),
            (1, 1) => Ok(self.m11()),
            (1, 2) => Ok(self.m12()),
            (2, 0) => Ok(self.m20()),
            (2, 1) => Ok(self.m21()),
            (2, 2) => Ok(self.m22()),
            (row, col) => Err(Matrix3Error::IndexOutOfRange {
                index: if row > 2 { row } else { col },
            }),
        }
    }

    /// The row `row` as a vector.
    fn row(&self, row: usize) -> Result<DVec3, Matrix3Error> {
        match row {
            0 => Ok(DVec3::new(self.m00(), self.m01(), self.m02())),
            1 => Ok(DVec3::new(self.m10(), self.m11(), self.m12())),
            2 => Ok(DVec3::new(self.m20(), self.m21(), self.m22())),
            index => Err(Matrix3Error::IndexOutOfRange { index }),
        }
    }

    /// The column `col` as a vector.
    fn column(&self, col: usize) -> Result<DVec3, Matrix3Error> {
        match col {
            0 => Ok(DVec3::new(self.m00(), self.m10(), self.m20())),
            1 => Ok(DVec3::new(self.m01(), self.m11(), self.m21())),
            2 => Ok(DVec3::new(self.m02(), self.m12(), self.m22())),
            index => Err(Matrix3Error::IndexOutOfRange { index }),
        }
    }

    /// Determinant of the matrix.
    #[inline]
    fn determinant(&self) -> f64 {
        features::determinant(&self.to_array())
    }

    /// Sum of the diagonal coefficients.
    #[inline]
    fn trace(&self) -> f64 {
        self.m00() + self.m11() + self.m22()
    }

    /// Whether any coefficient is NaN.
    fn contains_nan(&self) -> bool {
        self.to_array().iter().any(|v| v.is_nan())
    }

    /// See [`features::is_identity`].
    fn is_identity(&self, epsilon: f64) -> bool {
        features::is_identity(&self.to_array(), epsilon)
    }

    /// See [`features::is_rotation_matrix`].
    fn is_rotation_matrix(&self, epsilon: f64) -> bool {
        features::is_rotation_matrix(&self.to_array(), epsilon)
    }

    /// See [`features::is_matrix_2d`].
    fn is_matrix_2d(&self, epsilon: f64) -> bool {
        features::is_matrix_2d(&self.to_array(), epsilon)
    }

    /// See [`features::is_skew_symmetric`].
    fn is_skew_symmetric(&self, epsilon: f64) -> bool {
        features::is_skew_symmetric(&self.to_array(), epsilon)
    }

    /// Per-coefficient comparison with any other matrix type.
    fn epsilon_equals(&self, other: &impl Matrix3ReadOnly, epsilon: f64) -> bool
    where
        Self: Sized,
    {
        features::epsilon_equals(&self.to_array(), &other.to_array(), epsilon)
    }

    /// Write the row-major coefficients into `buffer` starting at `offset`.
    fn write_to_slice(&self, buffer: &mut [f64], offset: usize) -> Result<(), Matrix3Error> {
        let len = buffer.len();
        let dst = offset
            .checked_add(9)
            .and_then(|end| buffer.get_mut(offset..end))
            .ok_or(Matrix3Error::SizeMismatch {
                expected: "at least 9 elements after the offset",
                rows: len.saturating_sub(offset),
                cols: 1,
            })?;
        dst.copy_from_slice(&self.to_array());
        Ok(())
    }

    /// Copy into a dense `faer` matrix.
    fn to_faer(&self) -> faer::Mat<f64> {
        faer_bridge::array9_to_faer_mat(&self.to_array())
    }

    /// Transform the tuple in place: `tuple = M * tuple`.
    fn transform(&self, tuple: &mut impl Tuple3)
    where
        Self: Sized,
    {
        let (x, y, z) = (tuple.x(), tuple.y(), tuple.z());
        tools::transform(self, &[x, y, z], tuple);
    }

    /// Transform a 2D tuple in place, optionally checking that the matrix is planar.
    fn transform_2d(&self, tuple: &mut impl Tuple2, check_if_2d: bool) -> Result<(), Matrix3Error>
    where
        Self: Sized,
    {
        let (x, y) = (tuple.x(), tuple.y());
        tools::transform_2d(self, &[x, y], tuple, check_if_2d)
    }

    /// Transform the xyz part of a homogeneous vector in place, `s` is left unchanged.
    fn transform_vector4(&self, vector: &mut impl Tuple4)
    where
        Self: Sized,
    {
        let (x, y, z, s) = (vector.x(), vector.y(), vector.z(), vector.s());
        tools::transform_vector4(self, &[x, y, z, s], vector);
    }
}

/// Mutations that every matrix type supports without breaking its own invariant.
pub trait Matrix3Basics: Matrix3ReadOnly {
    /// Reset to the neutral value of the type: zero for a generic matrix, identity for rotations.
    fn set_to_zero(&mut self);

    /// Set every coefficient to NaN.
    fn set_to_nan(&mut self);

    /// Set to identity.
    fn set_identity(&mut self);

    /// Set from row-major coefficients, failing if the type's invariant would be broken.
    ///
    /// On failure `self` is left unchanged.
    fn set_array(&mut self, coefficients: &[f64; 9]) -> Result<(), Matrix3Error>;

    /// Set from another matrix, failing if the type's invariant would be broken.
    fn set_from(&mut self, other: &impl Matrix3ReadOnly) -> Result<(), Matrix3Error>
    where
        Self: Sized,
    {
        self.set_array(&other.to_array())
    }

    /// Set from a flat row-major buffer starting at `offset`.
    fn set_from_slice(&mut self, buffer: &[f64], offset: usize) -> Result<(), Matrix3Error> {
        let coefficients = faer_bridge::slice_to_array9(buffer, offset)?;
        self.set_array(&coefficients)
    }
}

/// Queries on a matrix known to be a proper rotation.
pub trait RotationMatrixReadOnly: Matrix3ReadOnly + Sized {
    /// Rotation angle about the z axis.
    fn yaw(&self) -> f64 {
        conversion::compute_yaw(self)
    }

    /// Rotation angle about the y axis, in `[-π/2, π/2]`.
    fn pitch(&self) -> f64 {
        conversion::compute_pitch(self)
    }

    /// Rotation angle about the x axis.
    fn roll(&self) -> f64 {
        conversion::compute_roll(self)
    }

    /// The three angles at once, resolving the gimbal-lock configuration.
    fn yaw_pitch_roll(&self) -> YawPitchRoll {
        conversion::matrix_to_yaw_pitch_roll(self)
    }

    /// Euler angles packed as `(roll, pitch, yaw)`.
    fn euler(&self) -> DVec3 {
        let ypr = self.yaw_pitch_roll();
        DVec3::new(ypr.roll, ypr.pitch, ypr.yaw)
    }

    /// The equivalent unit quaternion.
    fn to_quaternion(&self) -> DQuat {
        conversion::matrix_to_quaternion(self)
    }

    /// The equivalent axis-angle.
    fn to_axis_angle(&self) -> AxisAngle {
        conversion::matrix_to_axis_angle(self)
    }

    /// The equivalent rotation vector.
    fn to_rotation_vector(&self) -> DVec3 {
        conversion::matrix_to_rotation_vector(self)
    }
}

/// A transform that knows how to apply itself to a 3x3 matrix.
///
/// Matrix types call into this to delegate the meaning of "transform" to the transform itself.
pub trait Transform {
    /// Apply the transform to `matrix` in place.
    fn transform_matrix(&self, matrix: &mut Matrix3) -> Result<(), Matrix3Error>;

    /// Apply the inverse of the transform to `matrix` in place.
    fn inverse_transform_matrix(&self, matrix: &mut Matrix3) -> Result<(), Matrix3Error>;
}
