use std::fmt;

use glam::DVec3;

use crate::error::Matrix3Error;
use crate::features;
use crate::matrix3::Matrix3;
use crate::rotation_matrix::RotationMatrix;
use crate::rotation_scale_tools;
use crate::tools;
use crate::traits::{Matrix3Basics, Matrix3ReadOnly, Transform};
use crate::tuple::{Tuple2, Tuple3, Tuple4};
use crate::EPS_CHECK_ROTATION;

/// A rotation followed by a positive, possibly non-uniform, scale: `M = R * diag(scale)`.
///
/// The rotation and the scale are stored separately and the composite coefficients are computed
/// on read, `M(i, j) = R(i, j) * scale(j)`. Each scale component is strictly positive, so
/// reflections cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationScaleMatrix {
    rotation: RotationMatrix,
    scale: DVec3,
}

impl Default for RotationScaleMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl RotationScaleMatrix {
    /// Identity rotation with a unit scale.
    pub const IDENTITY: Self = Self {
        rotation: RotationMatrix::IDENTITY,
        scale: DVec3::ONE,
    };

    /// Create a new rotation-scale matrix.
    ///
    /// # Arguments
    ///
    /// * `rotation` - The rotation part.
    /// * `scale` - The scale along each axis, applied before the rotation.
    ///
    /// # Returns
    ///
    /// The matrix, or [`Matrix3Error::NonPositiveScale`] if a scale component is not positive.
    pub fn new(rotation: RotationMatrix, scale: &impl Tuple3) -> Result<Self, Matrix3Error> {
        let mut matrix = Self {
            rotation,
            scale: DVec3::ONE,
        };
        matrix.set_scale(scale.x(), scale.y(), scale.z())?;
        Ok(matrix)
    }

    /// Decompose row-major coefficients into a rotation and a scale, see [`Self::set`].
    pub fn try_from_array(coefficients: &[f64; 9]) -> Result<Self, Matrix3Error> {
        let mut matrix = Self::IDENTITY;
        matrix.set(coefficients)?;
        Ok(matrix)
    }

    /// Decompose row-major coefficients into a rotation and a scale.
    ///
    /// The scale is the norm of each column and the rotation is made of the normalized columns.
    /// Fails with [`Matrix3Error::NotARotationScaleMatrix`] if the determinant is not positive,
    /// a column vanishes or the normalized columns are not a rotation. On failure `self` is left
    /// unchanged.
    pub fn set(&mut self, coefficients: &[f64; 9]) -> Result<(), Matrix3Error> {
        let reject = || {
            log::debug!("cannot decompose {coefficients:?} into a rotation and a scale");
            Matrix3Error::NotARotationScaleMatrix {
                coefficients: *coefficients,
            }
        };

        // also rejects NaN
        let determinant = features::determinant(coefficients);
        if !(determinant > 0.0) {
            return Err(reject());
        }

        let matrix = Matrix3::from_array(coefficients);
        let mut scale = [0.0; 3];
        for (j, s) in scale.iter_mut().enumerate() {
            *s = matrix.column(j)?.length();
        }
        if scale.iter().any(|s| !(s.is_finite() && *s > 0.0)) {
            return Err(reject());
        }

        let mut rotation = matrix;
        rotation.scale_columns(1.0 / scale[0], 1.0 / scale[1], 1.0 / scale[2]);
        let rotation = rotation.to_array();
        if !features::is_rotation_matrix(&rotation, EPS_CHECK_ROTATION) {
            return Err(reject());
        }

        self.rotation = RotationMatrix::from_array_unchecked(&rotation);
        self.scale = DVec3::from_array(scale);
        Ok(())
    }

    /// The rotation part.
    #[inline]
    pub fn rotation(&self) -> &RotationMatrix {
        &self.rotation
    }

    /// Mutable access to the rotation part, which keeps its own invariant.
    #[inline]
    pub fn rotation_mut(&mut self) -> &mut RotationMatrix {
        &mut self.rotation
    }

    /// The scale part.
    #[inline]
    pub fn scale(&self) -> DVec3 {
        self.scale
    }

    /// Largest of the three scale components.
    #[inline]
    pub fn max_scale(&self) -> f64 {
        tools::max(self.scale.x, self.scale.y, self.scale.z)
    }

    /// Replace the rotation part, the scale is kept.
    #[inline]
    pub fn set_rotation(&mut self, rotation: &RotationMatrix) {
        self.rotation = *rotation;
    }

    /// Set the scale, failing with [`Matrix3Error::NonPositiveScale`] if a component is not
    /// positive and finite. On failure `self` is left unchanged.
    pub fn set_scale(&mut self, x: f64, y: f64, z: f64) -> Result<(), Matrix3Error> {
        let valid = |s: f64| s.is_finite() && s > 0.0;
        if !(valid(x) && valid(y) && valid(z)) {
            log::debug!("rejected scale ({x}, {y}, {z})");
            return Err(Matrix3Error::NonPositiveScale { x, y, z });
        }
        self.scale = DVec3::new(x, y, z);
        Ok(())
    }

    /// Set the same scale along the three axes.
    pub fn set_scale_uniform(&mut self, scale: f64) -> Result<(), Matrix3Error> {
        self.set_scale(scale, scale, scale)
    }

    /// Set both parts at once. On failure `self` is left unchanged.
    pub fn set_rotation_and_scale(
        &mut self,
        rotation: &RotationMatrix,
        scale: &impl Tuple3,
    ) -> Result<(), Matrix3Error> {
        self.set_scale(scale.x(), scale.y(), scale.z())?;
        self.rotation = *rotation;
        Ok(())
    }

    /// Multiply the scale component-wise by `(x, y, z)`.
    pub fn append_scale(&mut self, x: f64, y: f64, z: f64) -> Result<(), Matrix3Error> {
        self.set_scale(self.scale.x * x, self.scale.y * y, self.scale.z * z)
    }

    /// Reset the scale to one.
    #[inline]
    pub fn reset_scale(&mut self) {
        self.scale = DVec3::ONE;
    }

    /// `R = R * other`, the scale is unchanged.
    pub fn append_rotation(&mut self, other: &RotationMatrix) {
        self.rotation.multiply(other);
    }

    /// `R = other * R`, which is `M = other * M`.
    pub fn prepend_rotation(&mut self, other: &RotationMatrix) {
        self.rotation.pre_multiply(other);
    }

    /// `R = R * Rz(yaw)`.
    pub fn append_yaw_rotation(&mut self, yaw: f64) {
        self.rotation.append_yaw_rotation(yaw);
    }

    /// `R = R * Ry(pitch)`.
    pub fn append_pitch_rotation(&mut self, pitch: f64) {
        self.rotation.append_pitch_rotation(pitch);
    }

    /// `R = R * Rx(roll)`.
    pub fn append_roll_rotation(&mut self, roll: f64) {
        self.rotation.append_roll_rotation(roll);
    }

    /// `R = Rz(yaw) * R`.
    pub fn prepend_yaw_rotation(&mut self, yaw: f64) {
        self.rotation.prepend_yaw_rotation(yaw);
    }

    /// `R = Ry(pitch) * R`.
    pub fn prepend_pitch_rotation(&mut self, pitch: f64) {
        self.rotation.prepend_pitch_rotation(pitch);
    }

    /// `R = Rx(roll) * R`.
    pub fn prepend_roll_rotation(&mut self, roll: f64) {
        self.rotation.prepend_roll_rotation(roll);
    }

    /// Inverse of [`Matrix3ReadOnly::transform_2d`], the planar check applies to the rotation.
    pub fn inverse_transform_2d(
        &self,
        tuple: &mut impl Tuple2,
        check_if_2d: bool,
    ) -> Result<(), Matrix3Error> {
        let original = [tuple.x(), tuple.y()];
        rotation_scale_tools::inverse_transform_2d(self, &original, tuple, check_if_2d)
    }

    /// Transform the xyz part of a homogeneous vector by the inverse, `s` is left unchanged.
    pub fn inverse_transform_vector4(&self, vector: &mut impl Tuple4) {
        let original = [vector.x(), vector.y(), vector.z(), vector.s()];
        rotation_scale_tools::inverse_transform_vector4(self, &original, vector);
    }

    /// Rotate a quaternion in place, the scale does not apply to an orientation.
    pub fn transform_quaternion(&self, quaternion: &mut impl Tuple4) {
        self.rotation.transform_quaternion(quaternion);
    }

    /// Rotate a quaternion in place by the inverse rotation.
    pub fn inverse_transform_quaternion(&self, quaternion: &mut impl Tuple4) {
        self.rotation.inverse_transform_quaternion(quaternion);
    }
}

impl Matrix3ReadOnly for RotationScaleMatrix {
    #[inline]
    fn m00(&self) -> f64 {
        self.rotation.m00() * self.scale.x
    }

    #[inline]
    fn m01(&self) -> f64 {
        self.rotation.m01() * self.scale.y
    }

    #[inline]
    fn m02(&self) -> f64 {
        self.rotation.m02() * self.scale.z
    }

    #[inline]
    fn m10(&self) -> f64 {
        self.rotation.m10() * self.scale.x
    }

    #[inline]
    fn m11(&self) -> f64 {
        self.rotation.m11() * self.scale.y
    }

    #[inline]
    fn m12(&self) -> f64 {
        self.rotation.m12() * self.scale.z
    }

    #[inline]
    fn m20(&self) -> f64 {
        self.rotation.m20() * self.scale.x
    }

    #[inline]
    fn m21(&self) -> f64 {
        self.rotation.m21() * self.scale.y
    }

    #[inline]
    fn m22(&self) -> f64 {
        self.rotation.m22() * self.scale.z
    }

    fn transform(&self, tuple: &mut impl Tuple3) {
        let original = [tuple.x(), tuple.y(), tuple.z()];
        rotation_scale_tools::transform(self, &original, tuple);
    }

    /// Only the rotation part needs to be planar for the check to pass.
    fn transform_2d(&self, tuple: &mut impl Tuple2, check_if_2d: bool) -> Result<(), Matrix3Error> {
        let original = [tuple.x(), tuple.y()];
        rotation_scale_tools::transform_2d(self, &original, tuple, check_if_2d)
    }

    fn transform_vector4(&self, vector: &mut impl Tuple4) {
        let original = [vector.x(), vector.y(), vector.z(), vector.s()];
        rotation_scale_tools::transform_vector4(self, &original, vector);
    }

    /// The scale is strictly positive, so this never fails.
    fn inverse_transform(&self, tuple: &mut impl Tuple3) -> Result<(), Matrix3Error> {
        let original = [tuple.x(), tuple.y(), tuple.z()];
        rotation_scale_tools::inverse_transform(self, &original, tuple);
        Ok(())
    }
}

impl Matrix3Basics for RotationScaleMatrix {
    /// Resets both parts: identity rotation and unit scale.
    fn set_to_zero(&mut self) {
        *self = Self::IDENTITY;
    }

    fn set_to_nan(&mut self) {
        self.rotation.set_to_nan();
        self.scale = DVec3::NAN;
    }

    fn set_identity(&mut self) {
        *self = Self::IDENTITY;
    }

    fn set_array(&mut self, coefficients: &[f64; 9]) -> Result<(), Matrix3Error> {
        self.set(coefficients)
    }
}

/// Conjugation of another matrix: `M' = R * S * M * S⁻¹ * Rᵗ`.
impl Transform for RotationScaleMatrix {
    fn transform_matrix(&self, matrix: &mut Matrix3) -> Result<(), Matrix3Error> {
        *matrix = rotation_scale_tools::transform_matrix(self, matrix);
        Ok(())
    }

    fn inverse_transform_matrix(&self, matrix: &mut Matrix3) -> Result<(), Matrix3Error> {
        *matrix = rotation_scale_tools::inverse_transform_matrix(self, matrix);
        Ok(())
    }
}

impl From<RotationMatrix> for RotationScaleMatrix {
    fn from(rotation: RotationMatrix) -> Self {
        Self {
            rotation,
            scale: DVec3::ONE,
        }
    }
}

impl From<RotationScaleMatrix> for Matrix3 {
    fn from(matrix: RotationScaleMatrix) -> Self {
        Matrix3::from_array(&matrix.to_array())
    }
}

impl TryFrom<[f64; 9]> for RotationScaleMatrix {
    type Error = Matrix3Error;

    fn try_from(coefficients: [f64; 9]) -> Result<Self, Self::Error> {
        Self::try_from_array(&coefficients)
    }
}

impl fmt::Display for RotationScaleMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&features::matrix_to_string(&self.to_array()))
    }
}
