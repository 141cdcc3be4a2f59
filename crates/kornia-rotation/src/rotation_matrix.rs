use std::fmt;

use glam::{DMat3, DVec3};
use rand::Rng;

use crate::conversion;
use crate::error::Matrix3Error;
use crate::faer_bridge;
use crate::features;
use crate::matrix3::Matrix3;
use crate::tools;
use crate::traits::{Matrix3Basics, Matrix3ReadOnly, RotationMatrixReadOnly, Transform};
use crate::tuple::{Tuple2, Tuple3, Tuple4};
use crate::EPS_CHECK_ROTATION;

/// A 3x3 rotation matrix (double precision).
///
/// The rows and columns are orthonormal and the determinant is one, within
/// [`EPS_CHECK_ROTATION`]. Every mutation either validates its input and rejects it without
/// touching `self`, or re-orthonormalizes the result. The only exception is the NaN sentinel set
/// by [`Matrix3Basics::set_to_nan`], used to flag an invalid or uninitialized rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationMatrix {
    data: [f64; 9],
}

impl Default for RotationMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl RotationMatrix {
    /// The zero rotation.
    pub const IDENTITY: Self = Self {
        data: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
    };

    /// Create a rotation from row-major coefficients, checking that they describe a rotation.
    ///
    /// # Arguments
    ///
    /// * `coefficients` - The row-major coefficients.
    ///
    /// # Returns
    ///
    /// The rotation, or [`Matrix3Error::NotARotationMatrix`] carrying the rejected coefficients.
    pub fn try_from_array(coefficients: &[f64; 9]) -> Result<Self, Matrix3Error> {
        let mut rotation = Self::IDENTITY;
        rotation.set(coefficients)?;
        Ok(rotation)
    }

    /// Create a rotation from a dense `faer` matrix, which must be 3x3 and orthonormal.
    pub fn try_from_faer(mat: faer::MatRef<'_, f64>) -> Result<Self, Matrix3Error> {
        Self::try_from_array(&faer_bridge::faer_mat_to_array9(mat)?)
    }

    /// Create a rotation by orthonormalizing an arbitrary matrix, see [`tools::normalize`].
    pub fn from_normalized(matrix: &impl Matrix3ReadOnly) -> Result<Self, Matrix3Error> {
        let mut rotation = Self::IDENTITY;
        rotation.set_and_normalize(&matrix.to_array())?;
        Ok(rotation)
    }

    /// Create a rotation from a quaternion `(x, y, z, s)`, see [`conversion::quaternion_to_matrix`].
    #[inline]
    pub fn from_quaternion(quaternion: &impl Tuple4) -> Self {
        conversion::quaternion_to_matrix(quaternion)
    }

    /// Create a rotation of `angle` radians about `axis`.
    #[inline]
    pub fn from_axis_angle(axis: &impl Tuple3, angle: f64) -> Self {
        conversion::axis_angle_to_matrix(axis, angle)
    }

    /// Create a rotation from a rotation vector.
    #[inline]
    pub fn from_rotation_vector(rotation_vector: &impl Tuple3) -> Self {
        conversion::rotation_vector_to_matrix(rotation_vector)
    }

    /// Create the rotation `Rz(yaw) * Ry(pitch) * Rx(roll)`.
    #[inline]
    pub fn from_yaw_pitch_roll(yaw: f64, pitch: f64, roll: f64) -> Self {
        conversion::yaw_pitch_roll_to_matrix(yaw, pitch, roll)
    }

    /// Create a rotation drawn uniformly over SO(3) with the thread-local generator.
    pub fn from_random() -> Self {
        Self::from_random_with_rng(&mut rand::rng())
    }

    /// Create a rotation drawn uniformly over SO(3) with the given generator.
    pub fn from_random_with_rng(rng: &mut impl Rng) -> Self {
        let r1: f64 = rng.random();
        let r2: f64 = rng.random();
        let r3: f64 = rng.random();

        // uniform random quaternion (Shoemake method)
        let one_minus_r1_sqrt = (1.0 - r1).sqrt();
        let r1_sqrt = r1.sqrt();

        let s = one_minus_r1_sqrt * (2.0 * std::f64::consts::PI * r2).cos();
        let x = one_minus_r1_sqrt * (2.0 * std::f64::consts::PI * r2).sin();
        let y = r1_sqrt * (2.0 * std::f64::consts::PI * r3).cos();
        let z = r1_sqrt * (2.0 * std::f64::consts::PI * r3).sin();

        conversion::quaternion_to_matrix(&[x, y, z, s])
    }

    /// Build from coefficients already known to be orthonormal. Reserved to the conversions.
    #[inline]
    pub(crate) const fn from_array_unchecked(data: &[f64; 9]) -> Self {
        Self { data: *data }
    }

    #[inline]
    pub(crate) const fn nan() -> Self {
        Self {
            data: [f64::NAN; 9],
        }
    }

    /// Set from row-major coefficients, rejecting anything that is not a rotation.
    ///
    /// On failure `self` is left unchanged. A NaN anywhere in the input stores the NaN sentinel.
    pub fn set(&mut self, coefficients: &[f64; 9]) -> Result<(), Matrix3Error> {
        features::check_if_rotation_matrix(coefficients, EPS_CHECK_ROTATION)?;
        if coefficients.iter().any(|v| v.is_nan()) {
            self.set_to_nan();
        } else {
            self.data = *coefficients;
        }
        Ok(())
    }

    /// Set from another rotation, no check needed.
    #[inline]
    pub fn set_rotation(&mut self, other: &RotationMatrix) {
        self.data = other.data;
    }

    /// Set from arbitrary coefficients and orthonormalize them.
    ///
    /// Fails with [`Matrix3Error::DegenerateMatrix`] when a column vanishes and with
    /// [`Matrix3Error::NotARotationMatrix`] when the coefficients have a negative determinant,
    /// since orthonormalizing them yields a reflection. On failure `self` is left unchanged.
    pub fn set_and_normalize(&mut self, coefficients: &[f64; 9]) -> Result<(), Matrix3Error> {
        self.data = normalize_proper(&Matrix3::from_array(coefficients))?;
        Ok(())
    }

    /// Re-orthonormalize in place to remove the drift accumulated by floating point operations.
    pub fn normalize(&mut self) {
        self.commit_normalized(Matrix3::from_array(&self.data));
    }

    // A product of rotations is a rotation, the error arm is unreachable.
    fn commit_normalized(&mut self, matrix: Matrix3) {
        match normalize_proper(&matrix) {
            Ok(normalized) => self.data = normalized,
            Err(err) => {
                log::debug!("rotation lost its invariant, setting it to NaN: {err}");
                self.set_to_nan();
            }
        }
    }

    /// Invert in place. For a rotation the inverse is the transpose, so this never fails.
    #[inline]
    pub fn invert(&mut self) {
        self.transpose();
    }

    /// Transpose in place.
    pub fn transpose(&mut self) {
        self.data.swap(1, 3);
        self.data.swap(2, 6);
        self.data.swap(5, 7);
    }

    /// Inverse rotation.
    #[inline]
    pub fn inverse(&self) -> Self {
        let mut inverse = *self;
        inverse.transpose();
        inverse
    }

    /// Set to the inverse of `other`.
    #[inline]
    pub fn set_and_invert(&mut self, other: &RotationMatrix) {
        *self = other.inverse();
    }

    /// `self = self * other`.
    pub fn multiply(&mut self, other: &RotationMatrix) {
        self.commit_normalized(tools::multiply(self, other));
    }

    /// `self = selfᵗ * other`.
    pub fn multiply_transpose_this(&mut self, other: &RotationMatrix) {
        self.commit_normalized(tools::multiply_transpose_left(self, other));
    }

    /// `self = self * otherᵗ`.
    pub fn multiply_transpose_other(&mut self, other: &RotationMatrix) {
        self.commit_normalized(tools::multiply_transpose_right(self, other));
    }

    /// `self = selfᵗ * otherᵗ`.
    pub fn multiply_transpose_both(&mut self, other: &RotationMatrix) {
        self.commit_normalized(tools::multiply_transpose_both(self, other));
    }

    /// `self = self⁻¹ * other`.
    #[inline]
    pub fn multiply_invert_this(&mut self, other: &RotationMatrix) {
        self.multiply_transpose_this(other);
    }

    /// `self = self * other⁻¹`.
    #[inline]
    pub fn multiply_invert_other(&mut self, other: &RotationMatrix) {
        self.multiply_transpose_other(other);
    }

    /// `self = other * self`.
    pub fn pre_multiply(&mut self, other: &RotationMatrix) {
        self.commit_normalized(tools::multiply(other, self));
    }

    /// `self = other * selfᵗ`.
    pub fn pre_multiply_transpose_this(&mut self, other: &RotationMatrix) {
        self.commit_normalized(tools::multiply_transpose_right(other, self));
    }

    /// `self = otherᵗ * self`.
    pub fn pre_multiply_transpose_other(&mut self, other: &RotationMatrix) {
        self.commit_normalized(tools::multiply_transpose_left(other, self));
    }

    /// `self = otherᵗ * selfᵗ`.
    pub fn pre_multiply_transpose_both(&mut self, other: &RotationMatrix) {
        self.commit_normalized(tools::multiply_transpose_both(other, self));
    }

    /// `self = other * self⁻¹`.
    #[inline]
    pub fn pre_multiply_invert_this(&mut self, other: &RotationMatrix) {
        self.pre_multiply_transpose_this(other);
    }

    /// `self = other⁻¹ * self`.
    #[inline]
    pub fn pre_multiply_invert_other(&mut self, other: &RotationMatrix) {
        self.pre_multiply_transpose_other(other);
    }

    /// `self = self * Rz(yaw)`.
    pub fn append_yaw_rotation(&mut self, yaw: f64) {
        let mut rz = Matrix3::ZERO;
        rz.set_to_yaw_matrix(yaw);
        self.commit_normalized(tools::multiply(self, &rz));
    }

    /// `self = self * Ry(pitch)`.
    pub fn append_pitch_rotation(&mut self, pitch: f64) {
        let mut ry = Matrix3::ZERO;
        ry.set_to_pitch_matrix(pitch);
        self.commit_normalized(tools::multiply(self, &ry));
    }

    /// `self = self * Rx(roll)`.
    pub fn append_roll_rotation(&mut self, roll: f64) {
        let mut rx = Matrix3::ZERO;
        rx.set_to_roll_matrix(roll);
        self.commit_normalized(tools::multiply(self, &rx));
    }

    /// `self = Rz(yaw) * self`.
    pub fn prepend_yaw_rotation(&mut self, yaw: f64) {
        let mut rz = Matrix3::ZERO;
        rz.set_to_yaw_matrix(yaw);
        self.commit_normalized(tools::multiply(&rz, self));
    }

    /// `self = Ry(pitch) * self`.
    pub fn prepend_pitch_rotation(&mut self, pitch: f64) {
        let mut ry = Matrix3::ZERO;
        ry.set_to_pitch_matrix(pitch);
        self.commit_normalized(tools::multiply(&ry, self));
    }

    /// `self = Rx(roll) * self`.
    pub fn prepend_roll_rotation(&mut self, roll: f64) {
        let mut rx = Matrix3::ZERO;
        rx.set_to_roll_matrix(roll);
        self.commit_normalized(tools::multiply(&rx, self));
    }

    /// Set to a rotation of `yaw` radians about the z axis.
    pub fn set_to_yaw_matrix(&mut self, yaw: f64) {
        *self = Self::from_yaw_pitch_roll(yaw, 0.0, 0.0);
    }

    /// Set to a rotation of `pitch` radians about the y axis.
    pub fn set_to_pitch_matrix(&mut self, pitch: f64) {
        *self = Self::from_yaw_pitch_roll(0.0, pitch, 0.0);
    }

    /// Set to a rotation of `roll` radians about the x axis.
    pub fn set_to_roll_matrix(&mut self, roll: f64) {
        *self = Self::from_yaw_pitch_roll(0.0, 0.0, roll);
    }

    /// Angle in `[0, π]` of the rotation taking `self` onto `other`.
    pub fn distance(&self, other: &RotationMatrix) -> f64 {
        let relative = tools::multiply_transpose_left(self, other);
        conversion::matrix_to_axis_angle(&relative).angle
    }

    /// Geodesic interpolation between two rotations, `alpha = 0` giving `r0` and `alpha = 1`
    /// giving `r1`.
    pub fn interpolate(r0: &RotationMatrix, r1: &RotationMatrix, alpha: f64) -> Self {
        let relative = tools::multiply_transpose_left(r0, r1);
        let rotation_vector = conversion::matrix_to_rotation_vector(&relative) * alpha;
        let mut result = *r0;
        result.multiply(&Self::from_rotation_vector(&rotation_vector));
        result
    }

    /// Apply `transform` and re-orthonormalize the result.
    ///
    /// On failure `self` is left unchanged.
    pub fn apply_transform(&mut self, transform: &impl Transform) -> Result<(), Matrix3Error> {
        let mut matrix = Matrix3::from(*self);
        transform.transform_matrix(&mut matrix)?;
        self.set_and_normalize(&matrix.to_array())
    }

    /// Apply the inverse of `transform` and re-orthonormalize the result.
    pub fn apply_inverse_transform(
        &mut self,
        transform: &impl Transform,
    ) -> Result<(), Matrix3Error> {
        let mut matrix = Matrix3::from(*self);
        transform.inverse_transform_matrix(&mut matrix)?;
        self.set_and_normalize(&matrix.to_array())
    }

    /// Transform a 2D tuple by the transpose of the upper-left block, see [`tools::transform_2d`].
    pub fn inverse_transform_2d(
        &self,
        tuple: &mut impl Tuple2,
        check_if_2d: bool,
    ) -> Result<(), Matrix3Error> {
        let (x, y) = (tuple.x(), tuple.y());
        tools::transform_2d(&self.inverse(), &[x, y], tuple, check_if_2d)
    }

    /// Transform the xyz part of a homogeneous vector by the inverse rotation.
    pub fn inverse_transform_vector4(&self, vector: &mut impl Tuple4) {
        self.inverse().transform_vector4(vector);
    }

    /// Rotate a quaternion in place: `q = q(self) ⊗ q`.
    pub fn transform_quaternion(&self, quaternion: &mut impl Tuple4) {
        let original = [quaternion.x(), quaternion.y(), quaternion.z(), quaternion.s()];
        tools::transform_quaternion(self, &original, quaternion);
    }

    /// Rotate a quaternion in place by the inverse rotation: `q = q(self)⁻¹ ⊗ q`.
    pub fn inverse_transform_quaternion(&self, quaternion: &mut impl Tuple4) {
        let original = [quaternion.x(), quaternion.y(), quaternion.z(), quaternion.s()];
        tools::inverse_transform_quaternion(self, &original, quaternion);
    }
}

// Gram-Schmidt keeps the handedness of its input, a negative determinant would survive it.
fn normalize_proper(matrix: &Matrix3) -> Result<[f64; 9], Matrix3Error> {
    let normalized = tools::normalize(matrix)?.to_array();
    if features::determinant(&normalized) < 0.0 {
        let coefficients = matrix.to_array();
        log::debug!("rejected reflection {coefficients:?}");
        return Err(Matrix3Error::NotARotationMatrix { coefficients });
    }
    Ok(normalized)
}

impl Matrix3ReadOnly for RotationMatrix {
    #[inline]
    fn m00(&self) -> f64 {
        self.data[0]
    }

    #[inline]
    fn m01(&self) -> f64 {
        self.data[1]
    }

    #[inline]
    fn m02(&self) -> f64 {
        self.data[2]
    }

    #[inline]
    fn m10(&self) -> f64 {
        self.data[3]
    }

    #[inline]
    fn m11(&self) -> f64 {
        self.data[4]
    }

    #[inline]
    fn m12(&self) -> f64 {
        self.data[5]
    }

    #[inline]
    fn m20(&self) -> f64 {
        self.data[6]
    }

    #[inline]
    fn m21(&self) -> f64 {
        self.data[7]
    }

    #[inline]
    fn m22(&self) -> f64 {
        self.data[8]
    }

    #[inline]
    fn to_array(&self) -> [f64; 9] {
        self.data
    }

    /// Rotates by the transpose, a rotation is never singular.
    fn inverse_transform(&self, tuple: &mut impl Tuple3) -> Result<(), Matrix3Error> {
        let original = [tuple.x(), tuple.y(), tuple.z()];
        tools::transform(&self.inverse(), &original, tuple);
        Ok(())
    }
}

impl Matrix3Basics for RotationMatrix {
    /// The zero rotation is the identity.
    fn set_to_zero(&mut self) {
        *self = Self::IDENTITY;
    }

    fn set_to_nan(&mut self) {
        *self = Self::nan();
    }

    fn set_identity(&mut self) {
        *self = Self::IDENTITY;
    }

    fn set_array(&mut self, coefficients: &[f64; 9]) -> Result<(), Matrix3Error> {
        self.set(coefficients)
    }
}

impl RotationMatrixReadOnly for RotationMatrix {}

/// Rotation of another matrix: `M' = R * M * Rᵗ`.
impl Transform for RotationMatrix {
    fn transform_matrix(&self, matrix: &mut Matrix3) -> Result<(), Matrix3Error> {
        *matrix = tools::multiply_transpose_right(&tools::multiply(self, matrix), self);
        Ok(())
    }

    fn inverse_transform_matrix(&self, matrix: &mut Matrix3) -> Result<(), Matrix3Error> {
        *matrix = tools::multiply(&tools::multiply_transpose_left(self, matrix), self);
        Ok(())
    }
}

impl From<RotationMatrix> for Matrix3 {
    #[inline]
    fn from(rotation: RotationMatrix) -> Self {
        Matrix3::from_array(&rotation.data)
    }
}

impl From<RotationMatrix> for [f64; 9] {
    #[inline]
    fn from(rotation: RotationMatrix) -> Self {
        rotation.data
    }
}

impl From<RotationMatrix> for DMat3 {
    #[inline]
    fn from(rotation: RotationMatrix) -> Self {
        DMat3::from(Matrix3::from(rotation))
    }
}

impl TryFrom<[f64; 9]> for RotationMatrix {
    type Error = Matrix3Error;

    fn try_from(coefficients: [f64; 9]) -> Result<Self, Self::Error> {
        Self::try_from_array(&coefficients)
    }
}

impl TryFrom<Matrix3> for RotationMatrix {
    type Error = Matrix3Error;

    fn try_from(matrix: Matrix3) -> Result<Self, Self::Error> {
        Self::try_from_array(&matrix.to_array())
    }
}

impl fmt::Display for RotationMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&features::matrix_to_string(&self.data))
    }
}

// Rotation composition, re-normalized.
impl std::ops::Mul<RotationMatrix> for RotationMatrix {
    type Output = RotationMatrix;

    #[inline]
    fn mul(mut self, rhs: RotationMatrix) -> Self::Output {
        RotationMatrix::multiply(&mut self, &rhs);
        self
    }
}

// Rotation-vector multiplication.
impl std::ops::Mul<DVec3> for RotationMatrix {
    type Output = DVec3;

    #[inline]
    fn mul(self, mut rhs: DVec3) -> Self::Output {
        self.transform(&mut rhs);
        rhs
    }
}
