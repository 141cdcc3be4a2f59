//! General 3x3 matrix (double precision).

use std::fmt;

use crate::error::Matrix3Error;
use crate::faer_bridge;
use crate::tools;
use crate::traits::{Matrix3Basics, Matrix3ReadOnly, Transform};
use crate::tuple::Tuple3;

/// General 3x3 matrix with no invariant, stored row-major.
///
/// Every operation mutates `self` in place or returns a new value; the algebra delegates to
/// [`crate::tools`] and [`crate::features`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix3 {
    data: [f64; 9],
}

impl Default for Matrix3 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Matrix3 {
    /// Zero matrix.
    pub const ZERO: Self = Self { data: [0.0; 9] };

    /// Identity matrix.
    pub const IDENTITY: Self = Self {
        data: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
    };

    /// Create a new matrix from row-major coefficients.
    #[inline]
    pub const fn from_array(data: &[f64; 9]) -> Self {
        Self { data: *data }
    }

    /// Create a new matrix from three rows.
    #[inline]
    pub const fn from_rows(row0: [f64; 3], row1: [f64; 3], row2: [f64; 3]) -> Self {
        Self {
            data: [
                row0[0], row0[1], row0[2], row1[0], row1[1], row1[2], row2[0], row2[1], row2[2],
            ],
        }
    }

    /// Create a new matrix from three columns.
    #[inline]
    pub fn from_cols(col0: &impl Tuple3, col1: &impl Tuple3, col2: &impl Tuple3) -> Self {
        Self {
            data: [
                col0.x(),
                col1.x(),
                col2.x(),
                col0.y(),
                col1.y(),
                col2.y(),
                col0.z(),
                col1.z(),
                col2.z(),
            ],
        }
    }

    /// Create a diagonal matrix.
    #[inline]
    pub const fn from_diagonal(m00: f64, m11: f64, m22: f64) -> Self {
        Self {
            data: [m00, 0.0, 0.0, 0.0, m11, 0.0, 0.0, 0.0, m22],
        }
    }

    /// Create a new matrix from a flat row-major buffer starting at `offset`.
    pub fn from_slice(buffer: &[f64], offset: usize) -> Result<Self, Matrix3Error> {
        faer_bridge::slice_to_array9(buffer, offset).map(|data| Self { data })
    }

    /// Create a new matrix from a dense `faer` matrix, which must be 3x3.
    pub fn from_faer(mat: faer::MatRef<'_, f64>) -> Result<Self, Matrix3Error> {
        faer_bridge::faer_mat_to_array9(mat).map(|data| Self { data })
    }

    /// Create the cross-product matrix of `v`, such that `M * x == v × x`.
    pub fn from_tilde(v: &impl Tuple3) -> Self {
        let mut m = Self::ZERO;
        m.set_to_tilde_form(v);
        m
    }

    /// Set the coefficient at (`row`, `col`).
    pub fn set_element(&mut self, row: usize, col: usize, value: f64) -> Result<(), Matrix3Error> {
        let index = check_index(row)? * 3 + check_index(col)?;
        self.data[index] = value;
        Ok(())
    }

    /// Set the row `row`.
    pub fn set_row(&mut self, row: usize, values: &impl Tuple3) -> Result<(), Matrix3Error> {
        let start = check_index(row)? * 3;
        self.data[start..start + 3].copy_from_slice(&[values.x(), values.y(), values.z()]);
        Ok(())
    }

    /// Set the column `col`.
    pub fn set_column(&mut self, col: usize, values: &impl Tuple3) -> Result<(), Matrix3Error> {
        let col = check_index(col)?;
        self.data[col] = values.x();
        self.data[3 + col] = values.y();
        self.data[6 + col] = values.z();
        Ok(())
    }

    /// Set to a diagonal matrix.
    pub fn set_to_diagonal(&mut self, m00: f64, m11: f64, m22: f64) {
        *self = Self::from_diagonal(m00, m11, m22);
    }

    /// Set to the skew-symmetric cross-product matrix of `v`.
    pub fn set_to_tilde_form(&mut self, v: &impl Tuple3) {
        let (x, y, z) = (v.x(), v.y(), v.z());
        self.data = [0.0, -z, y, z, 0.0, -x, -y, x, 0.0];
    }

    /// Set to a rotation of `yaw` radians about the z axis.
    pub fn set_to_yaw_matrix(&mut self, yaw: f64) {
        let (s, c) = yaw.sin_cos();
        self.data = [c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0];
    }

    /// Set to a rotation of `pitch` radians about the y axis.
    pub fn set_to_pitch_matrix(&mut self, pitch: f64) {
        let (s, c) = pitch.sin_cos();
        self.data = [c, 0.0, s, 0.0, 1.0, 0.0, -s, 0.0, c];
    }

    /// Set to a rotation of `roll` radians about the x axis.
    pub fn set_to_roll_matrix(&mut self, roll: f64) {
        let (s, c) = roll.sin_cos();
        self.data = [1.0, 0.0, 0.0, 0.0, c, -s, 0.0, s, c];
    }

    /// `self = self + other`.
    pub fn add(&mut self, other: &impl Matrix3ReadOnly) {
        for (a, b) in self.data.iter_mut().zip(other.to_array()) {
            *a += b;
        }
    }

    /// `self = self - other`.
    pub fn sub(&mut self, other: &impl Matrix3ReadOnly) {
        for (a, b) in self.data.iter_mut().zip(other.to_array()) {
            *a -= b;
        }
    }

    /// Multiply every coefficient by `scalar`.
    pub fn scale(&mut self, scalar: f64) {
        self.data.iter_mut().for_each(|v| *v *= scalar);
    }

    /// Multiply each row by the matching factor: `self = diag(x, y, z) * self`.
    pub fn scale_rows(&mut self, x: f64, y: f64, z: f64) {
        for (row, factor) in self.data.chunks_exact_mut(3).zip([x, y, z]) {
            row.iter_mut().for_each(|v| *v *= factor);
        }
    }

    /// Multiply each column by the matching factor: `self = self * diag(x, y, z)`.
    pub fn scale_columns(&mut self, x: f64, y: f64, z: f64) {
        for row in self.data.chunks_exact_mut(3) {
            row[0] *= x;
            row[1] *= y;
            row[2] *= z;
        }
    }

    /// Negate every coefficient.
    pub fn negate(&mut self) {
        self.scale(-1.0);
    }

    /// Transpose in place.
    pub fn transpose(&mut self) {
        self.data.swap(1, 3);
        self.data.swap(2, 6);
        self.data.swap(5, 7);
    }

    /// Transposed copy.
    #[inline]
    pub fn transposed(&self) -> Self {
        let mut m = *self;
        m.transpose();
        m
    }

    /// Invert in place, failing with [`Matrix3Error::SingularMatrix`] if the matrix is singular.
    ///
    /// On failure `self` is left unchanged.
    pub fn invert(&mut self) -> Result<(), Matrix3Error> {
        *self = self.inverse()?;
        Ok(())
    }

    /// Inverse, failing with [`Matrix3Error::SingularMatrix`] if the matrix is singular.
    pub fn inverse(&self) -> Result<Self, Matrix3Error> {
        tools::invert(self).ok_or_else(|| {
            let determinant = self.determinant();
            log::debug!("cannot invert singular matrix, determinant: {determinant}");
            Matrix3Error::SingularMatrix { determinant }
        })
    }

    /// Orthonormalize the columns in place, see [`tools::normalize`].
    pub fn normalize(&mut self) -> Result<(), Matrix3Error> {
        *self = tools::normalize(self)?;
        Ok(())
    }

    /// `self = self * other`.
    pub fn multiply(&mut self, other: &impl Matrix3ReadOnly) {
        *self = tools::multiply(self, other);
    }

    /// `self = selfᵗ * other`.
    pub fn multiply_transpose_this(&mut self, other: &impl Matrix3ReadOnly) {
        *self = tools::multiply_transpose_left(self, other);
    }

    /// `self = self * otherᵗ`.
    pub fn multiply_transpose_other(&mut self, other: &impl Matrix3ReadOnly) {
        *self = tools::multiply_transpose_right(self, other);
    }

    /// `self = selfᵗ * otherᵗ`.
    pub fn multiply_transpose_both(&mut self, other: &impl Matrix3ReadOnly) {
        *self = tools::multiply_transpose_both(self, other);
    }

    /// `self = self⁻¹ * other`.
    pub fn multiply_invert_this(&mut self, other: &impl Matrix3ReadOnly) -> Result<(), Matrix3Error> {
        *self = tools::multiply_invert_left(self, other)?;
        Ok(())
    }

    /// `self = self * other⁻¹`.
    pub fn multiply_invert_other(
        &mut self,
        other: &impl Matrix3ReadOnly,
    ) -> Result<(), Matrix3Error> {
        *self = tools::multiply_invert_right(self, other)?;
        Ok(())
    }

    /// `self = self⁻¹ * other⁻¹`.
    pub fn multiply_invert_both(&mut self, other: &impl Matrix3ReadOnly) -> Result<(), Matrix3Error> {
        *self = tools::multiply_invert_both(self, other)?;
        Ok(())
    }

    /// `self = selfᵗ * other⁻¹`.
    pub fn multiply_transpose_this_invert_other(
        &mut self,
        other: &impl Matrix3ReadOnly,
    ) -> Result<(), Matrix3Error> {
        *self = tools::multiply_transpose_left_invert_right(self, other)?;
        Ok(())
    }

    /// `self = self⁻¹ * otherᵗ`.
    pub fn multiply_invert_this_transpose_other(
        &mut self,
        other: &impl Matrix3ReadOnly,
    ) -> Result<(), Matrix3Error> {
        *self = tools::multiply_invert_left_transpose_right(self, other)?;
        Ok(())
    }

    /// `self = other * self`.
    pub fn pre_multiply(&mut self, other: &impl Matrix3ReadOnly) {
        *self = tools::multiply(other, self);
    }

    /// `self = other * selfᵗ`.
    pub fn pre_multiply_transpose_this(&mut self, other: &impl Matrix3ReadOnly) {
        *self = tools::multiply_transpose_right(other, self);
    }

    /// `self = otherᵗ * self`.
    pub fn pre_multiply_transpose_other(&mut self, other: &impl Matrix3ReadOnly) {
        *self = tools::multiply_transpose_left(other, self);
    }

    /// `self = otherᵗ * selfᵗ`.
    pub fn pre_multiply_transpose_both(&mut self, other: &impl Matrix3ReadOnly) {
        *self = tools::multiply_transpose_both(other, self);
    }

    /// `self = other * self⁻¹`.
    pub fn pre_multiply_invert_this(
        &mut self,
        other: &impl Matrix3ReadOnly,
    ) -> Result<(), Matrix3Error> {
        *self = tools::multiply_invert_right(other, self)?;
        Ok(())
    }

    /// `self = other⁻¹ * self`.
    pub fn pre_multiply_invert_other(
        &mut self,
        other: &impl Matrix3ReadOnly,
    ) -> Result<(), Matrix3Error> {
        *self = tools::multiply_invert_left(other, self)?;
        Ok(())
    }

    /// `self = other⁻¹ * self⁻¹`.
    pub fn pre_multiply_invert_both(
        &mut self,
        other: &impl Matrix3ReadOnly,
    ) -> Result<(), Matrix3Error> {
        *self = tools::multiply_invert_both(other, self)?;
        Ok(())
    }

    /// Apply `transform` to this matrix.
    pub fn apply_transform(&mut self, transform: &impl Transform) -> Result<(), Matrix3Error> {
        transform.transform_matrix(self)
    }

    /// Apply the inverse of `transform` to this matrix.
    pub fn apply_inverse_transform(
        &mut self,
        transform: &impl Transform,
    ) -> Result<(), Matrix3Error> {
        transform.inverse_transform_matrix(self)
    }
}

#[inline]
fn check_index(index: usize) -> Result<usize, Matrix3Error> {
    if index > 2 {
        return Err(Matrix3Error::IndexOutOfRange { index });
    }
    Ok(index)
}

impl Matrix3ReadOnly for Matrix3 {
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

    fn inverse_transform(&self, tuple: &mut impl Tuple3) -> Result<(), Matrix3Error> {
        let original = [tuple.x(), tuple.y(), tuple.z()];
        tools::inverse_transform(self, &original, tuple)
    }
}

impl Matrix3Basics for Matrix3 {
    fn set_to_zero(&mut self) {
        *self = Self::ZERO;
    }

    fn set_to_nan(&mut self) {
        self.data = [f64::NAN; 9];
    }

    fn set_identity(&mut self) {
        *self = Self::IDENTITY;
    }

    fn set_array(&mut self, coefficients: &[f64; 9]) -> Result<(), Matrix3Error> {
        self.data = *coefficients;
        Ok(())
    }
}

/// Conjugation of another matrix: `M' = self * M * self⁻¹`.
impl Transform for Matrix3 {
    fn transform_matrix(&self, matrix: &mut Matrix3) -> Result<(), Matrix3Error> {
        *matrix = tools::transform_matrix(self, matrix)?;
        Ok(())
    }

    fn inverse_transform_matrix(&self, matrix: &mut Matrix3) -> Result<(), Matrix3Error> {
        *matrix = tools::inverse_transform_matrix(self, matrix)?;
        Ok(())
    }
}

impl From<[f64; 9]> for Matrix3 {
    #[inline]
    fn from(data: [f64; 9]) -> Self {
        Self { data }
    }
}

impl From<Matrix3> for [f64; 9] {
    #[inline]
    fn from(m: Matrix3) -> Self {
        m.data
    }
}

impl From<[[f64; 3]; 3]> for Matrix3 {
    #[inline]
    fn from(rows: [[f64; 3]; 3]) -> Self {
        Self::from_rows(rows[0], rows[1], rows[2])
    }
}

impl From<Matrix3> for [[f64; 3]; 3] {
    #[inline]
    fn from(m: Matrix3) -> Self {
        let d = m.data;
        [[d[0], d[1], d[2]], [d[3], d[4], d[5]], [d[6], d[7], d[8]]]
    }
}

// glam stores its matrices column-major.
impl From<glam::DMat3> for Matrix3 {
    #[inline]
    fn from(m: glam::DMat3) -> Self {
        Self::from_cols(&m.x_axis, &m.y_axis, &m.z_axis)
    }
}

impl From<Matrix3> for glam::DMat3 {
    #[inline]
    fn from(m: Matrix3) -> Self {
        glam::DMat3::from_cols_array(&m.transposed().data)
    }
}

impl fmt::Display for Matrix3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::features::matrix_to_string(&self.data))
    }
}

// Matrix-matrix addition.
impl std::ops::Add<Matrix3> for Matrix3 {
    type Output = Matrix3;

    #[inline]
    fn add(mut self, rhs: Matrix3) -> Self::Output {
        Matrix3::add(&mut self, &rhs);
        self
    }
}

// Matrix-matrix subtraction.
impl std::ops::Sub<Matrix3> for Matrix3 {
    type Output = Matrix3;

    #[inline]
    fn sub(mut self, rhs: Matrix3) -> Self::Output {
        Matrix3::sub(&mut self, &rhs);
        self
    }
}

// Matrix-matrix multiplication.
impl std::ops::Mul<Matrix3> for Matrix3 {
    type Output = Matrix3;

    #[inline]
    fn mul(self, rhs: Matrix3) -> Self::Output {
        tools::multiply(&self, &rhs)
    }
}

// Matrix-scalar multiplication.
impl std::ops::Mul<f64> for Matrix3 {
    type Output = Matrix3;

    #[inline]
    fn mul(mut self, rhs: f64) -> Self::Output {
        self.scale(rhs);
        self
    }
}

// Matrix-vector multiplication.
impl std::ops::Mul<glam::DVec3> for Matrix3 {
    type Output = glam::DVec3;

    #[inline]
    fn mul(self, mut rhs: glam::DVec3) -> Self::Output {
        self.transform(&mut rhs);
        rhs
    }
}

impl std::ops::Neg for Matrix3 {
    type Output = Matrix3;

    #[inline]
    fn neg(mut self) -> Self::Output {
        self.negate();
        self
    }
}
