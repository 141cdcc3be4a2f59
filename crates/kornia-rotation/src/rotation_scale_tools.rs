//! Kernels for rotation-scale matrices, applied in stages without forming `R * S`.
//!
//! The scale always acts first and the rotation second: `M * v = R * (S * v)`.

use crate::error::Matrix3Error;
use crate::matrix3::Matrix3;
use crate::rotation_scale_matrix::RotationScaleMatrix;
use crate::tools;
use crate::traits::Matrix3ReadOnly;
use crate::tuple::{Tuple2, Tuple3, Tuple4};
use crate::EPS_CHECK_2D;

/// `transformed = R * S * original`.
pub fn transform(
    matrix: &RotationScaleMatrix,
    original: &impl Tuple3,
    transformed: &mut impl Tuple3,
) {
    let scale = matrix.scale();
    let scaled = [
        original.x() * scale.x,
        original.y() * scale.y,
        original.z() * scale.z,
    ];
    tools::transform(matrix.rotation(), &scaled, transformed);
}

/// `transformed = S⁻¹ * Rᵗ * original`.
///
/// The scale is strictly positive, so this never fails.
pub fn inverse_transform(
    matrix: &RotationScaleMatrix,
    original: &impl Tuple3,
    transformed: &mut impl Tuple3,
) {
    let scale = matrix.scale();
    let mut rotated = [0.0; 3];
    tools::transform(&matrix.rotation().inverse(), original, &mut rotated);
    transformed.set(
        rotated[0] / scale.x,
        rotated[1] / scale.y,
        rotated[2] / scale.z,
    );
}

/// Transform a 2D tuple, optionally checking that the rotation stays in the XY plane.
pub fn transform_2d(
    matrix: &RotationScaleMatrix,
    original: &impl Tuple2,
    transformed: &mut impl Tuple2,
    check_if_2d: bool,
) -> Result<(), Matrix3Error> {
    let scale = matrix.scale();
    let scaled = [original.x() * scale.x, original.y() * scale.y];
    tools::transform_2d(matrix.rotation(), &scaled, transformed, check_if_2d)
}

/// Inverse of [`transform_2d`].
pub fn inverse_transform_2d(
    matrix: &RotationScaleMatrix,
    original: &impl Tuple2,
    transformed: &mut impl Tuple2,
    check_if_2d: bool,
) -> Result<(), Matrix3Error> {
    if check_if_2d {
        crate::features::check_if_matrix_2d(&matrix.rotation().to_array(), EPS_CHECK_2D)?;
    }
    let scale = matrix.scale();
    let mut rotated = [0.0; 2];
    tools::transform_2d(&matrix.rotation().inverse(), original, &mut rotated, false)?;
    transformed.set(rotated[0] / scale.x, rotated[1] / scale.y);
    Ok(())
}

/// Transform the xyz part of a homogeneous vector, the scalar part passes through unchanged.
pub fn transform_vector4(
    matrix: &RotationScaleMatrix,
    original: &impl Tuple4,
    transformed: &mut impl Tuple4,
) {
    let scale = matrix.scale();
    let scaled = [
        original.x() * scale.x,
        original.y() * scale.y,
        original.z() * scale.z,
        original.s(),
    ];
    tools::transform_vector4(matrix.rotation(), &scaled, transformed);
}

/// Inverse of [`transform_vector4`].
pub fn inverse_transform_vector4(
    matrix: &RotationScaleMatrix,
    original: &impl Tuple4,
    transformed: &mut impl Tuple4,
) {
    let scale = matrix.scale();
    let mut rotated = [0.0; 4];
    tools::transform_vector4(&matrix.rotation().inverse(), original, &mut rotated);
    transformed.set(
        rotated[0] / scale.x,
        rotated[1] / scale.y,
        rotated[2] / scale.z,
        rotated[3],
    );
}

/// Rotate a quaternion. An orientation has no magnitude to scale, only the rotation applies.
pub fn transform_quaternion(
    matrix: &RotationScaleMatrix,
    original: &impl Tuple4,
    transformed: &mut impl Tuple4,
) {
    tools::transform_quaternion(matrix.rotation(), original, transformed);
}

/// Inverse of [`transform_quaternion`].
pub fn inverse_transform_quaternion(
    matrix: &RotationScaleMatrix,
    original: &impl Tuple4,
    transformed: &mut impl Tuple4,
) {
    tools::inverse_transform_quaternion(matrix.rotation(), original, transformed);
}

/// Conjugation `R * S * m * S⁻¹ * Rᵗ`: scale the rows, unscale the columns, then rotate.
pub fn transform_matrix(matrix: &RotationScaleMatrix, m: &impl Matrix3ReadOnly) -> Matrix3 {
    let scale = matrix.scale();
    let mut scaled = Matrix3::from_array(&m.to_array());
    scaled.scale_rows(scale.x, scale.y, scale.z);
    scaled.scale_columns(1.0 / scale.x, 1.0 / scale.y, 1.0 / scale.z);

    let rotation = matrix.rotation();
    tools::multiply_transpose_right(&tools::multiply(rotation, &scaled), rotation)
}

/// Inverse conjugation `S⁻¹ * Rᵗ * m * R * S`.
pub fn inverse_transform_matrix(
    matrix: &RotationScaleMatrix,
    m: &impl Matrix3ReadOnly,
) -> Matrix3 {
    let rotation = matrix.rotation();
    let mut rotated = tools::multiply(&tools::multiply_transpose_left(rotation, m), rotation);

    let scale = matrix.scale();
    rotated.scale_rows(1.0 / scale.x, 1.0 / scale.y, 1.0 / scale.z);
    rotated.scale_columns(scale.x, scale.y, scale.z);
    rotated
}

/// `R * S * m`, scaling the rows of `m` before rotating them.
pub fn multiply(matrix: &RotationScaleMatrix, m: &impl Matrix3ReadOnly) -> Matrix3 {
    let scale = matrix.scale();
    let mut scaled = Matrix3::from_array(&m.to_array());
    scaled.scale_rows(scale.x, scale.y, scale.z);
    tools::multiply(matrix.rotation(), &scaled)
}

/// `m * R * S`, scaling the columns of `m * R`.
pub fn pre_multiply(m: &impl Matrix3ReadOnly, matrix: &RotationScaleMatrix) -> Matrix3 {
    let scale = matrix.scale();
    let mut product = tools::multiply(m, matrix.rotation());
    product.scale_columns(scale.x, scale.y, scale.z);
    product
}
