//! Stateless numeric kernels on 3x3 matrices.
//!
//! Matrix operands are read through [`Matrix3ReadOnly`] and results are returned by value, so an
//! operand can always be overwritten with the result of an operation it took part in. Tuple kernels
//! read every input component before writing the output.

use crate::conversion;
use crate::error::Matrix3Error;
use crate::features;
use crate::matrix3::Matrix3;
use crate::traits::Matrix3ReadOnly;
use crate::tuple::{Tuple2, Tuple3, Tuple4};
use crate::{EPS_CHECK_2D, EPS_INVERT, EPS_NORM};

/// Largest of three values.
#[inline]
pub fn max(a: f64, b: f64, c: f64) -> f64 {
    if a > b {
        if a > c {
            a
        } else {
            c
        }
    } else if b > c {
        b
    } else {
        c
    }
}

#[inline]
fn transpose_array(m: &[f64; 9]) -> [f64; 9] {
    [m[0], m[3], m[6], m[1], m[4], m[7], m[2], m[5], m[8]]
}

#[inline]
fn mul_array(a: &[f64; 9], b: &[f64; 9]) -> [f64; 9] {
    let [a00, a01, a02, a10, a11, a12, a20, a21, a22] = *a;
    let [b00, b01, b02, b10, b11, b12, b20, b21, b22] = *b;

    let c00 = a00 * b00 + a01 * b10 + a02 * b20;
    let c01 = a00 * b01 + a01 * b11 + a02 * b21;
    let c02 = a00 * b02 + a01 * b12 + a02 * b22;
    let c10 = a10 * b00 + a11 * b10 + a12 * b20;
    let c11 = a10 * b01 + a11 * b11 + a12 * b21;
    let c12 = a10 * b02 + a11 * b12 + a12 * b22;
    let c20 = a20 * b00 + a21 * b10 + a22 * b20;
    let c21 = a20 * b01 + a21 * b11 + a22 * b21;
    let c22 = a20 * b02 + a21 * b12 + a22 * b22;

    [c00, c01, c02, c10, c11, c12, c20, c21, c22]
}

/// Closed-form cofactor inverse, `None` when `|det| < EPS_INVERT`.
fn invert_array(m: &[f64; 9]) -> Option<[f64; 9]> {
    let det = features::determinant(m);
    if det.abs() < EPS_INVERT {
        return None;
    }
    let inv_det = 1.0 / det;
    let [m00, m01, m02, m10, m11, m12, m20, m21, m22] = *m;

    Some([
        (m11 * m22 - m12 * m21) * inv_det,
        (m02 * m21 - m01 * m22) * inv_det,
        (m01 * m12 - m02 * m11) * inv_det,
        (m12 * m20 - m10 * m22) * inv_det,
        (m00 * m22 - m02 * m20) * inv_det,
        (m02 * m10 - m00 * m12) * inv_det,
        (m10 * m21 - m11 * m20) * inv_det,
        (m01 * m20 - m00 * m21) * inv_det,
        (m00 * m11 - m01 * m10) * inv_det,
    ])
}

fn invert_or_singular(m: &[f64; 9]) -> Result<[f64; 9], Matrix3Error> {
    invert_array(m).ok_or_else(|| {
        let determinant = features::determinant(m);
        log::debug!("cannot invert singular matrix, determinant: {determinant}");
        Matrix3Error::SingularMatrix { determinant }
    })
}

/// Compute the inverse of `matrix`.
///
/// # Returns
///
/// The inverse, or `None` when the matrix is singular (`|det| < EPS_INVERT`).
pub fn invert(matrix: &impl Matrix3ReadOnly) -> Option<Matrix3> {
    invert_array(&matrix.to_array()).map(|m| Matrix3::from_array(&m))
}

/// `a * b`.
pub fn multiply(a: &impl Matrix3ReadOnly, b: &impl Matrix3ReadOnly) -> Matrix3 {
    Matrix3::from_array(&mul_array(&a.to_array(), &b.to_array()))
}

/// `aᵗ * b`.
pub fn multiply_transpose_left(a: &impl Matrix3ReadOnly, b: &impl Matrix3ReadOnly) -> Matrix3 {
    Matrix3::from_array(&mul_array(&transpose_array(&a.to_array()), &b.to_array()))
}

/// `a * bᵗ`.
pub fn multiply_transpose_right(a: &impl Matrix3ReadOnly, b: &impl Matrix3ReadOnly) -> Matrix3 {
    Matrix3::from_array(&mul_array(&a.to_array(), &transpose_array(&b.to_array())))
}

/// `aᵗ * bᵗ`.
pub fn multiply_transpose_both(a: &impl Matrix3ReadOnly, b: &impl Matrix3ReadOnly) -> Matrix3 {
    // aᵗ bᵗ = (b a)ᵗ
    Matrix3::from_array(&transpose_array(&mul_array(&b.to_array(), &a.to_array())))
}

/// `a⁻¹ * b`, failing if `a` is singular.
pub fn multiply_invert_left(
    a: &impl Matrix3ReadOnly,
    b: &impl Matrix3ReadOnly,
) -> Result<Matrix3, Matrix3Error> {
    let a_inv = invert_or_singular(&a.to_array())?;
    Ok(Matrix3::from_array(&mul_array(&a_inv, &b.to_array())))
}

/// `a * b⁻¹`, failing if `b` is singular.
pub fn multiply_invert_right(
    a: &impl Matrix3ReadOnly,
    b: &impl Matrix3ReadOnly,
) -> Result<Matrix3, Matrix3Error> {
    let b_inv = invert_or_singular(&b.to_array())?;
    Ok(Matrix3::from_array(&mul_array(&a.to_array(), &b_inv)))
}

/// `a⁻¹ * b⁻¹`, failing if either operand is singular.
pub fn multiply_invert_both(
    a: &impl Matrix3ReadOnly,
    b: &impl Matrix3ReadOnly,
) -> Result<Matrix3, Matrix3Error> {
    let a_inv = invert_or_singular(&a.to_array())?;
    let b_inv = invert_or_singular(&b.to_array())?;
    Ok(Matrix3::from_array(&mul_array(&a_inv, &b_inv)))
}

/// `aᵗ * b⁻¹`, failing if `b` is singular.
pub fn multiply_transpose_left_invert_right(
    a: &impl Matrix3ReadOnly,
    b: &impl Matrix3ReadOnly,
) -> Result<Matrix3, Matrix3Error> {
    let b_inv = invert_or_singular(&b.to_array())?;
    Ok(Matrix3::from_array(&mul_array(
        &transpose_array(&a.to_array()),
        &b_inv,
    )))
}

/// `a⁻¹ * bᵗ`, failing if `a` is singular.
pub fn multiply_invert_left_transpose_right(
    a: &impl Matrix3ReadOnly,
    b: &impl Matrix3ReadOnly,
) -> Result<Matrix3, Matrix3Error> {
    let a_inv = invert_or_singular(&a.to_array())?;
    Ok(Matrix3::from_array(&mul_array(
        &a_inv,
        &transpose_array(&b.to_array()),
    )))
}

#[inline]
fn inverse_magnitude(norm_squared: f64) -> f64 {
    if (1.0 - norm_squared).abs() < EPS_NORM {
        // first order approximation of 1/sqrt(x) around 1
        2.0 / (1.0 + norm_squared)
    } else {
        1.0 / norm_squared.sqrt()
    }
}

/// Gram-Schmidt orthonormalization of the columns of `matrix`.
///
/// Column 0 keeps its direction, column 1 is made orthogonal to column 0, and column 2 is made
/// orthogonal to both. The order is significant: column 0 is the authoritative axis.
///
/// The handedness of the input is kept, so a negative determinant yields an orthonormal
/// reflection. [`crate::RotationMatrix::set_and_normalize`] rejects those.
///
/// # Returns
///
/// The orthonormalized matrix, or [`Matrix3Error::DegenerateMatrix`] if a column vanishes.
pub fn normalize(matrix: &impl Matrix3ReadOnly) -> Result<Matrix3, Matrix3Error> {
    let coefficients = matrix.to_array();
    let [mut m00, mut m01, mut m02, mut m10, mut m11, mut m12, mut m20, mut m21, mut m22] =
        coefficients;

    let degenerate = || {
        log::debug!("cannot normalize matrix with a zero column {coefficients:?}");
        Matrix3Error::DegenerateMatrix { coefficients }
    };

    let x_dot_x = m00 * m00 + m10 * m10 + m20 * m20;
    if x_dot_x == 0.0 {
        return Err(degenerate());
    }

    let x_dot_y = m00 * m01 + m10 * m11 + m20 * m21;
    let tmp = x_dot_y / x_dot_x;
    m01 -= tmp * m00;
    m11 -= tmp * m10;
    m21 -= tmp * m20;

    let y_dot_y = m01 * m01 + m11 * m11 + m21 * m21;
    if y_dot_y == 0.0 {
        return Err(degenerate());
    }

    let x_dot_z = m00 * m02 + m10 * m12 + m20 * m22;
    let y_dot_z = m01 * m02 + m11 * m12 + m21 * m22;
    let tmp_x = x_dot_z / x_dot_x;
    let tmp_y = y_dot_z / y_dot_y;
    m02 -= tmp_x * m00 + tmp_y * m01;
    m12 -= tmp_x * m10 + tmp_y * m11;
    m22 -= tmp_x * m20 + tmp_y * m21;

    let z_dot_z = m02 * m02 + m12 * m12 + m22 * m22;
    if z_dot_z == 0.0 {
        return Err(degenerate());
    }

    let inv_x = inverse_magnitude(x_dot_x);
    let inv_y = inverse_magnitude(y_dot_y);
    let inv_z = inverse_magnitude(z_dot_z);

    Ok(Matrix3::from_array(&[
        m00 * inv_x,
        m01 * inv_y,
        m02 * inv_z,
        m10 * inv_x,
        m11 * inv_y,
        m12 * inv_z,
        m20 * inv_x,
        m21 * inv_y,
        m22 * inv_z,
    ]))
}

#[inline]
fn apply(m: &[f64; 9], x: f64, y: f64, z: f64) -> (f64, f64, f64) {
    (
        m[0] * x + m[1] * y + m[2] * z,
        m[3] * x + m[4] * y + m[5] * z,
        m[6] * x + m[7] * y + m[8] * z,
    )
}

/// `transformed = matrix * original`.
pub fn transform(
    matrix: &impl Matrix3ReadOnly,
    original: &impl Tuple3,
    transformed: &mut impl Tuple3,
) {
    let (x, y, z) = apply(&matrix.to_array(), original.x(), original.y(), original.z());
    transformed.set(x, y, z);
}

/// `transformed = matrix⁻¹ * original`, failing if the matrix is singular.
pub fn inverse_transform(
    matrix: &impl Matrix3ReadOnly,
    original: &impl Tuple3,
    transformed: &mut impl Tuple3,
) -> Result<(), Matrix3Error> {
    let inverse = invert_or_singular(&matrix.to_array())?;
    let (x, y, z) = apply(&inverse, original.x(), original.y(), original.z());
    transformed.set(x, y, z);
    Ok(())
}

/// Transform a 2D tuple with the upper-left 2x2 block of `matrix`.
///
/// When `check_if_2d` is set, fails with [`Matrix3Error::NotAMatrix2D`] if the matrix has
/// components outside of the XY plane.
pub fn transform_2d(
    matrix: &impl Matrix3ReadOnly,
    original: &impl Tuple2,
    transformed: &mut impl Tuple2,
    check_if_2d: bool,
) -> Result<(), Matrix3Error> {
    let m = matrix.to_array();
    if check_if_2d {
        features::check_if_matrix_2d(&m, EPS_CHECK_2D)?;
    }
    let (x, y) = (original.x(), original.y());
    transformed.set(m[0] * x + m[1] * y, m[3] * x + m[4] * y);
    Ok(())
}

/// Inverse of [`transform_2d`].
pub fn inverse_transform_2d(
    matrix: &impl Matrix3ReadOnly,
    original: &impl Tuple2,
    transformed: &mut impl Tuple2,
    check_if_2d: bool,
) -> Result<(), Matrix3Error> {
    let m = matrix.to_array();
    if check_if_2d {
        features::check_if_matrix_2d(&m, EPS_CHECK_2D)?;
    }
    let inverse = invert_or_singular(&m)?;
    let (x, y) = (original.x(), original.y());
    transformed.set(
        inverse[0] * x + inverse[1] * y,
        inverse[3] * x + inverse[4] * y,
    );
    Ok(())
}

/// Transform the xyz part of a homogeneous vector, the scalar part passes through unchanged.
pub fn transform_vector4(
    matrix: &impl Matrix3ReadOnly,
    original: &impl Tuple4,
    transformed: &mut impl Tuple4,
) {
    let s = original.s();
    let (x, y, z) = apply(&matrix.to_array(), original.x(), original.y(), original.z());
    transformed.set(x, y, z, s);
}

/// Inverse of [`transform_vector4`].
pub fn inverse_transform_vector4(
    matrix: &impl Matrix3ReadOnly,
    original: &impl Tuple4,
    transformed: &mut impl Tuple4,
) -> Result<(), Matrix3Error> {
    let inverse = invert_or_singular(&matrix.to_array())?;
    let s = original.s();
    let (x, y, z) = apply(&inverse, original.x(), original.y(), original.z());
    transformed.set(x, y, z, s);
    Ok(())
}

/// Hamilton product `a ⊗ b` of two `(x, y, z, s)` quaternions.
#[inline]
pub(crate) fn quaternion_multiply(a: [f64; 4], b: [f64; 4]) -> [f64; 4] {
    let [ax, ay, az, as_] = a;
    let [bx, by, bz, bs] = b;
    [
        as_ * bx + ax * bs + ay * bz - az * by,
        as_ * by - ax * bz + ay * bs + az * bx,
        as_ * bz + ax * by - ay * bx + az * bs,
        as_ * bs - ax * bx - ay * by - az * bz,
    ]
}

/// Rotate a quaternion by a rotation matrix: `transformed = q(rotation) ⊗ original`.
///
/// `rotation` is assumed to be a proper rotation.
pub fn transform_quaternion(
    rotation: &impl Matrix3ReadOnly,
    original: &impl Tuple4,
    transformed: &mut impl Tuple4,
) {
    let q = conversion::matrix_to_quaternion(rotation);
    let [x, y, z, s] = quaternion_multiply(
        [q.x, q.y, q.z, q.w],
        [original.x(), original.y(), original.z(), original.s()],
    );
    transformed.set(x, y, z, s);
}

/// Inverse of [`transform_quaternion`]: `transformed = q(rotation)⁻¹ ⊗ original`.
pub fn inverse_transform_quaternion(
    rotation: &impl Matrix3ReadOnly,
    original: &impl Tuple4,
    transformed: &mut impl Tuple4,
) {
    let q = conversion::matrix_to_quaternion(rotation);
    let [x, y, z, s] = quaternion_multiply(
        [-q.x, -q.y, -q.z, q.w],
        [original.x(), original.y(), original.z(), original.s()],
    );
    transformed.set(x, y, z, s);
}

/// Similarity transform `a * m * a⁻¹`, the conjugation applied to a rank-2 tensor.
pub fn transform_matrix(
    a: &impl Matrix3ReadOnly,
    m: &impl Matrix3ReadOnly,
) -> Result<Matrix3, Matrix3Error> {
    let a = a.to_array();
    let a_inv = invert_or_singular(&a)?;
    Ok(Matrix3::from_array(&mul_array(
        &mul_array(&a, &m.to_array()),
        &a_inv,
    )))
}

/// Inverse similarity transform `a⁻¹ * m * a`.
pub fn inverse_transform_matrix(
    a: &impl Matrix3ReadOnly,
    m: &impl Matrix3ReadOnly,
) -> Result<Matrix3, Matrix3Error> {
    let a = a.to_array();
    let a_inv = invert_or_singular(&a)?;
    Ok(Matrix3::from_array(&mul_array(
        &mul_array(&a_inv, &m.to_array()),
        &a,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::{DQuat, DVec2, DVec3, DVec4};

    const A: [f64; 9] = [2.0, -1.0, 0.5, 0.3, 1.5, -2.0, 1.0, 0.2, 3.0];
    const B: [f64; 9] = [-1.0, 0.4, 2.0, 0.7, 1.1, -0.3, 0.5, -2.5, 1.2];

    fn assert_array_eq(a: &[f64; 9], b: &[f64; 9], epsilon: f64) {
        for (ai, bi) in a.iter().zip(b.iter()) {
            assert_relative_eq!(ai, bi, epsilon = epsilon);
        }
    }

    #[test]
    fn test_max() {
        assert_eq!(max(1.0, 2.0, 3.0), 3.0);
        assert_eq!(max(3.0, 2.0, 1.0), 3.0);
        assert_eq!(max(1.0, 3.0, 2.0), 3.0);
        assert_eq!(max(-1.0, -1.0, -1.0), -1.0);
    }

    #[test]
    fn test_multiply_identity_is_exact() {
        let a = Matrix3::from_array(&A);
        assert_eq!(multiply(&a, &Matrix3::IDENTITY), a);
        assert_eq!(multiply(&Matrix3::IDENTITY, &a), a);
    }

    #[test]
    fn test_multiply_against_naive_product() {
        let a = Matrix3::from_array(&A);
        let b = Matrix3::from_array(&B);
        let c = multiply(&a, &b);
        for i in 0..3 {
            for j in 0..3 {
                let expected: f64 = (0..3).map(|k| A[3 * i + k] * B[3 * k + j]).sum();
                assert_relative_eq!(c.to_array()[3 * i + j], expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_multiply_transpose_variants() {
        let a = Matrix3::from_array(&A);
        let b = Matrix3::from_array(&B);
        let at = a.transposed();
        let bt = b.transposed();

        assert_eq!(multiply_transpose_left(&a, &b), multiply(&at, &b));
        assert_eq!(multiply_transpose_right(&a, &b), multiply(&a, &bt));
        assert_array_eq(
            &multiply_transpose_both(&a, &b).to_array(),
            &multiply(&at, &bt).to_array(),
            1e-12,
        );
    }

    #[test]
    fn test_multiply_invert_variants() -> Result<(), Box<dyn std::error::Error>> {
        let a = Matrix3::from_array(&A);
        let b = Matrix3::from_array(&B);
        let a_inv = invert(&a).ok_or("a is invertible")?;
        let b_inv = invert(&b).ok_or("b is invertible")?;

        assert_array_eq(
            &multiply_invert_left(&a, &b)?.to_array(),
            &multiply(&a_inv, &b).to_array(),
            1e-12,
        );
        assert_array_eq(
            &multiply_invert_right(&a, &b)?.to_array(),
            &multiply(&a, &b_inv).to_array(),
            1e-12,
        );
        assert_array_eq(
            &multiply_invert_both(&a, &b)?.to_array(),
            &multiply(&a_inv, &b_inv).to_array(),
            1e-12,
        );
        assert_array_eq(
            &multiply_transpose_left_invert_right(&a, &b)?.to_array(),
            &multiply(&a.transposed(), &b_inv).to_array(),
            1e-12,
        );
        assert_array_eq(
            &multiply_invert_left_transpose_right(&a, &b)?.to_array(),
            &multiply(&a_inv, &b.transposed()).to_array(),
            1e-12,
        );
        Ok(())
    }

    #[test]
    fn test_multiply_invert_singular() {
        let a = Matrix3::from_array(&A);
        let singular = Matrix3::from_array(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        assert!(matches!(
            multiply_invert_right(&a, &singular),
            Err(Matrix3Error::SingularMatrix { .. })
        ));
        assert!(matches!(
            multiply_invert_left(&Matrix3::ZERO, &a),
            Err(Matrix3Error::SingularMatrix { .. })
        ));
    }

    #[test]
    fn test_invert() -> Result<(), Box<dyn std::error::Error>> {
        let a = Matrix3::from_array(&A);
        let a_inv = invert(&a).ok_or("a is invertible")?;
        assert_array_eq(
            &multiply(&a, &a_inv).to_array(),
            &Matrix3::IDENTITY.to_array(),
            1e-12,
        );
        let a_inv_inv = invert(&a_inv).ok_or("a_inv is invertible")?;
        assert_array_eq(&a_inv_inv.to_array(), &A, 1e-10);

        assert!(invert(&Matrix3::ZERO).is_none());
        Ok(())
    }

    #[test]
    fn test_normalize() -> Result<(), Box<dyn std::error::Error>> {
        let m = Matrix3::from_array(&[1.0, 0.1, 0.0, 0.05, 1.1, 0.2, 0.0, -0.1, 0.9]);
        let n = normalize(&m)?;
        assert!(n.is_rotation_matrix(1e-10));

        // the first column keeps its direction
        let c0 = m.column(0)?.normalize();
        assert_relative_eq!(n.column(0)?.dot(c0), 1.0, epsilon = 1e-12);

        // idempotent on orthonormal input
        let again = normalize(&n)?;
        assert_array_eq(&again.to_array(), &n.to_array(), EPS_NORM);
        Ok(())
    }

    #[test]
    fn test_normalize_keeps_handedness() -> Result<(), Box<dyn std::error::Error>> {
        let mirror = Matrix3::from_array(&[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, -1.0]);
        let n = normalize(&mirror)?;
        assert_eq!(n, mirror);
        assert_relative_eq!(n.determinant(), -1.0);
        assert!(!n.is_rotation_matrix(1e-10));
        Ok(())
    }

    #[test]
    fn test_normalize_zero_column() {
        let m = Matrix3::from_array(&[0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
        assert!(matches!(
            normalize(&m),
            Err(Matrix3Error::DegenerateMatrix { .. })
        ));
    }

    #[test]
    fn test_transform_tuple() -> Result<(), Box<dyn std::error::Error>> {
        let a = Matrix3::from_array(&A);
        let original = DVec3::new(1.0, -2.0, 0.5);
        let mut transformed = DVec3::ZERO;
        transform(&a, &original, &mut transformed);
        assert_relative_eq!(transformed.x, 2.0 + 2.0 + 0.25, epsilon = 1e-12);
        assert_relative_eq!(transformed.y, 0.3 - 3.0 - 1.0, epsilon = 1e-12);
        assert_relative_eq!(transformed.z, 1.0 - 0.4 + 1.5, epsilon = 1e-12);

        let mut back = DVec3::ZERO;
        inverse_transform(&a, &transformed, &mut back)?;
        assert_relative_eq!(back.x, original.x, epsilon = 1e-12);
        assert_relative_eq!(back.y, original.y, epsilon = 1e-12);
        assert_relative_eq!(back.z, original.z, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_transform_2d() -> Result<(), Box<dyn std::error::Error>> {
        let planar = Matrix3::from_array(&[0.0, -2.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
        let original = DVec2::new(1.0, 1.0);
        let mut transformed = DVec2::ZERO;
        transform_2d(&planar, &original, &mut transformed, true)?;
        assert_eq!(transformed, DVec2::new(-2.0, 1.0));

        let mut back = DVec2::ZERO;
        inverse_transform_2d(&planar, &transformed, &mut back, true)?;
        assert_relative_eq!(back.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(back.y, 1.0, epsilon = 1e-12);

        let spatial = Matrix3::from_array(&A);
        assert!(matches!(
            transform_2d(&spatial, &original, &mut transformed, true),
            Err(Matrix3Error::NotAMatrix2D { .. })
        ));
        assert!(transform_2d(&spatial, &original, &mut transformed, false).is_ok());
        Ok(())
    }

    #[test]
    fn test_transform_vector4_keeps_scalar() -> Result<(), Box<dyn std::error::Error>> {
        let a = Matrix3::from_array(&A);
        let original = DVec4::new(1.0, 2.0, 3.0, 7.0);
        let mut transformed = DVec4::ZERO;
        transform_vector4(&a, &original, &mut transformed);
        assert_eq!(transformed.w, 7.0);

        let mut back = DVec4::ZERO;
        inverse_transform_vector4(&a, &transformed, &mut back)?;
        assert_relative_eq!(back.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(back.y, 2.0, epsilon = 1e-12);
        assert_relative_eq!(back.z, 3.0, epsilon = 1e-12);
        assert_eq!(back.w, 7.0);
        Ok(())
    }

    #[test]
    fn test_transform_quaternion() {
        // 90 degrees about z
        let rotation = Matrix3::from_array(&[0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
        let original = DQuat::from_rotation_x(0.3);
        let mut transformed = DQuat::IDENTITY;
        transform_quaternion(&rotation, &original, &mut transformed);

        let expected = DQuat::from_rotation_z(std::f64::consts::FRAC_PI_2) * original;
        assert_relative_eq!(transformed.dot(expected).abs(), 1.0, epsilon = 1e-12);

        let mut back = DQuat::IDENTITY;
        inverse_transform_quaternion(&rotation, &transformed, &mut back);
        assert_relative_eq!(back.dot(original).abs(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_transform_matrix_is_conjugation() -> Result<(), Box<dyn std::error::Error>> {
        let a = Matrix3::from_array(&A);
        let m = Matrix3::from_array(&B);
        let conjugated = transform_matrix(&a, &m)?;
        let a_inv = invert(&a).ok_or("a is invertible")?;
        let expected = multiply(&multiply(&a, &m), &a_inv);
        assert_array_eq(&conjugated.to_array(), &expected.to_array(), 1e-12);

        // similarity preserves the trace
        assert_relative_eq!(conjugated.trace(), m.trace(), epsilon = 1e-12);

        let back = inverse_transform_matrix(&a, &conjugated)?;
        assert_array_eq(&back.to_array(), &B, 1e-10);
        Ok(())
    }
}
