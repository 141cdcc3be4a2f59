//! Predicates over the nine row-major coefficients of a 3x3 matrix.
//!
//! All functions are pure. The coefficients are passed as `[m00, m01, m02, m10, m11, m12, m20, m21, m22]`.

use crate::error::Matrix3Error;

/// Determinant of the matrix, using the cofactor expansion along the first row.
///
/// Example:
///
/// ```
/// use kornia_rotation::features::determinant;
///
/// let det = determinant(&[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
/// assert_eq!(det, 1.0);
/// ```
#[inline]
pub fn determinant(m: &[f64; 9]) -> f64 {
    let [m00, m01, m02, m10, m11, m12, m20, m21, m22] = *m;
    m00 * (m11 * m22 - m21 * m12) + m01 * (m12 * m20 - m10 * m22) + m02 * (m10 * m21 - m11 * m20)
}

/// Whether the matrix is the identity, each coefficient being within `epsilon` of it.
pub fn is_identity(m: &[f64; 9], epsilon: f64) -> bool {
    let [m00, m01, m02, m10, m11, m12, m20, m21, m22] = *m;
    (m00 - 1.0).abs() <= epsilon
        && (m11 - 1.0).abs() <= epsilon
        && (m22 - 1.0).abs() <= epsilon
        && m01.abs() <= epsilon
        && m02.abs() <= epsilon
        && m10.abs() <= epsilon
        && m12.abs() <= epsilon
        && m20.abs() <= epsilon
        && m21.abs() <= epsilon
}

/// Whether the matrix, assumed to be a rotation, represents a zero rotation.
///
/// Cheaper than [`is_identity`] since it only looks at the trace and the cross-diagonal pairs.
pub fn is_zero_rotation(m: &[f64; 9], epsilon: f64) -> bool {
    let [m00, m01, m02, m10, m11, m12, m20, m21, m22] = *m;
    (m00 + m11 + m22 - 3.0).abs() <= epsilon
        && (m01 + m10).abs() <= epsilon
        && (m02 + m20).abs() <= epsilon
        && (m12 + m21).abs() <= epsilon
}

/// Whether the matrix is a proper rotation: orthonormal rows and a unit determinant.
///
/// The row dot products are tested first since most invalid matrices fail there.
/// Any NaN coefficient makes every comparison false, so a NaN matrix is accepted.
pub fn is_rotation_matrix(m: &[f64; 9], epsilon: f64) -> bool {
    let [m00, m01, m02, m10, m11, m12, m20, m21, m22] = *m;

    let xy_dot = m00 * m10 + m01 * m11 + m02 * m12;
    if xy_dot.abs() > epsilon {
        return false;
    }

    let xz_dot = m00 * m20 + m01 * m21 + m02 * m22;
    if xz_dot.abs() > epsilon {
        return false;
    }

    let yz_dot = m10 * m20 + m11 * m21 + m12 * m22;
    if yz_dot.abs() > epsilon {
        return false;
    }

    let x_norm_squared = m00 * m00 + m01 * m01 + m02 * m02;
    if (1.0 - x_norm_squared).abs() > epsilon {
        return false;
    }

    let y_norm_squared = m10 * m10 + m11 * m11 + m12 * m12;
    if (1.0 - y_norm_squared).abs() > epsilon {
        return false;
    }

    let z_norm_squared = m20 * m20 + m21 * m21 + m22 * m22;
    if (1.0 - z_norm_squared).abs() > epsilon {
        return false;
    }

    let det = determinant(m);
    (det - 1.0).abs() <= epsilon || det.is_nan()
}

/// Whether the matrix only acts in the XY plane.
pub fn is_matrix_2d(m: &[f64; 9], epsilon: f64) -> bool {
    m[6].abs() <= epsilon
        && m[2].abs() <= epsilon
        && m[7].abs() <= epsilon
        && m[5].abs() <= epsilon
        && (m[8] - 1.0).abs() <= epsilon
}

/// Whether the matrix is skew-symmetric: `Mᵗ = -M`.
pub fn is_skew_symmetric(m: &[f64; 9], epsilon: f64) -> bool {
    let [m00, m01, m02, m10, m11, m12, m20, m21, m22] = *m;
    m00.abs() <= epsilon
        && m11.abs() <= epsilon
        && m22.abs() <= epsilon
        && (m01 + m10).abs() <= epsilon
        && (m02 + m20).abs() <= epsilon
        && (m12 + m21).abs() <= epsilon
}

/// Whether each pair of coefficients differs by at most `epsilon`.
pub fn epsilon_equals(a: &[f64; 9], b: &[f64; 9], epsilon: f64) -> bool {
    a.iter().zip(b.iter()).all(|(ai, bi)| (ai - bi).abs() <= epsilon)
}

/// Exact per-coefficient equality; `false` when either operand is absent.
pub fn equals(a: Option<&[f64; 9]>, b: Option<&[f64; 9]>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Fails with [`Matrix3Error::NotARotationMatrix`] if the matrix is not a rotation.
pub fn check_if_rotation_matrix(m: &[f64; 9], epsilon: f64) -> Result<(), Matrix3Error> {
    if is_rotation_matrix(m, epsilon) {
        Ok(())
    } else {
        log::debug!("rejected non-orthonormal matrix {m:?}");
        Err(Matrix3Error::NotARotationMatrix { coefficients: *m })
    }
}

/// Fails with [`Matrix3Error::NotAMatrix2D`] if the matrix has out-of-plane components.
pub fn check_if_matrix_2d(m: &[f64; 9], epsilon: f64) -> Result<(), Matrix3Error> {
    if is_matrix_2d(m, epsilon) {
        Ok(())
    } else {
        Err(Matrix3Error::NotAMatrix2D { coefficients: *m })
    }
}

/// Row-by-row representation, one line per row, coefficients separated by `", "`.
///
/// Example:
///
/// ```
/// use kornia_rotation::features::matrix_to_string;
///
/// let s = matrix_to_string(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
/// assert_eq!(s, "0.0, 1.0, 2.0\n3.0, 4.0, 5.0\n6.0, 7.0, 8.0\n");
/// ```
pub fn matrix_to_string(m: &[f64; 9]) -> String {
    m.chunks_exact(3)
        .map(|row| format!("{:?}, {:?}, {:?}\n", row[0], row[1], row[2]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDENTITY: [f64; 9] = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

    #[test]
    fn test_determinant() {
        assert_eq!(determinant(&IDENTITY), 1.0);
        assert_eq!(
            determinant(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]),
            0.0
        );
        assert_eq!(
            determinant(&[2.0, 0.0, 0.0, 0.0, 3.0, 0.0, 0.0, 0.0, 4.0]),
            24.0
        );
        assert_eq!(
            determinant(&[0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0]),
            -1.0
        );
    }

    #[test]
    fn test_is_identity() {
        assert!(is_identity(&IDENTITY, 0.0));
        let mut m = IDENTITY;
        m[5] = 1e-6;
        assert!(!is_identity(&m, 1e-7));
        assert!(is_identity(&m, 1e-5));
    }

    #[test]
    fn test_is_rotation_matrix() {
        for epsilon in [0.0, 1e-12, 1e-7, 1.0] {
            assert!(is_rotation_matrix(&IDENTITY, epsilon));
        }

        // 90 degrees about z
        let rz = [0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0];
        assert!(is_rotation_matrix(&rz, 1e-12));

        // reflection: orthonormal but determinant -1
        let reflection = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, -1.0];
        assert!(!is_rotation_matrix(&reflection, 1e-7));

        let scaled = [2.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];
        assert!(!is_rotation_matrix(&scaled, 1e-7));

        let sheared = [1.0, 0.1, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];
        assert!(!is_rotation_matrix(&sheared, 1e-7));
    }

    #[test]
    fn test_is_zero_rotation() {
        assert!(is_zero_rotation(&IDENTITY, 1e-12));
        let rz = [0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0];
        assert!(!is_zero_rotation(&rz, 1e-7));
    }

    #[test]
    fn test_is_matrix_2d() {
        let m = [0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0];
        assert!(is_matrix_2d(&m, 1e-12));
        let m = [1.0, 0.0, 0.3, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];
        assert!(!is_matrix_2d(&m, 1e-12));
        assert!(check_if_matrix_2d(&m, 1e-12).is_err());
    }

    #[test]
    fn test_is_skew_symmetric() {
        let m = [0.0, -3.0, 2.0, 3.0, 0.0, -1.0, -2.0, 1.0, 0.0];
        assert!(is_skew_symmetric(&m, 0.0));
        assert!(!is_skew_symmetric(&IDENTITY, 1e-7));
    }

    #[test]
    fn test_equals() {
        let a = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let mut b = a;
        assert!(equals(Some(&a), Some(&b)));
        assert!(!equals(Some(&a), None));
        assert!(!equals(None, None));
        b[4] += 1e-9;
        assert!(!equals(Some(&a), Some(&b)));
        assert!(epsilon_equals(&a, &b, 1e-8));
        assert!(!epsilon_equals(&a, &b, 1e-10));
    }

    #[test]
    fn test_check_if_rotation_matrix() {
        assert!(check_if_rotation_matrix(&IDENTITY, 1e-7).is_ok());
        let m = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
        assert_eq!(
            check_if_rotation_matrix(&m, 1e-7),
            Err(Matrix3Error::NotARotationMatrix { coefficients: m })
        );
    }

    #[test]
    fn test_matrix_to_string() {
        let s = matrix_to_string(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        assert_eq!(s, "0.0, 1.0, 2.0\n3.0, 4.0, 5.0\n6.0, 7.0, 8.0\n");
    }
}
