/// Error types for the matrix and rotation module.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Matrix3Error {
    /// The determinant of the matrix is too close to zero to invert it.
    #[error("Matrix is singular, determinant: {determinant}")]
    SingularMatrix {
        /// Determinant of the offending matrix.
        determinant: f64,
    },

    /// The coefficients do not describe a proper rotation matrix.
    #[error("Not a rotation matrix:\n{}", format_coefficients(.coefficients))]
    NotARotationMatrix {
        /// Row-major coefficients of the offending matrix.
        coefficients: [f64; 9],
    },

    /// The coefficients cannot be decomposed into a rotation and a positive scale.
    #[error("Not a rotation-scale matrix:\n{}", format_coefficients(.coefficients))]
    NotARotationScaleMatrix {
        /// Row-major coefficients of the offending matrix.
        coefficients: [f64; 9],
    },

    /// The matrix does not act purely in the XY plane.
    #[error("Not a 2D matrix:\n{}", format_coefficients(.coefficients))]
    NotAMatrix2D {
        /// Row-major coefficients of the offending matrix.
        coefficients: [f64; 9],
    },

    /// Gram-Schmidt cannot rescue a matrix with a vanishing column.
    #[error("Cannot normalize a matrix with a zero column:\n{}", format_coefficients(.coefficients))]
    DegenerateMatrix {
        /// Row-major coefficients of the offending matrix.
        coefficients: [f64; 9],
    },

    /// Row, column or element index outside of [0, 2].
    #[error("Index out of range: {index}, expected a value in [0, 2]")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
    },

    /// The external buffer or matrix does not have the expected size.
    #[error("Expected {expected}, got a {rows}x{cols} input")]
    SizeMismatch {
        /// Human readable description of the expected shape.
        expected: &'static str,
        /// Number of rows (or elements for flat buffers) provided.
        rows: usize,
        /// Number of columns provided, 1 for flat buffers.
        cols: usize,
    },

    /// Scale factors must be strictly positive and finite.
    #[error("Scale must be strictly positive and finite, got ({x}, {y}, {z})")]
    NonPositiveScale {
        /// Scale along x.
        x: f64,
        /// Scale along y.
        y: f64,
        /// Scale along z.
        z: f64,
    },
}

fn format_coefficients(m: &[f64; 9]) -> String {
    crate::features::matrix_to_string(m)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_carries_coefficients() {
        let err = Matrix3Error::NotARotationMatrix {
            coefficients: [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0],
        };
        assert_eq!(
            err.to_string(),
            "Not a rotation matrix:\n0.0, 1.0, 2.0\n3.0, 4.0, 5.0\n6.0, 7.0, 8.0\n"
        );
    }

    #[test]
    fn test_index_error_message() {
        let err = Matrix3Error::IndexOutOfRange { index: 3 };
        assert_eq!(
            err.to_string(),
            "Index out of range: 3, expected a value in [0, 2]"
        );
    }
}
