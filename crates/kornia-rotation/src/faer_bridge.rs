//! Interchange with flat row-major buffers and dense `faer` matrices.

use crate::error::Matrix3Error;

/// Utility function to copy 9 row-major coefficients into a 3x3 faer matrix.
///
/// # Arguments
///
/// * `array` - The row-major coefficients.
///
/// # Returns
///
/// An owned 3x3 faer matrix.
pub fn array9_to_faer_mat(array: &[f64; 9]) -> faer::Mat<f64> {
    faer::Mat::<f64>::from_fn(3, 3, |i, j| array[3 * i + j])
}

/// Utility function to read a 3x3 faer matrix into 9 row-major coefficients.
///
/// # Arguments
///
/// * `mat` - A view of a dense matrix, required to be 3x3.
///
/// # Returns
///
/// The row-major coefficients, or [`Matrix3Error::SizeMismatch`] for any other shape.
pub fn faer_mat_to_array9(mat: faer::MatRef<'_, f64>) -> Result<[f64; 9], Matrix3Error> {
    if mat.nrows() != 3 || mat.ncols() != 3 {
        return Err(Matrix3Error::SizeMismatch {
            expected: "a 3x3 matrix",
            rows: mat.nrows(),
            cols: mat.ncols(),
        });
    }

    let mut array = [0.0; 9];
    for (k, val) in array.iter_mut().enumerate() {
        *val = mat.read(k / 3, k % 3);
    }
    Ok(array)
}

/// Utility function to read 9 row-major coefficients from a buffer starting at `offset`.
pub fn slice_to_array9(buffer: &[f64], offset: usize) -> Result<[f64; 9], Matrix3Error> {
    let src = offset
        .checked_add(9)
        .and_then(|end| buffer.get(offset..end))
        .ok_or(Matrix3Error::SizeMismatch {
            expected: "at least 9 elements after the offset",
            rows: buffer.len().saturating_sub(offset),
            cols: 1,
        })?;

    let mut array = [0.0; 9];
    array.copy_from_slice(src);
    Ok(array)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array9_to_faer_mat() {
        let mat = array9_to_faer_mat(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        assert_eq!(mat.nrows(), 3);
        assert_eq!(mat.ncols(), 3);
        assert_eq!(mat.read(0, 0), 1.0);
        assert_eq!(mat.read(0, 2), 3.0);
        assert_eq!(mat.read(1, 0), 4.0);
        assert_eq!(mat.read(2, 1), 8.0);
    }

    #[test]
    fn test_faer_mat_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
        let array = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
        let mat = array9_to_faer_mat(&array);
        assert_eq!(faer_mat_to_array9(mat.as_ref())?, array);
        Ok(())
    }

    #[test]
    fn test_faer_mat_wrong_size() {
        let mat = faer::Mat::<f64>::zeros(3, 4);
        assert_eq!(
            faer_mat_to_array9(mat.as_ref()),
            Err(Matrix3Error::SizeMismatch {
                expected: "a 3x3 matrix",
                rows: 3,
                cols: 4
            })
        );
    }

    #[test]
    fn test_slice_to_array9() {
        let buffer = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
        assert_eq!(
            slice_to_array9(&buffer, 1),
            Ok([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0])
        );
        assert!(slice_to_array9(&buffer, 2).is_err());
        assert!(slice_to_array9(&buffer, usize::MAX).is_err());
    }
}
