#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Conversions between rotation representations.
pub mod conversion;

/// Error types.
pub mod error;

/// Interchange with flat buffers and `faer` matrices.
pub mod faer_bridge;

/// Predicates and validators on 3x3 matrices.
pub mod features;

/// General 3x3 matrix.
pub mod matrix3;

/// Rotation matrix, a 3x3 matrix constrained to be orthonormal.
pub mod rotation_matrix;

/// Rotation matrix combined with a positive scale.
pub mod rotation_scale_matrix;

/// Staged kernels for rotation-scale matrices.
pub mod rotation_scale_tools;

/// Stateless numeric kernels on 3x3 matrices.
pub mod tools;

/// Capability traits shared by the matrix types.
pub mod traits;

/// Accessor contracts for tuples, vectors and quaternions.
pub mod tuple;

pub use conversion::{AxisAngle, YawPitchRoll};
pub use error::Matrix3Error;
pub use matrix3::Matrix3;
pub use rotation_matrix::RotationMatrix;
pub use rotation_scale_matrix::RotationScaleMatrix;
pub use traits::{Matrix3Basics, Matrix3ReadOnly, RotationMatrixReadOnly, Transform};
pub use tuple::{Tuple2, Tuple3, Tuple4};

/// Tolerance used to decide whether a matrix is a rotation.
pub const EPS_CHECK_ROTATION: f64 = 1.0e-7;

/// Below this absolute determinant a matrix is considered singular.
pub const EPS_INVERT: f64 = 1.0e-16;

/// Below this distance from one, a squared norm is inverted with a first order approximation.
pub const EPS_NORM: f64 = 2.107342e-08;

/// Below this norm an axis, rotation vector or quaternion describes the zero rotation.
pub const EPS_ZERO_ROTATION: f64 = 1.0e-12;

/// Tolerance used to decide whether a matrix acts purely in the XY plane.
pub const EPS_CHECK_2D: f64 = 1.0e-8;
