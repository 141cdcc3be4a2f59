//! Closed-form conversions between rotation representations.
//!
//! Every conversion follows the same edge-case rules:
//!
//! - a NaN anywhere in the input produces an output made only of NaN,
//! - an input describing a (near) zero rotation produces the exact identity.
//!
//! Conversions towards a matrix produce a [`RotationMatrix`] without re-validating it: the formulas
//! below always yield an orthonormal matrix with a unit determinant.

use glam::{DQuat, DVec3};

use crate::rotation_matrix::RotationMatrix;
use crate::traits::Matrix3ReadOnly;
use crate::tuple::{Tuple3, Tuple4};
use crate::EPS_ZERO_ROTATION;

/// Below this `cos(pitch)` the yaw and the roll can no longer be told apart.
const EPS_GIMBAL_LOCK: f64 = 1.0e-12;

/// Pivot threshold of Shepperd's method.
const SHEPPERD_PIVOT_THRESHOLD: f64 = -0.19;

/// A rotation of `angle` radians about a unit `axis`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisAngle {
    /// The unit rotation axis.
    pub axis: DVec3,
    /// The rotation angle in radians.
    pub angle: f64,
}

impl AxisAngle {
    /// The zero rotation, about the x axis by convention.
    pub const ZERO: Self = Self {
        axis: DVec3::X,
        angle: 0.0,
    };

    /// Create a new axis-angle. The axis is expected to be a unit vector.
    #[inline]
    pub const fn new(axis: DVec3, angle: f64) -> Self {
        Self { axis, angle }
    }

    fn nan() -> Self {
        Self {
            axis: DVec3::NAN,
            angle: f64::NAN,
        }
    }

    /// The rotation vector `axis * angle`.
    #[inline]
    pub fn to_rotation_vector(&self) -> DVec3 {
        self.axis * self.angle
    }
}

/// Yaw, pitch and roll angles in radians, the rotation being `Rz(yaw) * Ry(pitch) * Rx(roll)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct YawPitchRoll {
    /// Rotation about the z axis.
    pub yaw: f64,
    /// Rotation about the y axis.
    pub pitch: f64,
    /// Rotation about the x axis.
    pub roll: f64,
}

impl YawPitchRoll {
    /// Create a new set of yaw, pitch and roll angles.
    #[inline]
    pub const fn new(yaw: f64, pitch: f64, roll: f64) -> Self {
        Self { yaw, pitch, roll }
    }
}

/// Compute the rotation matrix from an axis and angle (Rodrigues' formula).
///
/// # Arguments
///
/// * `axis` - The axis of rotation, normalized internally.
/// * `angle` - The angle of rotation in radians.
///
/// # Returns
///
/// The rotation matrix, identity if the axis norm is below [`EPS_ZERO_ROTATION`].
///
/// Example:
///
/// ```
/// use kornia_rotation::conversion::axis_angle_to_matrix;
/// use kornia_rotation::Matrix3ReadOnly;
///
/// let rotation = axis_angle_to_matrix(&[1.0, 0.0, 0.0], std::f64::consts::FRAC_PI_2);
/// assert!((rotation.m21() - 1.0).abs() < 1e-12);
/// ```
pub fn axis_angle_to_matrix(axis: &impl Tuple3, angle: f64) -> RotationMatrix {
    if axis.contains_nan() || angle.is_nan() {
        return RotationMatrix::nan();
    }

    // normalize the vector
    let magnitude = axis.norm();
    if magnitude < EPS_ZERO_ROTATION {
        return RotationMatrix::IDENTITY;
    }
    let x = axis.x() / magnitude;
    let y = axis.y() / magnitude;
    let z = axis.z() / magnitude;

    let (s, c) = angle.sin_cos();
    let t = 1.0 - c;

    let m00 = c + x * x * t;
    let m11 = c + y * y * t;
    let m22 = c + z * z * t;

    let tmp1 = x * y * t;
    let tmp2 = z * s;

    let m10 = tmp1 + tmp2;
    let m01 = tmp1 - tmp2;

    let tmp3 = x * z * t;
    let tmp4 = y * s;

    let m20 = tmp3 - tmp4;
    let m02 = tmp3 + tmp4;

    let tmp5 = y * z * t;
    let tmp6 = x * s;

    let m12 = tmp5 - tmp6;
    let m21 = tmp5 + tmp6;

    RotationMatrix::from_array_unchecked(&[m00, m01, m02, m10, m11, m12, m20, m21, m22])
}

/// Compute the rotation matrix from a rotation vector, `axis * angle`.
pub fn rotation_vector_to_matrix(rotation_vector: &impl Tuple3) -> RotationMatrix {
    if rotation_vector.contains_nan() {
        return RotationMatrix::nan();
    }

    let angle = rotation_vector.norm();
    if angle < EPS_ZERO_ROTATION {
        return RotationMatrix::IDENTITY;
    }
    axis_angle_to_matrix(rotation_vector, angle)
}

/// Compute the rotation matrix from a quaternion `(x, y, z, s)`.
///
/// The quaternion does not need to be unit: its norm is divided out of the formula.
pub fn quaternion_to_matrix(quaternion: &impl Tuple4) -> RotationMatrix {
    if quaternion.contains_nan() {
        return RotationMatrix::nan();
    }

    let (qx, qy, qz, qs) = (quaternion.x(), quaternion.y(), quaternion.z(), quaternion.s());
    let norm_squared = qx * qx + qy * qy + qz * qz + qs * qs;
    if norm_squared.sqrt() < EPS_ZERO_ROTATION {
        return RotationMatrix::IDENTITY;
    }

    let k = 2.0 / norm_squared;

    let xx = k * qx * qx;
    let yy = k * qy * qy;
    let zz = k * qz * qz;
    let xy = k * qx * qy;
    let xz = k * qx * qz;
    let yz = k * qy * qz;
    let sx = k * qs * qx;
    let sy = k * qs * qy;
    let sz = k * qs * qz;

    RotationMatrix::from_array_unchecked(&[
        1.0 - (yy + zz),
        xy - sz,
        xz + sy,
        xy + sz,
        1.0 - (xx + zz),
        yz - sx,
        xz - sy,
        yz + sx,
        1.0 - (xx + yy),
    ])
}

/// Compute the rotation matrix `Rz(yaw) * Ry(pitch) * Rx(roll)` in a single closed form.
pub fn yaw_pitch_roll_to_matrix(yaw: f64, pitch: f64, roll: f64) -> RotationMatrix {
    if yaw.is_nan() || pitch.is_nan() || roll.is_nan() {
        return RotationMatrix::nan();
    }

    let (sy, cy) = yaw.sin_cos();
    let (sp, cp) = pitch.sin_cos();
    let (sr, cr) = roll.sin_cos();

    RotationMatrix::from_array_unchecked(&[
        cy * cp,
        cy * sp * sr - sy * cr,
        cy * sp * cr + sy * sr,
        sy * cp,
        sy * sp * sr + cy * cr,
        sy * sp * cr - cy * sr,
        -sp,
        cp * sr,
        cp * cr,
    ])
}

/// Extract the unit quaternion of a rotation matrix using Shepperd's method.
///
/// The component used as divisor is picked among the scalar part and the three vector parts so
/// that it is never close to zero, which keeps the extraction accurate near 180° rotations.
pub fn matrix_to_quaternion(rotation: &impl Matrix3ReadOnly) -> DQuat {
    if rotation.contains_nan() {
        return DQuat::from_xyzw(f64::NAN, f64::NAN, f64::NAN, f64::NAN);
    }

    let [m00, m01, m02, m10, m11, m12, m20, m21, m22] = rotation.to_array();

    let (qx, qy, qz, qs);

    let mut s = m00 + m11 + m22;
    if s > SHEPPERD_PIVOT_THRESHOLD {
        qs = 0.5 * (s + 1.0).sqrt();
        let inv = 0.25 / qs;
        qx = (m21 - m12) * inv;
        qy = (m02 - m20) * inv;
        qz = (m10 - m01) * inv;
    } else {
        s = m00 - m11 - m22;
        if s > SHEPPERD_PIVOT_THRESHOLD {
            qx = 0.5 * (s + 1.0).sqrt();
            let inv = 0.25 / qx;
            qs = (m21 - m12) * inv;
            qy = (m10 + m01) * inv;
            qz = (m02 + m20) * inv;
        } else {
            s = m11 - m00 - m22;
            if s > SHEPPERD_PIVOT_THRESHOLD {
                qy = 0.5 * (s + 1.0).sqrt();
                let inv = 0.25 / qy;
                qs = (m02 - m20) * inv;
                qx = (m10 + m01) * inv;
                qz = (m21 + m12) * inv;
            } else {
                // the four squared components sum to one, so this pivot cannot be small
                s = m22 - m00 - m11;
                qz = 0.5 * (s + 1.0).sqrt();
                let inv = 0.25 / qz;
                qs = (m10 - m01) * inv;
                qx = (m02 + m20) * inv;
                qy = (m21 + m12) * inv;
            }
        }
    }

    DQuat::from_xyzw(qx, qy, qz, qs)
}

/// Extract the axis-angle of a rotation matrix, the angle being in `[0, π]`.
///
/// Rotations up to 90° read the axis off the skew-symmetric part of the matrix. Larger rotations
/// read it off the symmetric part, which stays well conditioned up to and including 180°.
pub fn matrix_to_axis_angle(rotation: &impl Matrix3ReadOnly) -> AxisAngle {
    if rotation.contains_nan() {
        return AxisAngle::nan();
    }

    let [m00, m01, m02, m10, m11, m12, m20, m21, m22] = rotation.to_array();

    // twice the sine and the cosine of the angle
    let ux = m21 - m12;
    let uy = m02 - m20;
    let uz = m10 - m01;
    let sin2 = (ux * ux + uy * uy + uz * uz).sqrt();
    let cos2 = m00 + m11 + m22 - 1.0;
    let angle = sin2.atan2(cos2);

    if cos2 >= 0.0 {
        if sin2 < EPS_ZERO_ROTATION {
            return AxisAngle::ZERO;
        }
        return AxisAngle::new(DVec3::new(ux, uy, uz) / sin2, angle);
    }

    // R + Rᵗ = 2 cos(θ) I + 2 (1 - cos(θ)) a aᵗ
    let c = 0.5 * cos2;
    let inv = 1.0 / (1.0 - c);
    let xx = ((m00 - c) * inv).max(0.0);
    let yy = ((m11 - c) * inv).max(0.0);
    let zz = ((m22 - c) * inv).max(0.0);
    let xy = 0.5 * (m01 + m10) * inv;
    let xz = 0.5 * (m02 + m20) * inv;
    let yz = 0.5 * (m12 + m21) * inv;

    let mut axis = if xx >= yy && xx >= zz {
        let x = xx.sqrt();
        DVec3::new(x, xy / x, xz / x)
    } else if yy >= zz {
        let y = yy.sqrt();
        DVec3::new(xy / y, y, yz / y)
    } else {
        let z = zz.sqrt();
        DVec3::new(xz / z, yz / z, z)
    };

    // orient the axis so that the angle is positive
    if axis.dot(DVec3::new(ux, uy, uz)) < 0.0 {
        axis = -axis;
    }

    AxisAngle::new(axis.normalize(), angle)
}

/// Extract the rotation vector, `axis * angle`, of a rotation matrix.
pub fn matrix_to_rotation_vector(rotation: &impl Matrix3ReadOnly) -> DVec3 {
    matrix_to_axis_angle(rotation).to_rotation_vector()
}

/// Yaw of a rotation matrix: the rotation angle about the z axis.
#[inline]
pub fn compute_yaw(rotation: &impl Matrix3ReadOnly) -> f64 {
    rotation.m10().atan2(rotation.m00())
}

/// Pitch of a rotation matrix: the rotation angle about the y axis, in `[-π/2, π/2]`.
#[inline]
pub fn compute_pitch(rotation: &impl Matrix3ReadOnly) -> f64 {
    let (m21, m22) = (rotation.m21(), rotation.m22());
    (-rotation.m20()).atan2((m21 * m21 + m22 * m22).sqrt())
}

/// Roll of a rotation matrix: the rotation angle about the x axis.
#[inline]
pub fn compute_roll(rotation: &impl Matrix3ReadOnly) -> f64 {
    rotation.m21().atan2(rotation.m22())
}

/// Extract yaw, pitch and roll of a rotation matrix.
///
/// At a pitch of ±90° only the sum (or difference) of yaw and roll is observable, in which case
/// the roll is set to zero and the whole rotation about the vertical is reported as yaw.
pub fn matrix_to_yaw_pitch_roll(rotation: &impl Matrix3ReadOnly) -> YawPitchRoll {
    if rotation.contains_nan() {
        return YawPitchRoll::new(f64::NAN, f64::NAN, f64::NAN);
    }

    let pitch = compute_pitch(rotation);
    let (m00, m10) = (rotation.m00(), rotation.m10());
    if (m00 * m00 + m10 * m10).sqrt() < EPS_GIMBAL_LOCK {
        let yaw = (-rotation.m01()).atan2(rotation.m11());
        return YawPitchRoll::new(yaw, pitch, 0.0);
    }

    YawPitchRoll::new(compute_yaw(rotation), pitch, compute_roll(rotation))
}

/// Quaternion of the rotation of `angle` radians about `axis`.
pub fn axis_angle_to_quaternion(axis: &impl Tuple3, angle: f64) -> DQuat {
    if axis.contains_nan() || angle.is_nan() {
        return DQuat::from_xyzw(f64::NAN, f64::NAN, f64::NAN, f64::NAN);
    }

    let magnitude = axis.norm();
    if magnitude < EPS_ZERO_ROTATION {
        return DQuat::IDENTITY;
    }

    let (s, c) = (0.5 * angle).sin_cos();
    let k = s / magnitude;
    DQuat::from_xyzw(axis.x() * k, axis.y() * k, axis.z() * k, c)
}

/// Quaternion of a rotation vector.
pub fn rotation_vector_to_quaternion(rotation_vector: &impl Tuple3) -> DQuat {
    axis_angle_to_quaternion(rotation_vector, rotation_vector.norm())
}

/// Axis-angle of a quaternion, the angle being in `[0, π]`.
pub fn quaternion_to_axis_angle(quaternion: &impl Tuple4) -> AxisAngle {
    if quaternion.contains_nan() {
        return AxisAngle::nan();
    }

    // q and -q are the same rotation: take the one with a non-negative scalar part
    let sign = if quaternion.s() < 0.0 { -1.0 } else { 1.0 };
    let v = DVec3::new(quaternion.x(), quaternion.y(), quaternion.z()) * sign;
    let s = quaternion.s() * sign;

    let sin_half = v.length();
    if sin_half < EPS_ZERO_ROTATION {
        return AxisAngle::ZERO;
    }

    AxisAngle::new(v / sin_half, 2.0 * sin_half.atan2(s))
}

/// Rotation vector of a quaternion.
pub fn quaternion_to_rotation_vector(quaternion: &impl Tuple4) -> DVec3 {
    quaternion_to_axis_angle(quaternion).to_rotation_vector()
}
