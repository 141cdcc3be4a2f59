use approx::assert_relative_eq;
use rand::{Rng, SeedableRng};

use kornia_rotation::{
    conversion, features, tools, Matrix3, Matrix3Error, Matrix3ReadOnly, RotationMatrix,
    RotationMatrixReadOnly, RotationScaleMatrix,
};

const NUM_SAMPLES: usize = 1000;

fn rng() -> rand::rngs::StdRng {
    rand::rngs::StdRng::seed_from_u64(7)
}

fn random_matrix(rng: &mut impl Rng) -> Matrix3 {
    let mut data = [0.0; 9];
    data.iter_mut()
        .for_each(|v| *v = rng.random_range(-10.0..10.0));
    Matrix3::from_array(&data)
}

// Gram-Schmidt and the cofactor inverse lose accuracy with the conditioning of the matrix.
fn well_conditioned(m: &Matrix3) -> bool {
    let column_norms: f64 = (0..3)
        .filter_map(|j| m.column(j).ok())
        .map(|c| c.length())
        .product();
    m.determinant().abs() >= 0.1 * column_norms
}

fn assert_matrix_eq(a: &impl Matrix3ReadOnly, b: &impl Matrix3ReadOnly, epsilon: f64) {
    for (ai, bi) in a.to_array().iter().zip(b.to_array()) {
        assert_relative_eq!(*ai, bi, epsilon = epsilon);
    }
}

#[test]
fn multiply_by_identity_is_exact() {
    let mut rng = rng();
    for _ in 0..NUM_SAMPLES {
        let a = random_matrix(&mut rng);
        assert_eq!(tools::multiply(&a, &Matrix3::IDENTITY), a);
        assert_eq!(tools::multiply(&Matrix3::IDENTITY, &a), a);
    }
}

#[test]
fn double_inverse_recovers_matrix() {
    let mut rng = rng();
    let mut checked = 0;
    for _ in 0..NUM_SAMPLES {
        let a = random_matrix(&mut rng);
        if !well_conditioned(&a) {
            continue;
        }
        let Some(a_inv) = tools::invert(&a) else {
            continue;
        };
        let Some(a_inv_inv) = tools::invert(&a_inv) else {
            continue;
        };
        assert_matrix_eq(&a_inv_inv, &a, 1e-10);
        assert_matrix_eq(&tools::multiply(&a, &a_inv), &Matrix3::IDENTITY, 1e-10);
        checked += 1;
    }
    assert!(checked > NUM_SAMPLES / 4);
}

#[test]
fn invert_zero_matrix_fails() {
    assert!(tools::invert(&Matrix3::ZERO).is_none());
    let mut zero = Matrix3::ZERO;
    assert!(zero.invert().is_err());
}

#[test]
fn rotation_invert_is_transpose_bit_for_bit() {
    let mut rng = rng();
    for _ in 0..NUM_SAMPLES {
        let rotation = RotationMatrix::from_random_with_rng(&mut rng);
        assert_relative_eq!(rotation.determinant(), 1.0, epsilon = 1e-10);

        let mut inverted = rotation;
        inverted.invert();
        let transposed = Matrix3::from(rotation).transposed();
        assert_eq!(inverted.to_array(), transposed.to_array());
    }
}

#[test]
fn quaternion_roundtrip() {
    let mut rng = rng();
    for _ in 0..NUM_SAMPLES {
        let rotation = RotationMatrix::from_random_with_rng(&mut rng);
        let q = rotation.to_quaternion();
        assert_matrix_eq(&conversion::quaternion_to_matrix(&q), &rotation, 1e-12);
    }
}

#[test]
fn axis_angle_roundtrip() {
    let mut rng = rng();
    for _ in 0..NUM_SAMPLES {
        let rotation = RotationMatrix::from_random_with_rng(&mut rng);
        let axis_angle = rotation.to_axis_angle();
        assert!(axis_angle.angle >= 0.0);
        assert!(axis_angle.angle <= std::f64::consts::PI);
        assert_relative_eq!(axis_angle.axis.length(), 1.0, epsilon = 1e-12);
        let back = conversion::axis_angle_to_matrix(&axis_angle.axis, axis_angle.angle);
        assert_matrix_eq(&back, &rotation, 1e-12);
    }
}

#[test]
fn rotation_vector_roundtrip() {
    let mut rng = rng();
    for _ in 0..NUM_SAMPLES {
        let rotation = RotationMatrix::from_random_with_rng(&mut rng);
        let rotation_vector = rotation.to_rotation_vector();
        let back = conversion::rotation_vector_to_matrix(&rotation_vector);
        assert_matrix_eq(&back, &rotation, 1e-12);
    }
}

#[test]
fn yaw_pitch_roll_roundtrip() {
    let mut rng = rng();
    for _ in 0..NUM_SAMPLES {
        let rotation = RotationMatrix::from_random_with_rng(&mut rng);
        let ypr = rotation.yaw_pitch_roll();
        let back = conversion::yaw_pitch_roll_to_matrix(ypr.yaw, ypr.pitch, ypr.roll);
        assert_matrix_eq(&back, &rotation, 1e-12);
    }
}

// Gram-Schmidt keeps the handedness, only positive determinants give rotations.
#[test]
fn normalize_positive_determinant_produces_rotation() {
    let mut rng = rng();
    for _ in 0..NUM_SAMPLES {
        let m = random_matrix(&mut rng);
        if !well_conditioned(&m) || m.determinant() < 0.0 {
            continue;
        }
        let normalized = tools::normalize(&m);
        assert!(normalized.is_ok());
        let Ok(normalized) = normalized else {
            continue;
        };
        assert!(features::is_rotation_matrix(&normalized.to_array(), 1e-10));

        // idempotent on orthonormal input
        let again = tools::normalize(&normalized);
        assert!(again.is_ok());
        if let Ok(again) = again {
            assert_matrix_eq(&again, &normalized, kornia_rotation::EPS_NORM);
        }
    }
}

#[test]
fn rotation_set_and_normalize_never_stores_reflection() {
    let mut rng = rng();
    let (mut accepted, mut rejected) = (0, 0);
    for _ in 0..NUM_SAMPLES {
        let m = random_matrix(&mut rng);
        if !well_conditioned(&m) {
            continue;
        }
        let mut rotation = RotationMatrix::from_yaw_pitch_roll(0.1, 0.2, 0.3);
        let before = rotation;
        match rotation.set_and_normalize(&m.to_array()) {
            Ok(()) => {
                assert!(m.determinant() > 0.0);
                assert!(rotation.is_rotation_matrix(1e-10));
                assert_relative_eq!(rotation.to_quaternion().length(), 1.0, epsilon = 1e-12);
                accepted += 1;
            }
            Err(err) => {
                assert!(m.determinant() < 0.0);
                assert!(matches!(err, Matrix3Error::NotARotationMatrix { .. }));
                assert_eq!(rotation, before);
                rejected += 1;
            }
        }
    }
    assert!(accepted > NUM_SAMPLES / 8);
    assert!(rejected > NUM_SAMPLES / 8);
}

#[test]
fn normalize_near_rotation() {
    let mut rng = rng();
    for _ in 0..NUM_SAMPLES {
        let rotation = RotationMatrix::from_random_with_rng(&mut rng);
        let mut noisy = Matrix3::from(rotation);
        let noise = random_matrix(&mut rng) * 1e-3;
        noisy = noisy + noise;
        let normalized = RotationMatrix::from_normalized(&noisy);
        assert!(normalized.is_ok());
        if let Ok(normalized) = normalized {
            assert!(normalized.is_rotation_matrix(1e-10));
        }
    }
}

#[test]
fn rotation_scale_recomposition() {
    let mut rng = rng();
    for _ in 0..NUM_SAMPLES {
        let rotation = RotationMatrix::from_random_with_rng(&mut rng);
        let (sx, sy, sz) = (
            rng.random_range(0.1..10.0),
            rng.random_range(0.1..10.0),
            rng.random_range(0.1..10.0),
        );
        let mut composite = Matrix3::from(rotation);
        composite.scale_columns(sx, sy, sz);

        let decomposed = RotationScaleMatrix::try_from_array(&composite.to_array());
        assert!(decomposed.is_ok());
        if let Ok(decomposed) = decomposed {
            assert_matrix_eq(&decomposed, &composite, 1e-10);
            assert_relative_eq!(decomposed.scale().x, sx, epsilon = 1e-10);
            assert_relative_eq!(decomposed.scale().y, sy, epsilon = 1e-10);
            assert_relative_eq!(decomposed.scale().z, sz, epsilon = 1e-10);
        }
    }
}

#[test]
fn long_composition_chain_stays_orthonormal() {
    let mut rng = rng();
    let mut rotation = RotationMatrix::IDENTITY;
    for _ in 0..NUM_SAMPLES {
        let step = RotationMatrix::from_random_with_rng(&mut rng);
        rotation.multiply(&step);
        rotation.pre_multiply_invert_other(&step);
        rotation.multiply_transpose_other(&step);
    }
    assert!(rotation.is_rotation_matrix(1e-12));
}

#[test]
fn concrete_scenarios() {
    assert_eq!(
        features::determinant(&[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]),
        1.0
    );
    assert!(Matrix3::IDENTITY.is_rotation_matrix(0.0));
    assert_eq!(
        Matrix3::from_array(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]).to_string(),
        "0.0, 1.0, 2.0\n3.0, 4.0, 5.0\n6.0, 7.0, 8.0\n"
    );
}
