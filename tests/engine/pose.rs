use ar_ruler::{Pose, look_rotation, glam::*};

use crate::common::given::assert_vec3_near;

#[test]
fn test_pose_default_should_be_identity() {
    assert_eq!(Pose::default(), Pose::IDENTITY);
    assert_eq!(
        Pose::from_position(Vec3::ONE),
        Pose::new(Vec3::ONE, Quat::IDENTITY)
    );
}

#[test]
fn test_look_rotation_should_map_z_to_forward() {
    for forward in [Vec3::X, Vec3::NEG_Z, vec3(1.0, 0.5, -2.0)] {
        let rotation = look_rotation(forward, Vec3::Y);

        assert!(rotation.is_normalized());
        assert_vec3_near(rotation * Vec3::Z, forward.normalize());
    }
}

#[test]
fn test_look_rotation_should_keep_up_in_vertical_plane() {
    let forward = vec3(1.0, 0.5, -2.0);

    let rotation = look_rotation(forward, Vec3::Y);
    let right = rotation * Vec3::X;

    assert!(right.y.abs() < 1e-5);
    assert!((rotation * Vec3::Y).y > 0.0);
}

#[test]
fn test_look_rotation_when_forward_zero_should_return_identity() {
    assert_eq!(look_rotation(Vec3::ZERO, Vec3::Y), Quat::IDENTITY);
}

#[test]
fn test_look_rotation_when_forward_parallel_to_up_should_still_face_forward() {
    let rotation = look_rotation(Vec3::NEG_Y * 3.0, Vec3::Y);

    assert!(rotation.is_finite());
    assert!(rotation.is_normalized());
    assert_vec3_near(rotation * Vec3::Z, Vec3::NEG_Y);
}
