use ar_ruler::{Camera, normalize_screen_point, glam::*};

use crate::common::given::{self, assert_vec3_near};

#[test]
fn test_camera_unproject_at_center_should_return_point_along_forward() {
    let camera = given::camera();

    assert_vec3_near(camera.unproject(vec2(0.5, 0.5), 2.0), vec3(0.0, 0.0, -2.0));
}

#[test]
fn test_camera_unproject_at_right_edge_should_scale_by_horizontal_fov() {
    let camera = given::camera();
    let tan_half_fov = (camera.vertical_fov * 0.5).tan();

    let world = camera.unproject(vec2(1.0, 0.5), 2.0);

    assert_vec3_near(
        world,
        vec3(tan_half_fov * camera.aspect_ratio * 2.0, 0.0, -2.0),
    );
}

#[test]
fn test_camera_unproject_when_posed_should_apply_position_and_rotation() {
    let camera = given::camera().with_pose(
        vec3(1.0, 0.0, 0.0),
        Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
    );

    assert_vec3_near(camera.get_forward(), Vec3::NEG_X);
    assert_vec3_near(camera.unproject(vec2(0.5, 0.5), 3.0), vec3(-2.0, 0.0, 0.0));
}

#[test]
fn test_camera_project_should_invert_unproject() {
    let camera = given::camera().with_pose(
        vec3(0.3, 1.4, -0.2),
        Quat::from_euler(EulerRot::YXZ, 0.4, -0.3, 0.0),
    );

    for uv in [vec2(0.5, 0.5), vec2(0.1, 0.9), vec2(0.75, 0.2)] {
        let world = camera.unproject(uv, 1.7);
        let projected = camera.project(world).expect("in front");

        assert!(projected.abs_diff_eq(uv, 1e-4), "expected {uv}, got {projected}");
    }
}

#[test]
fn test_camera_project_when_behind_should_return_none() {
    let camera = given::camera();

    assert_eq!(camera.project(vec3(0.0, 0.0, 1.0)), None);
    assert_eq!(camera.project(Vec3::ZERO), None);
}

#[test]
fn test_camera_view_should_map_forward_to_negative_z() {
    let camera = given::camera().with_pose(
        vec3(0.0, 1.0, 0.0),
        Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
    );

    let view_pos = camera.view().transform_point3(camera.pos + camera.get_forward());

    assert_vec3_near(view_pos, Vec3::NEG_Z);
    assert_vec3_near(camera.get_right(), Vec3::NEG_Z);
}

#[test]
fn test_camera_projection_should_map_unprojected_point_to_ndc() {
    let camera = given::camera().with_pose(
        vec3(-0.5, 1.2, 0.3),
        Quat::from_euler(EulerRot::YXZ, -0.6, 0.2, 0.0),
    );
    let view_projection = camera.projection(0.1..100.0) * camera.view();

    for uv in [vec2(0.5, 0.5), vec2(0.2, 0.8), vec2(1.0, 0.0)] {
        let ndc = view_projection.project_point3(camera.unproject(uv, 2.5));

        assert!(
            ndc.xy().abs_diff_eq(uv * 2.0 - Vec2::ONE, 1e-4),
            "expected {uv}, got {ndc}"
        );
        assert!((0.0..=1.0).contains(&ndc.z));
    }
}

#[test]
fn test_normalize_screen_point_should_divide_by_screen_size() {
    let uv = normalize_screen_point(vec2(540.0, 480.0), uvec2(1080, 1920));

    assert_eq!(uv, vec2(0.5, 0.25));
}

#[test]
fn test_normalize_screen_point_when_screen_empty_should_stay_finite() {
    let uv = normalize_screen_point(vec2(3.0, 4.0), UVec2::ZERO);

    assert!(uv.is_finite());
    assert_eq!(Camera::UP, Vec3::Y);
}
