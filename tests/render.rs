use approx::assert_abs_diff_eq;
use spheretrace::{
    algebra::Vec3,
    camera::{Camera, CameraConfig},
    config::Setup,
    light::LightModel,
    material::Material,
    renderer::{background_color, RenderSettings, Renderer},
    scene::{Scene, SphereRecord},
};

fn forward_camera(rows: usize, cols: usize) -> Camera {
    Camera::new(CameraConfig {
        origin: Vec3::ZERO,
        yaw: 0.0,
        pitch: 0.0,
        roll: 0.0,
        viewport_height: 1.0,
        rows,
        cols,
        focal_distance: 1.0,
    })
    .unwrap()
}

#[test]
fn test_center_ray_hits_unit_sphere_at_t_two() {
    let base = Vec3(0.2, 0.6, 0.9);
    let scene = Scene::new([SphereRecord::new(1.0, Vec3(0.0, 0.0, 3.0), Material::matte(base))]).unwrap();
    let camera = forward_camera(8, 8);
    let settings = RenderSettings::default();

    let rd = camera.direction(4, 4);
    assert_eq!(rd, Vec3(0.0, 0.0, 1.0));
    let hit = scene.intersect_nearest(camera.origin(), rd, settings.near, f32::INFINITY).unwrap();
    assert_abs_diff_eq!(hit.t, 2.0, epsilon = 1e-6);

    let mut renderer = Renderer::new(scene, LightModel::ambient_only(1.0), camera, settings);
    renderer.render_single();
    assert_eq!(renderer.framebuffer().get(4, 4), base);
}

#[test]
fn test_empty_scene_is_pure_background() {
    let camera = forward_camera(6, 10);
    let expected: Vec<Vec3> = (0..6)
        .flat_map(|r| (0..10).map(move |c| (r, c)))
        .map(|(r, c)| background_color(camera.direction(r, c)).clamp(0.0, 1.0))
        .collect();

    let mut renderer = Renderer::new(Scene::empty(), LightModel::default(), camera, RenderSettings::default());
    renderer.render(1);
    assert_eq!(renderer.framebuffer().pixels(), expected.as_slice());
}

#[test]
fn test_ambient_only_matte_sphere_is_flat_and_clamped() {
    let base = Vec3(0.8, 0.5, 1.0);
    let ambient = 1.5;
    let scene = Scene::new([SphereRecord::new(1.0, Vec3(0.0, 0.0, 3.0), Material::matte(base))]).unwrap();
    let camera = forward_camera(12, 12);
    let settings = RenderSettings::default();
    let mut renderer = Renderer::new(scene.clone(), LightModel::ambient_only(ambient), camera.clone(), settings);
    renderer.render(1);

    let mut hits = 0;
    for row in 0..12 {
        for col in 0..12 {
            let rd = camera.direction(row, col);
            let px = renderer.framebuffer().get(row, col);
            if scene.intersect_nearest(camera.origin(), rd, settings.near, f32::INFINITY).is_some() {
                hits += 1;
                assert_eq!(px, Vec3(1.0, 0.75, 1.0), "pixel ({row}, {col})");
            } else {
                assert_eq!(px, background_color(rd).clamp(0.0, 1.0));
            }
        }
    }
    assert!(hits > 0);
}

#[test]
fn test_default_scene_renders_deterministically() {
    let setup = Setup::builtin().unwrap();
    let config = CameraConfig { rows: 27, cols: 48, ..*setup.camera.config() };

    let render = || {
        let mut r = Renderer::new(
            setup.scene.clone(),
            setup.lights,
            Camera::new(config).unwrap(),
            setup.render,
        );
        r.render_single();
        r.framebuffer().clone()
    };
    let a = render();
    let b = render();
    assert_eq!(a, b);
    assert!(a.pixels().iter().any(|p| *p != a.pixels()[0]));
}

#[test]
fn test_supersampled_default_scene_stays_in_range() {
    let setup = Setup::builtin().unwrap();
    let config = CameraConfig { rows: 18, cols: 32, ..*setup.camera.config() };
    let settings = RenderSettings { samples: 4, depth: 4, ..setup.render };
    let mut r = Renderer::new(setup.scene, setup.lights, Camera::new(config).unwrap(), settings);
    r.render(settings.samples);
    for p in r.framebuffer().pixels() {
        for c in p.to_array() {
            assert!((0.0..=1.0).contains(&c));
        }
    }
    assert!(r.is_complete());
}

#[test]
fn test_reconfigured_camera_resets_progress() {
    let mut r = Renderer::new(Scene::default_scene(), LightModel::default(), forward_camera(4, 4), RenderSettings::default());
    r.render_single();
    assert!(r.is_complete());

    let config = CameraConfig { rows: 3, cols: 5, ..*r.camera().config() };
    r.reconfigure_camera(config).unwrap();
    assert_eq!(r.remaining(), 15);
    assert_eq!((r.framebuffer().rows(), r.framebuffer().cols()), (3, 5));

    r.render_single();
    assert!(r.is_complete());
}
