use approx::assert_abs_diff_eq;
use phong_tracer::{
    algebra::{Color, Double3, Point, Vector},
    camera::Camera,
    geometries::Geometries,
    light::{AmbientLight, DirectionalLight, PointLight},
    material::Material,
    object::Geometry,
    output::PixelBuffer,
    plane::Plane,
    ray::Ray,
    renderer::{RayTracer, SimpleRayTracer},
    scene::Scene,
    sphere::Sphere,
};

fn camera(multithreading: bool) -> Camera {
    Camera::builder()
        .location(Point::ORIGIN)
        .direction(Vector::new(0.0, 0.0, -1.0).unwrap(), Vector::Y)
        .vp_size(3.0, 3.0)
        .vp_distance(1.0)
        .resolution(3, 3)
        .multithreading(multithreading)
        .build()
        .unwrap()
}

#[test]
fn center_pixel_matches_closed_form_phong() {
    let intensity = Color::new(200.0, 100.0, 50.0);
    let emission = Color::new(1.0, 2.0, 3.0);
    let material = Material::default()
        .with_ka(0.5)
        .with_kd(0.5)
        .with_ks(0.3)
        .with_shininess(10);

    let scene = Scene::new("phong")
        .with_background(Color::new(0.0, 0.0, 255.0))
        .with_ambient(AmbientLight::new(Color::new(50.0, 50.0, 50.0), 0.2))
        .with_light(PointLight::new(intensity, Point::ORIGIN).with_kc(1.0).with_kl(0.05).with_kq(0.01))
        .with_geometry(
            Geometry::new(Sphere::new(Point::new(0.0, 0.0, -5.0), 1.0).unwrap())
                .with_emission(emission)
                .with_material(material),
        )
        .finalize();

    let mut sink = PixelBuffer::new(3, 3);
    camera(false).render(&SimpleRayTracer::new(&scene), &mut sink).unwrap();

    // hit at distance 4 facing the light: |l·n| = 1 and the reflection points
    // straight back at the viewer, so diffuse and specular factors are 1
    let attenuation = 1.0 + 0.05 * 4.0 + 0.01 * 16.0;
    let expected = |i: f64, e: f64| e + 10.0 * 0.5 + i / attenuation * (0.5 + 0.3);
    let c = sink.get(1, 1);
    assert_abs_diff_eq!(c.r(), expected(200.0, 1.0), epsilon = 1e-6);
    assert_abs_diff_eq!(c.g(), expected(100.0, 2.0), epsilon = 1e-6);
    assert_abs_diff_eq!(c.b(), expected(50.0, 3.0), epsilon = 1e-6);

    // the corner rays pass beside the sphere
    assert_eq!(sink.get(0, 0), Color::new(0.0, 0.0, 255.0));
}

#[test]
fn occluded_light_contributes_nothing() {
    let floor = || {
        Geometry::new(Plane::new(Point::new(0.0, -1.0, 0.0), Vector::Y).unwrap())
            .with_emission(Color::new(1.0, 1.0, 1.0))
            .with_material(Material::default().with_kd(0.5))
    };
    let side = DirectionalLight::new(Color::new(40.0, 40.0, 40.0), Vector::new(1.0, -1.0, 0.0).unwrap()).unwrap();
    let overhead = PointLight::new(Color::new(500.0, 500.0, 500.0), Point::new(0.0, 5.0, 0.0));
    let occluder = Geometry::new(Sphere::new(Point::new(0.0, 2.0, 0.0), 0.5).unwrap());

    let lit = Scene::new("lit")
        .with_ambient(AmbientLight::new(Color::new(20.0, 20.0, 20.0), 1.0))
        .with_light(side)
        .with_light(overhead)
        .with_geometry(floor())
        .finalize();
    let shadowed = lit.clone().with_geometry(occluder).finalize();

    let down = Ray::new(Point::ORIGIN, Vector::new(0.0, -1.0, 0.0).unwrap()).unwrap();
    let side_only = 1.0 + 20.0 + 40.0 * 0.5 * 0.5f64.sqrt();

    let c = SimpleRayTracer::new(&shadowed).trace_ray(&down);
    assert_abs_diff_eq!(c.r(), side_only, epsilon = 1e-9);

    let c = SimpleRayTracer::new(&lit).trace_ray(&down);
    assert_abs_diff_eq!(c.r(), side_only + 500.0 * 0.5, epsilon = 1e-9);
}

#[test]
fn empty_composite_reports_no_intersections() {
    let ray = Ray::new(Point::ORIGIN, Vector::X).unwrap();
    assert!(Geometries::new().calculate_intersections(&ray, f64::INFINITY).is_none());
    assert!(Geometries::new().find_intersections(&ray).is_none());
}

#[test]
fn hierarchy_and_threads_do_not_change_the_image() {
    let build = || {
        (0..5).fold(
            Scene::new("row")
                .with_ambient(AmbientLight::new(Color::new(30.0, 30.0, 30.0), Double3(1.0, 0.5, 0.25)))
                .with_light(PointLight::new(Color::new(300.0, 300.0, 300.0), Point::new(0.0, 3.0, 0.0))),
            |scene, k| {
                let x = k as f64 - 2.0;
                scene.with_geometry(
                    Geometry::new(Sphere::new(Point::new(x, 0.0, -6.0), 0.4).unwrap())
                        .with_material(Material::default().with_kd(0.7).with_ks(0.2).with_shininess(20)),
                )
            },
        )
    };
    let flat = build().finalize();
    let tree = build().build_hierarchy(1).finalize();
    assert_eq!(tree.geometries.len(), 1);

    let mut a = PixelBuffer::new(3, 3);
    let mut b = PixelBuffer::new(3, 3);
    camera(false).render(&SimpleRayTracer::new(&flat), &mut a).unwrap();
    camera(true).render(&SimpleRayTracer::new(&tree), &mut b).unwrap();
    assert_eq!(a.pixels(), b.pixels());
}
