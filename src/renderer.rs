use crate::{
    algebra::{powi_sat, same_sign, Color},
    intersection::{Intersection, LightContext},
    ray::Ray,
    scene::Scene,
};

/// Maps a ray to the color seen along it.
pub trait RayTracer: Send + Sync {
    fn trace_ray(&self, ray: &Ray) -> Color;
}

/// Local Phong illumination with hard shadows.
///
/// Only direct light is gathered. A recursive tracer would spawn reflected
/// and refracted rays here, weighted by the material's `kr` and `kt`.
pub struct SimpleRayTracer<'a> {
    scene: &'a Scene,
}

impl<'a> SimpleRayTracer<'a> {
    pub fn new(scene: &'a Scene) -> Self {
        Self { scene }
    }

    fn calc_color(&self, hit: &Intersection<'_>) -> Color {
        let material = hit.geometry.material();
        let ambient = self.scene.ambient.intensity().attenuate(material.ka);
        let base = hit.geometry.emission().add(ambient);
        if hit.is_grazing() {
            return base;
        }

        self.scene
            .lights
            .iter()
            .filter_map(|light| hit.with_light(light))
            .filter(|ctx| same_sign(ctx.l_n, hit.v_n))
            .filter(|ctx| self.unshaded(hit, ctx))
            .fold(base, |color, ctx| color.add(self.local_effects(hit, &ctx)))
    }

    fn local_effects(&self, hit: &Intersection<'_>, ctx: &LightContext<'_>) -> Color {
        let material = hit.geometry.material();
        let diffuse = material.kd.scale(ctx.l_n.abs());

        // r = l - 2(l·n)n
        let n = hit.normal.xyz();
        let r = ctx.l.xyz().sub(n.scale(2.0 * ctx.l_n));
        let shine = powi_sat((-hit.v.xyz().dot(r)).max(0.0), material.shininess);
        let specular = material.ks.scale(shine);

        ctx.light
            .intensity_at(&hit.point)
            .attenuate(diffuse.add(specular))
    }

    fn unshaded(&self, hit: &Intersection<'_>, ctx: &LightContext<'_>) -> bool {
        let to_light = -ctx.l;
        let shadow_ray = Ray::offset(hit.point, to_light, &hit.normal);
        let distance = ctx.light.distance_to(shadow_ray.origin());
        !self.scene.geometries.any_hit(&shadow_ray, distance)
    }
}

impl RayTracer for SimpleRayTracer<'_> {
    fn trace_ray(&self, ray: &Ray) -> Color {
        let Some(hits) = self.scene.geometries.calculate_intersections(ray, f64::INFINITY) else {
            return self.scene.background;
        };
        let Some(closest) = ray.closest_hit(hits) else {
            return self.scene.background;
        };
        match Intersection::new(closest, ray) {
            Ok(hit) => self.calc_color(&hit),
            Err(e) => {
                log::debug!("no normal at {:?}: {e}", closest.point);
                self.scene.background
            }
        }
    }
}
