// Copyright @yucwang 2026

pub mod direct_ems;
pub mod direct_mats;
pub mod direct_mis;
pub mod path;
pub mod path_mis;
pub mod path_nee;
pub mod vpl;

use crate::core::bsdf::{BSDFQueryRecord, Measure};
use crate::core::emitter::EmitterQueryRecord;
use crate::core::error::{RenderError, RenderResult};
use crate::core::integrator::Integrator;
use crate::core::interaction::SurfaceIntersection;
use crate::core::sampler::Sampler;
use crate::core::scene::Scene;
use crate::core::tangent_frame::{build_tangent_frame, world_to_local};
use crate::math::constants::{EPSILON, Float, SHADOW_EPSILON, Vector3f};
use crate::math::ray::Ray3f;
use crate::math::spectrum::{RGBSpectrum, Spectrum};

/// Balance heuristic for combining two sampling techniques. Weights over
/// the techniques that could have produced the sample sum to one; a zero
/// competing density hands the full weight to the other technique.
pub fn balance_heuristic(pdf_a: Float, pdf_b: Float) -> Float {
    if pdf_a <= 0.0 && pdf_b <= 0.0 {
        return 0.0;
    }
    pdf_a / (pdf_a + pdf_b)
}

/// Closed, name-keyed integrator registry (no global registration).
pub fn create_integrator(name: &str, samples_per_pixel: u32) -> RenderResult<Box<dyn Integrator>> {
    match name {
        "direct_ems" => Ok(Box::new(direct_ems::DirectEmitterSampling::new(samples_per_pixel))),
        "direct_mats" => Ok(Box::new(direct_mats::DirectMaterialSampling::new(samples_per_pixel))),
        "direct_mis" => Ok(Box::new(direct_mis::DirectMis::new(samples_per_pixel))),
        "path" => Ok(Box::new(path::PathIntegrator::new(samples_per_pixel))),
        "path_nee" => Ok(Box::new(path_nee::PathNeeIntegrator::new(samples_per_pixel))),
        "path_mis" => Ok(Box::new(path_mis::PathMisIntegrator::new(samples_per_pixel))),
        "vpl" => Ok(Box::new(vpl::VplIntegrator::new(128, 3, samples_per_pixel))),
        _ => Err(RenderError::InvalidConfig(format!("unknown integrator: {}", name))),
    }
}

/// Emitted radiance when the traced ray lands on an emitter directly.
pub(crate) fn emitter_hit_radiance(
    scene: &Scene,
    ray: &Ray3f,
    hit: &SurfaceIntersection,
) -> Option<RGBSpectrum> {
    let emitter = scene.emitter_at(hit)?;
    let record = EmitterQueryRecord::from_hit(ray.origin(), hit.p(), hit.sh_normal(), hit.uv());
    Some(emitter.eval(&record))
}

/// Spawn a secondary ray from a surface, nudged off the geometry along the
/// geometric normal.
pub(crate) fn spawn_ray(hit: &SurfaceIntersection, dir: Vector3f) -> Ray3f {
    let n_geo = hit.geo_normal();
    let offset = if dir.dot(&n_geo) >= 0.0 { n_geo } else { -n_geo };
    Ray3f::new(hit.p() + offset * EPSILON, dir, Some(EPSILON), None)
}

/// Shadow-ray test: anything strictly closer than the target distance
/// occludes the sample.
pub(crate) fn occluded(scene: &Scene, hit: &SurfaceIntersection, dir: &Vector3f, dist: Float) -> bool {
    let n_geo = hit.geo_normal();
    let offset = if dir.dot(&n_geo) >= 0.0 { n_geo } else { -n_geo };
    let shadow_ray = Ray3f::new(
        hit.p() + offset * EPSILON,
        *dir,
        Some(EPSILON),
        Some(dist - SHADOW_EPSILON),
    );
    scene.ray_intersection_t(&shadow_ray)
}

pub(crate) struct LightSample {
    /// Le * f * cos / (selection density * point density), no MIS weight.
    pub contribution: RGBSpectrum,
    /// Combined light-sampling density (selection * solid angle).
    pub pdf_light: Float,
    /// Density with which material sampling would have produced the same
    /// direction.
    pub pdf_bsdf: Float,
}

/// One light-sampling estimate of the reflected direct illumination at
/// `hit`. `None` covers every zero-contribution outcome: no emitters,
/// occlusion, back-facing geometry, degenerate densities.
pub(crate) fn sample_direct_light(
    scene: &Scene,
    sampler: &mut dyn Sampler,
    ray: &Ray3f,
    hit: &SurfaceIntersection,
) -> Option<LightSample> {
    let material = hit.material()?;
    let (emitter, selection_pdf) = scene.sample_emitter(sampler.next_1d())?;

    let mut light_record = EmitterQueryRecord::new(hit.p());
    let radiance = emitter.sample(&mut light_record, &sampler.next_2d());
    if radiance.is_black() || light_record.pdf <= 0.0 {
        return None;
    }
    let pdf_light = selection_pdf * light_record.pdf;

    let n_sh = hit.sh_normal();
    let cos_theta = n_sh.dot(&light_record.wi);
    if cos_theta <= 0.0 {
        return None;
    }

    if occluded(scene, hit, &light_record.wi, light_record.dist) {
        return None;
    }

    let (tangent, bitangent) = build_tangent_frame(&n_sh);
    let wi_local = world_to_local(&-ray.dir(), &tangent, &bitangent, &n_sh);
    let wo_local = world_to_local(&light_record.wi, &tangent, &bitangent, &n_sh);
    let bsdf_record =
        BSDFQueryRecord::with_directions(wi_local, wo_local, hit.uv(), Measure::SolidAngle);

    let f = material.eval(&bsdf_record);
    if f.is_black() {
        return None;
    }

    let contribution = radiance * f * (cos_theta / pdf_light);
    if !contribution.is_valid() {
        // Ill-conditioned geometry is clamped to a zero contribution.
        return None;
    }

    Some(LightSample {
        contribution,
        pdf_light,
        pdf_bsdf: material.pdf(&bsdf_record),
    })
}


#[cfg(test)]
pub(crate) mod test_scenes {
    use crate::core::scene::{Scene, SceneObject};
    use crate::materials::lambertian_diffuse::LambertianDiffuseBSDF;
    use crate::materials::mirror::MirrorBSDF;
    use crate::math::constants::Vector3f;
    use crate::math::ray::Ray3f;
    use crate::math::spectrum::RGBSpectrum;
    use crate::shapes::rectangle::Rectangle;
    use std::sync::Arc;

    pub const LIGHT_RADIANCE: f32 = 10.0;
    pub const FLOOR_ALBEDO: f32 = 0.5;

    fn floor_shape() -> Rectangle {
        // 10x10 floor in the z = 0 plane, normal +z.
        Rectangle::new(
            Vector3f::new(-5.0, -5.0, 0.0),
            Vector3f::new(10.0, 0.0, 0.0),
            Vector3f::new(0.0, 10.0, 0.0),
        )
    }

    fn light_shape() -> Rectangle {
        // Small 0.2 x 0.2 light at z = 2, normal -z.
        Rectangle::new(
            Vector3f::new(-0.1, -0.1, 2.0),
            Vector3f::new(0.0, 0.2, 0.0),
            Vector3f::new(0.2, 0.0, 0.0),
        )
    }

    /// Diffuse floor lit by a small overhead area light.
    pub fn light_over_floor() -> Scene {
        let mut scene = Scene::new();
        scene.add_object(SceneObject::new(
            Arc::new(floor_shape()),
            Arc::new(LambertianDiffuseBSDF::new(RGBSpectrum::splat(FLOOR_ALBEDO))),
        ));
        scene.add_object(SceneObject::with_emission(
            Arc::new(light_shape()),
            Arc::new(LambertianDiffuseBSDF::new(RGBSpectrum::default())),
            RGBSpectrum::splat(LIGHT_RADIANCE),
        ));
        scene
    }

    /// Same scene with a mirror floor.
    pub fn light_over_mirror() -> Scene {
        let mut scene = Scene::new();
        scene.add_object(SceneObject::new(Arc::new(floor_shape()), Arc::new(MirrorBSDF::new())));
        scene.add_object(SceneObject::with_emission(
            Arc::new(light_shape()),
            Arc::new(LambertianDiffuseBSDF::new(RGBSpectrum::default())),
            RGBSpectrum::splat(LIGHT_RADIANCE),
        ));
        scene
    }

    /// Floor and light separated by a wide blocker at z = 1; every shadow
    /// ray from the floor toward the light is occluded.
    pub fn occluded_light_over_floor() -> Scene {
        let mut scene = light_over_floor();
        let blocker = Rectangle::new(
            Vector3f::new(-1.0, -1.0, 1.0),
            Vector3f::new(2.0, 0.0, 0.0),
            Vector3f::new(0.0, 2.0, 0.0),
        );
        scene.add_object(SceneObject::new(
            Arc::new(blocker),
            Arc::new(LambertianDiffuseBSDF::new(RGBSpectrum::splat(FLOOR_ALBEDO))),
        ));
        scene
    }

    /// Camera ray that hits the light head on from below.
    pub fn ray_at_light() -> Ray3f {
        Ray3f::new(Vector3f::new(0.0, 0.0, 1.0), Vector3f::new(0.0, 0.0, 1.0), None, None)
    }

    /// Camera ray that hits the center of the floor from above.
    pub fn ray_at_floor() -> Ray3f {
        Ray3f::new(Vector3f::new(0.0, 0.0, 0.5), Vector3f::new(0.0, 0.0, -1.0), None, None)
    }

    /// Expected direct illumination at the floor center: the light is small
    /// and distant, so L * A * (albedo / pi) * cos^2 / d^2 is accurate to a
    /// fraction of a percent.
    pub fn analytic_floor_radiance() -> f32 {
        let area = 0.04;
        let dist2 = 4.0;
        LIGHT_RADIANCE * area * (FLOOR_ALBEDO / std::f32::consts::PI) / dist2
    }
}
