// Copyright @yucwang 2026

use crate::core::bsdf::BSDFQueryRecord;
use crate::core::computation_node::ComputationNode;
use crate::core::integrator::Integrator;
use crate::core::sampler::Sampler;
use crate::core::scene::Scene;
use crate::core::tangent_frame::{build_tangent_frame, local_to_world, world_to_local};
use crate::integrators::{emitter_hit_radiance, spawn_ray};
use crate::math::ray::Ray3f;
use crate::math::spectrum::{RGBSpectrum, Spectrum};

/// Single-bounce direct illumination by material sampling: importance
/// sample the BSDF and look for an emitter (or the background) along the
/// sampled direction.
pub struct DirectMaterialSampling {
    samples_per_pixel: u32,
}

impl DirectMaterialSampling {
    pub fn new(samples_per_pixel: u32) -> Self {
        Self { samples_per_pixel }
    }
}

impl ComputationNode for DirectMaterialSampling {
    fn to_string(&self) -> String {
        String::from("DirectMaterialSampling")
    }
}

impl Integrator for DirectMaterialSampling {
    fn trace_ray(&self, scene: &Scene, sampler: &mut dyn Sampler, ray: &Ray3f) -> RGBSpectrum {
        let mut lo = RGBSpectrum::default();

        let hit = match scene.ray_intersection(ray) {
            Some(hit) => hit,
            None => return scene.background(ray),
        };

        if let Some(radiance) = emitter_hit_radiance(scene, ray, &hit) {
            return radiance;
        }

        let material = match hit.material() {
            Some(material) => material,
            None => return lo,
        };

        let n_sh = hit.sh_normal();
        let (tangent, bitangent) = build_tangent_frame(&n_sh);
        let wi_local = world_to_local(&-ray.dir(), &tangent, &bitangent, &n_sh);

        let mut bsdf_record = BSDFQueryRecord::new(wi_local, hit.uv());
        // Throughput weight, already divided by the sampling density.
        let fr = material.sample(&mut bsdf_record, &sampler.next_2d());
        if fr.is_black() {
            // Absorbed; a successful zero-contribution outcome.
            return lo;
        }

        let wo_world = local_to_world(&bsdf_record.wo, &tangent, &bitangent, &n_sh);
        let sampled_ray = spawn_ray(&hit, wo_world);

        match scene.ray_intersection(&sampled_ray) {
            Some(second_hit) => {
                if let Some(radiance) = emitter_hit_radiance(scene, &sampled_ray, &second_hit) {
                    lo += radiance * fr;
                }
            }
            None => {
                lo += scene.background(&sampled_ray) * fr;
            }
        }

        lo
    }

    fn samples_per_pixel(&self) -> u32 {
        self.samples_per_pixel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sampler::IndependentSampler;
    use crate::core::scene::SceneObject;
    use crate::integrators::test_scenes::*;
    use crate::materials::lambertian_diffuse::LambertianDiffuseBSDF;
    use crate::math::constants::Vector3f;
    use crate::shapes::rectangle::Rectangle;
    use std::sync::Arc;

    #[test]
    fn test_direct_hit_on_emitter_returns_its_radiance() {
        let scene = light_over_floor();
        let integrator = DirectMaterialSampling::new(1);
        let mut sampler = IndependentSampler::new(3);

        let radiance = integrator.trace_ray(&scene, &mut sampler, &ray_at_light());
        assert!((radiance[0] - LIGHT_RADIANCE).abs() < 1e-5);
    }

    #[test]
    fn test_mirror_bounce_reaches_the_light() {
        let scene = light_over_mirror();
        let integrator = DirectMaterialSampling::new(1);
        let mut sampler = IndependentSampler::new(5);

        // The reflected direction is deterministic for the mirror, so the
        // estimate is exact.
        let ray = Ray3f::new(Vector3f::new(0.0, 0.0, 1.0), Vector3f::new(0.0, 0.0, -1.0), None, None);
        let radiance = integrator.trace_ray(&scene, &mut sampler, &ray);
        assert!((radiance[0] - LIGHT_RADIANCE).abs() < 1e-4);
    }

    #[test]
    fn test_escaping_sample_picks_up_the_background() {
        // A lone diffuse floor under a white background: every material
        // sample escapes, so the estimate is exactly the albedo.
        let mut scene = crate::core::scene::Scene::new();
        scene.add_object(SceneObject::new(
            Arc::new(Rectangle::new(
                Vector3f::new(-5.0, -5.0, 0.0),
                Vector3f::new(10.0, 0.0, 0.0),
                Vector3f::new(0.0, 10.0, 0.0),
            )),
            Arc::new(LambertianDiffuseBSDF::new(RGBSpectrum::splat(FLOOR_ALBEDO))),
        ));
        scene.set_background(RGBSpectrum::white());

        let integrator = DirectMaterialSampling::new(1);
        let mut sampler = IndependentSampler::new(11);
        for _ in 0..64 {
            let radiance = integrator.trace_ray(&scene, &mut sampler, &ray_at_floor());
            assert!((radiance[0] - FLOOR_ALBEDO).abs() < 1e-5);
        }
    }
}
