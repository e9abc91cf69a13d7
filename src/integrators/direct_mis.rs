// Copyright @yucwang 2026

use crate::core::bsdf::{BSDFQueryRecord, Measure};
use crate::core::computation_node::ComputationNode;
use crate::core::integrator::Integrator;
use crate::core::sampler::Sampler;
use crate::core::scene::Scene;
use crate::core::tangent_frame::{build_tangent_frame, local_to_world, world_to_local};
use crate::integrators::{balance_heuristic, emitter_hit_radiance, sample_direct_light, spawn_ray};
use crate::math::ray::Ray3f;
use crate::math::spectrum::{RGBSpectrum, Spectrum};

/// Direct illumination combining emitter and material sampling with the
/// balance heuristic. Each technique's contribution is weighted by its own
/// density against the density with which the *other* technique would have
/// produced the same direction.
pub struct DirectMis {
    samples_per_pixel: u32,
}

impl DirectMis {
    pub fn new(samples_per_pixel: u32) -> Self {
        Self { samples_per_pixel }
    }
}

impl ComputationNode for DirectMis {
    fn to_string(&self) -> String {
        String::from("DirectMis")
    }
}

impl Integrator for DirectMis {
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

        // Emitter sampling, weighted against material sampling. Discrete
        // lobes evaluate to black, so this arm vanishes for them.
        if let Some(light) = sample_direct_light(scene, sampler, ray, &hit) {
            let weight = balance_heuristic(light.pdf_light, light.pdf_bsdf);
            lo += light.contribution * weight;
        }

        // Material sampling, weighted against emitter sampling.
        let n_sh = hit.sh_normal();
        let (tangent, bitangent) = build_tangent_frame(&n_sh);
        let wi_local = world_to_local(&-ray.dir(), &tangent, &bitangent, &n_sh);

        let mut bsdf_record = BSDFQueryRecord::new(wi_local, hit.uv());
        let fr = material.sample(&mut bsdf_record, &sampler.next_2d());
        if fr.is_black() {
            return lo;
        }
        let pdf_material = material.pdf(&bsdf_record);

        let wo_world = local_to_world(&bsdf_record.wo, &tangent, &bitangent, &n_sh);
        let sampled_ray = spawn_ray(&hit, wo_world);

        match scene.ray_intersection(&sampled_ray) {
            Some(second_hit) => {
                if let Some(radiance) = emitter_hit_radiance(scene, &sampled_ray, &second_hit) {
                    // A discrete sample cannot be produced by light
                    // sampling; it keeps the full weight.
                    let weight = if bsdf_record.measure == Measure::Discrete {
                        1.0
                    } else {
                        let pdf_emitter = scene.pdf_emitter_direct(&second_hit, &hit.p());
                        balance_heuristic(pdf_material, pdf_emitter)
                    };
                    lo += radiance * fr * weight;
                }
            }
            None => {
                // The background is only reachable by material sampling.
                lo += scene.background(&sampled_ray) * fr;
            }
        }

        lo
    }

    fn samples_per_pixel(&self) -> u32 {
        self.samples_per_pixel
    }
}
