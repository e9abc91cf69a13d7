// Copyright @yucwang 2026

use crate::core::bsdf::{BSDFQueryRecord, Measure};
use crate::core::computation_node::ComputationNode;
use crate::core::integrator::Integrator;
use crate::core::sampler::Sampler;
use crate::core::scene::Scene;
use crate::core::tangent_frame::{build_tangent_frame, local_to_world, world_to_local};
use crate::integrators::{emitter_hit_radiance, sample_direct_light, spawn_ray};
use crate::math::constants::Float;
use crate::math::ray::Ray3f;
use crate::math::spectrum::{RGBSpectrum, Spectrum};

const CONTINUATION_PROBABILITY: Float = 0.95;

/// Path tracing with next-event estimation: explicit light sampling at
/// every non-emissive vertex with a continuous BSDF, simply added to the
/// continuing material-sampled path. To keep the estimator unbiased,
/// emitter radiance found by a BSDF ray is only credited for camera rays
/// and after discrete bounces, where light sampling could not have
/// produced the direction.
pub struct PathNeeIntegrator {
    samples_per_pixel: u32,
}

impl PathNeeIntegrator {
    pub fn new(samples_per_pixel: u32) -> Self {
        Self { samples_per_pixel }
    }
}

impl ComputationNode for PathNeeIntegrator {
    fn to_string(&self) -> String {
        String::from("PathNeeIntegrator")
    }
}

impl Integrator for PathNeeIntegrator {
    fn trace_ray(&self, scene: &Scene, sampler: &mut dyn Sampler, ray: &Ray3f) -> RGBSpectrum {
        let mut lo = RGBSpectrum::default();
        let mut throughput = RGBSpectrum::white();
        let mut current = Ray3f::new(ray.origin(), ray.dir(), Some(ray.min_t), Some(ray.max_t));
        // Camera rays count as discrete: their emitter hits are credited.
        let mut from_discrete = true;

        loop {
            let hit = match scene.ray_intersection(&current) {
                Some(hit) => hit,
                None => {
                    lo += scene.background(&current) * throughput;
                    break;
                }
            };

            if let Some(radiance) = emitter_hit_radiance(scene, &current, &hit) {
                if from_discrete {
                    lo += radiance * throughput;
                }
                break;
            }

            let material = match hit.material() {
                Some(material) => material,
                None => break,
            };

            // Next-event estimation at this vertex.
            if !material.is_discrete() {
                if let Some(light) = sample_direct_light(scene, sampler, &current, &hit) {
                    lo += light.contribution * throughput;
                }
            }

            let n_sh = hit.sh_normal();
            let (tangent, bitangent) = build_tangent_frame(&n_sh);
            let wi_local = world_to_local(&-current.dir(), &tangent, &bitangent, &n_sh);

            let mut bsdf_record = BSDFQueryRecord::new(wi_local, hit.uv());
            let fr = material.sample(&mut bsdf_record, &sampler.next_2d());
            if fr.is_black() {
                break;
            }

            if sampler.next_1d() > CONTINUATION_PROBABILITY {
                break;
            }
            throughput = throughput * fr / CONTINUATION_PROBABILITY;
            from_discrete = bsdf_record.measure == Measure::Discrete;

            let wo_world = local_to_world(&bsdf_record.wo, &tangent, &bitangent, &n_sh);
            current = spawn_ray(&hit, wo_world);
        }

        lo
    }

    fn samples_per_pixel(&self) -> u32 {
        self.samples_per_pixel
    }
}
