// Copyright @yucwang 2026

use crate::core::bsdf::BSDFQueryRecord;
use crate::core::computation_node::ComputationNode;
use crate::core::integrator::Integrator;
use crate::core::sampler::Sampler;
use crate::core::scene::Scene;
use crate::core::tangent_frame::{build_tangent_frame, local_to_world, world_to_local};
use crate::integrators::{emitter_hit_radiance, spawn_ray};
use crate::math::constants::Float;
use crate::math::ray::Ray3f;
use crate::math::spectrum::{RGBSpectrum, Spectrum};

// Fixed continuation probability; survivors are scaled by 1/q so the
// expected contribution is unchanged.
const CONTINUATION_PROBABILITY: Float = 0.95;

/// Plain path tracing: emitters are only found through material-sampled
/// bounces, paths end by Russian roulette, absorption, or escape. The
/// recursion is reformulated as a loop carrying ray, throughput and depth.
pub struct PathIntegrator {
    samples_per_pixel: u32,
}

impl PathIntegrator {
    pub fn new(samples_per_pixel: u32) -> Self {
        Self { samples_per_pixel }
    }
}

impl ComputationNode for PathIntegrator {
    fn to_string(&self) -> String {
        String::from("PathIntegrator")
    }
}

impl Integrator for PathIntegrator {
    fn trace_ray(&self, scene: &Scene, sampler: &mut dyn Sampler, ray: &Ray3f) -> RGBSpectrum {
        let mut lo = RGBSpectrum::default();
        let mut throughput = RGBSpectrum::white();
        let mut current = Ray3f::new(ray.origin(), ray.dir(), Some(ray.min_t), Some(ray.max_t));

        loop {
            let hit = match scene.ray_intersection(&current) {
                Some(hit) => hit,
                None => {
                    lo += scene.background(&current) * throughput;
                    break;
                }
            };

            if let Some(radiance) = emitter_hit_radiance(scene, &current, &hit) {
                lo += radiance * throughput;
                break;
            }

            let material = match hit.material() {
                Some(material) => material,
                None => break,
            };

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

            let wo_world = local_to_world(&bsdf_record.wo, &tangent, &bitangent, &n_sh);
            current = spawn_ray(&hit, wo_world);
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
    use crate::core::sampler::{IndependentSampler, Sampler};
    use crate::integrators::test_scenes::*;

    #[test]
    fn test_direct_hit_on_emitter_returns_its_radiance() {
        let scene = light_over_floor();
        let integrator = PathIntegrator::new(1);
        let mut sampler = IndependentSampler::new(3);

        let radiance = integrator.trace_ray(&scene, &mut sampler, &ray_at_light());
        assert!((radiance[0] - LIGHT_RADIANCE).abs() < 1e-5);
    }

    #[test]
    fn test_mirror_path_reaches_the_light() {
        let scene = light_over_mirror();
        let integrator = PathIntegrator::new(1);
        let mut sampler = IndependentSampler::new(7);

        // With q = 0.95 the reflected path either survives (value 10/0.95)
        // or dies (value 0); the average must recover the true radiance.
        let trials = 40_000;
        let mut mean = 0.0f64;
        for _ in 0..trials {
            let ray = Ray3f::new(
                crate::math::constants::Vector3f::new(0.0, 0.0, 1.0),
                crate::math::constants::Vector3f::new(0.0, 0.0, -1.0),
                None,
                None,
            );
            mean += integrator.trace_ray(&scene, &mut sampler, &ray)[0] as f64;
        }
        mean /= trials as f64;
        assert!((mean - LIGHT_RADIANCE as f64).abs() < 0.05 * LIGHT_RADIANCE as f64,
                "mean {} vs expected {}", mean, LIGHT_RADIANCE);
    }

    #[test]
    fn test_russian_roulette_preserves_expectation() {
        // E[continue ? X / q : 0] == X for a deterministic X.
        let q = 0.6f64;
        let x = 2.5f64;
        let mut rng = IndependentSampler::new(99);

        let trials = 100_000;
        let mut mean = 0.0f64;
        for _ in 0..trials {
            if (rng.next_1d() as f64) <= q {
                mean += x / q;
            }
        }
        mean /= trials as f64;
        assert!((mean - x).abs() < 0.02 * x, "mean {} vs expected {}", mean, x);
    }
}
