// Copyright @yucwang 2026

use crate::core::bsdf::{BSDFQueryRecord, Measure};
use crate::core::computation_node::ComputationNode;
use crate::core::integrator::Integrator;
use crate::core::sampler::Sampler;
use crate::core::scene::Scene;
use crate::core::tangent_frame::{build_tangent_frame, local_to_world, world_to_local};
use crate::integrators::{balance_heuristic, emitter_hit_radiance, sample_direct_light, spawn_ray};
use crate::math::constants::{Float, Vector3f};
use crate::math::ray::Ray3f;
use crate::math::spectrum::{RGBSpectrum, Spectrum};

// Roulette starts once a few bounces are in; survival follows the
// throughput luminance, clamped so dim-but-alive paths never stall.
const ROULETTE_START_DEPTH: u32 = 3;
const MIN_SURVIVAL: Float = 0.05;
const MAX_SURVIVAL: Float = 0.99;

/// Full path tracer combining next-event estimation and material sampling
/// with balance-heuristic weights at every vertex.
pub struct PathMisIntegrator {
    samples_per_pixel: u32,
}

impl PathMisIntegrator {
    pub fn new(samples_per_pixel: u32) -> Self {
        Self { samples_per_pixel }
    }
}

impl ComputationNode for PathMisIntegrator {
    fn to_string(&self) -> String {
        String::from("PathMisIntegrator")
    }
}

impl Integrator for PathMisIntegrator {
    fn trace_ray(&self, scene: &Scene, sampler: &mut dyn Sampler, ray: &Ray3f) -> RGBSpectrum {
        let mut lo = RGBSpectrum::default();
        let mut throughput = RGBSpectrum::white();
        let mut current = Ray3f::new(ray.origin(), ray.dir(), Some(ray.min_t), Some(ray.max_t));
        let mut depth = 0u32;

        // State of the previous bounce, for weighting emitter hits.
        let mut prev_discrete = true;
        let mut prev_pdf: Float = 0.0;
        let mut prev_p: Vector3f = ray.origin();

        loop {
            let hit = match scene.ray_intersection(&current) {
                Some(hit) => hit,
                None => {
                    // Only material sampling reaches the background.
                    lo += scene.background(&current) * throughput;
                    break;
                }
            };

            if let Some(radiance) = emitter_hit_radiance(scene, &current, &hit) {
                let weight = if prev_discrete {
                    1.0
                } else {
                    let pdf_emitter = scene.pdf_emitter_direct(&hit, &prev_p);
                    balance_heuristic(prev_pdf, pdf_emitter)
                };
                lo += radiance * throughput * weight;
                break;
            }

            let material = match hit.material() {
                Some(material) => material,
                None => break,
            };

            if !material.is_discrete() {
                if let Some(light) = sample_direct_light(scene, sampler, &current, &hit) {
                    let weight = balance_heuristic(light.pdf_light, light.pdf_bsdf);
                    lo += light.contribution * throughput * weight;
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

            let next_throughput = throughput * fr;
            depth += 1;
            if depth >= ROULETTE_START_DEPTH {
                let survival = next_throughput
                    .luminance()
                    .clamp(MIN_SURVIVAL, MAX_SURVIVAL);
                if sampler.next_1d() > survival {
                    break;
                }
                throughput = next_throughput / survival;
            } else {
                throughput = next_throughput;
            }

            prev_discrete = bsdf_record.measure == Measure::Discrete;
            prev_pdf = material.pdf(&bsdf_record);
            prev_p = hit.p();

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
    use crate::core::sampler::IndependentSampler;
    use crate::integrators::test_scenes::*;

    #[test]
    fn test_direct_hit_on_emitter_returns_its_radiance() {
        let scene = light_over_floor();
        let integrator = PathMisIntegrator::new(1);
        let mut sampler = IndependentSampler::new(3);

        let radiance = integrator.trace_ray(&scene, &mut sampler, &ray_at_light());
        assert!((radiance[0] - LIGHT_RADIANCE).abs() < 1e-5);
    }

    #[test]
    fn test_discrete_bounce_keeps_full_weight() {
        let scene = light_over_mirror();
        let integrator = PathMisIntegrator::new(1);
        let mut sampler = IndependentSampler::new(5);

        // One mirror bounce below the roulette start depth: exact result.
        let ray = Ray3f::new(Vector3f::new(0.0, 0.0, 1.0), Vector3f::new(0.0, 0.0, -1.0), None, None);
        let radiance = integrator.trace_ray(&scene, &mut sampler, &ray);
        assert!((radiance[0] - LIGHT_RADIANCE).abs() < 1e-4);
    }

    #[test]
    fn test_estimate_matches_analytic_value_on_open_scene() {
        let scene = light_over_floor();
        let integrator = PathMisIntegrator::new(1);
        let mut sampler = IndependentSampler::new(41);

        let sample_count = 2048;
        let mut mean = 0.0f64;
        for _ in 0..sample_count {
            mean += integrator.trace_ray(&scene, &mut sampler, &ray_at_floor())[0] as f64;
        }
        mean /= sample_count as f64;

        let expected = analytic_floor_radiance() as f64;
        assert!((mean - expected).abs() < 0.05 * expected,
                "mean {} vs expected {}", mean, expected);
    }
}
