// Copyright @yucwang 2026

use crate::core::computation_node::ComputationNode;
use crate::core::integrator::Integrator;
use crate::core::sampler::Sampler;
use crate::core::scene::Scene;
use crate::integrators::{emitter_hit_radiance, sample_direct_light};
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

/// Single-bounce direct illumination by emitter sampling: pick a light,
/// sample a point on it, shade through a shadow ray.
pub struct DirectEmitterSampling {
    samples_per_pixel: u32,
}

impl DirectEmitterSampling {
    pub fn new(samples_per_pixel: u32) -> Self {
        Self { samples_per_pixel }
    }
}

impl ComputationNode for DirectEmitterSampling {
    fn to_string(&self) -> String {
        String::from("DirectEmitterSampling")
    }
}

impl Integrator for DirectEmitterSampling {
    fn trace_ray(&self, scene: &Scene, sampler: &mut dyn Sampler, ray: &Ray3f) -> RGBSpectrum {
        let hit = match scene.ray_intersection(ray) {
            Some(hit) => hit,
            None => return scene.background(ray),
        };

        // A ray that lands on an emitter needs no further work.
        if let Some(radiance) = emitter_hit_radiance(scene, ray, &hit) {
            return radiance;
        }

        let mut lo = RGBSpectrum::default();
        if let Some(light) = sample_direct_light(scene, sampler, ray, &hit) {
            lo += light.contribution;
        }

        lo
    }

    fn samples_per_pixel(&self) -> u32 {
        self.samples_per_pixel
    }
}
