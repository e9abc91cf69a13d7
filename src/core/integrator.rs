// Copyright @yucwang 2026

use crate::core::computation_node::ComputationNode;
use crate::core::error::RenderResult;
use crate::core::sampler::Sampler;
use crate::core::scene::Scene;
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

pub trait Integrator: ComputationNode + Send + Sync {
    /// One-time setup before any render-phase work. Runs to completion on a
    /// single thread; results must be immutable afterwards.
    fn preprocess(&mut self, _scene: &Scene, _sampler: &mut dyn Sampler) -> RenderResult<()> {
        Ok(())
    }

    /// Estimate the radiance arriving along `ray`. Pure with respect to the
    /// scene and the (post-preprocess) integrator state; each caller owns
    /// its private sampler stream.
    fn trace_ray(&self, scene: &Scene, sampler: &mut dyn Sampler, ray: &Ray3f) -> RGBSpectrum;

    fn samples_per_pixel(&self) -> u32;
}
