// Copyright @yucwang 2023

use crate::core::computation_node::ComputationNode;
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::spectrum::RGBSpectrum;

/// Measure attached to a sampled scattering direction. Discrete samples
/// carry a Dirac weight instead of a solid-angle density; integrators must
/// branch on this when combining with light sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    Unknown,
    SolidAngle,
    Discrete,
}

/// Scattering query. Both directions live in the local shading frame
/// (z up), point away from the surface, and are unit length.
#[derive(Debug, Clone, Copy)]
pub struct BSDFQueryRecord {
    pub wi: Vector3f,
    pub wo: Vector3f,
    pub uv: Vector2f,
    pub measure: Measure,
}

impl BSDFQueryRecord {
    pub fn new(wi: Vector3f, uv: Vector2f) -> Self {
        Self {
            wi,
            wo: Vector3f::zeros(),
            uv,
            measure: Measure::Unknown,
        }
    }

    pub fn with_directions(wi: Vector3f, wo: Vector3f, uv: Vector2f, measure: Measure) -> Self {
        Self { wi, wo, uv, measure }
    }
}

pub trait BSDF: ComputationNode + Send + Sync {
    /// Importance-sample an outgoing direction into `record.wo` and return
    /// the throughput weight, already divided by the sampling density.
    /// A black return value means the sample was absorbed.
    fn sample(&self, record: &mut BSDFQueryRecord, u: &Vector2f) -> RGBSpectrum;

    fn eval(&self, record: &BSDFQueryRecord) -> RGBSpectrum;

    /// Solid-angle density of `record.wo`; 0 for discrete lobes.
    fn pdf(&self, record: &BSDFQueryRecord) -> Float;

    fn is_discrete(&self) -> bool {
        false
    }
}
