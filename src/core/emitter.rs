// Copyright @yucwang 2026

use crate::core::computation_node::ComputationNode;
use crate::core::error::{RenderError, RenderResult};
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::spectrum::RGBSpectrum;

/// Bidirectional record of a light interaction. Constructed with a
/// reference point, filled by `sample`, re-queried by `pdf`/`eval`.
/// Once filled, `wi` is the unit vector from the reference point toward
/// the sampled point and `pdf` is a solid-angle density at the reference.
#[derive(Debug, Clone, Copy)]
pub struct EmitterQueryRecord {
    pub ref_p: Vector3f,
    pub p: Vector3f,
    pub n: Vector3f,
    pub wi: Vector3f,
    pub dist: Float,
    pub uv: Vector2f,
    pub pdf: Float,
}

impl EmitterQueryRecord {
    pub fn new(ref_p: Vector3f) -> Self {
        Self {
            ref_p,
            p: Vector3f::zeros(),
            n: Vector3f::zeros(),
            wi: Vector3f::zeros(),
            dist: 0.0,
            uv: Vector2f::zeros(),
            pdf: 0.0,
        }
    }

    /// Record describing an already-known point on the emitter, e.g. a
    /// surface hit found by ray tracing.
    pub fn from_hit(ref_p: Vector3f, p: Vector3f, n: Vector3f, uv: Vector2f) -> Self {
        let to_p = p - ref_p;
        let dist = to_p.norm();
        let wi = if dist > 0.0 { to_p / dist } else { Vector3f::zeros() };
        Self { ref_p, p, n, wi, dist, uv, pdf: 0.0 }
    }
}

pub trait Emitter: ComputationNode + Send + Sync {
    /// Sample a point on the emitter toward `record.ref_p`, filling the
    /// record and returning the emitted radiance along `-wi`.
    fn sample(&self, record: &mut EmitterQueryRecord, u: &Vector2f) -> RGBSpectrum;

    /// Emitted radiance for a fully described record. Visibility is not
    /// considered.
    fn eval(&self, record: &EmitterQueryRecord) -> RGBSpectrum;

    /// Solid-angle density at `record.ref_p` of sampling `record.p`.
    fn pdf(&self, record: &EmitterQueryRecord) -> Float;

    /// Sample a point on the emitter with its area density, independent of
    /// any reference point. Used by light-tracing walks.
    fn sample_position(&self, record: &mut EmitterQueryRecord, u: &Vector2f) -> RGBSpectrum;

    /// Sample an outgoing direction from an already-sampled position,
    /// filling `direction_record.wi` (world space) and its density.
    fn sample_direction(
        &self,
        _position_record: &EmitterQueryRecord,
        _direction_record: &mut EmitterQueryRecord,
        _u: &Vector2f,
    ) -> RenderResult<RGBSpectrum> {
        Err(RenderError::NotImplemented("Emitter::sample_direction"))
    }
}
