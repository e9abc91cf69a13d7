// Copyright @yucwang 2026

use crate::core::bsdf::{BSDF, BSDFQueryRecord, Measure};
use crate::core::computation_node::ComputationNode;
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::spectrum::RGBSpectrum;

/// Ideal specular reflector. Samples are discrete (Dirac), so `eval` and
/// `pdf` both vanish; light sampling can never produce its direction.
pub struct MirrorBSDF;

impl MirrorBSDF {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MirrorBSDF {
    fn default() -> Self {
        Self::new()
    }
}

impl ComputationNode for MirrorBSDF {
    fn to_string(&self) -> String {
        String::from("MirrorBSDF")
    }
}

impl BSDF for MirrorBSDF {
    fn sample(&self, record: &mut BSDFQueryRecord, _u: &Vector2f) -> RGBSpectrum {
        record.measure = Measure::Discrete;
        if record.wi.z <= 0.0 {
            return RGBSpectrum::default();
        }

        record.wo = Vector3f::new(-record.wi.x, -record.wi.y, record.wi.z);
        RGBSpectrum::white()
    }

    fn eval(&self, _record: &BSDFQueryRecord) -> RGBSpectrum {
        RGBSpectrum::default()
    }

    fn pdf(&self, _record: &BSDFQueryRecord) -> Float {
        0.0
    }

    fn is_discrete(&self) -> bool {
        true
    }
}
