// Copyright @yucwang 2023

use crate::core::bsdf::{BSDF, BSDFQueryRecord, Measure};
use crate::core::computation_node::ComputationNode;
use crate::math::constants::{Float, INV_PI, Vector2f};
use crate::math::spectrum::RGBSpectrum;
use crate::math::warp::{square_to_cosine_hemisphere, square_to_cosine_hemisphere_pdf};

pub struct LambertianDiffuseBSDF {
    albedo: RGBSpectrum,
}

impl LambertianDiffuseBSDF {
    pub fn new(albedo: RGBSpectrum) -> Self {
        Self { albedo }
    }
}

impl ComputationNode for LambertianDiffuseBSDF {
    fn to_string(&self) -> String {
        String::from("LambertianDiffuseBSDF")
    }
}

impl BSDF for LambertianDiffuseBSDF {
    fn sample(&self, record: &mut BSDFQueryRecord, u: &Vector2f) -> RGBSpectrum {
        record.measure = Measure::SolidAngle;
        if record.wi.z <= 0.0 {
            return RGBSpectrum::default();
        }

        record.wo = square_to_cosine_hemisphere(u);

        // f * cos / pdf collapses to the albedo for a cosine-sampled lobe.
        self.albedo
    }

    fn eval(&self, record: &BSDFQueryRecord) -> RGBSpectrum {
        if record.measure != Measure::SolidAngle || record.wi.z <= 0.0 || record.wo.z <= 0.0 {
            return RGBSpectrum::default();
        }

        self.albedo * INV_PI
    }

    fn pdf(&self, record: &BSDFQueryRecord) -> Float {
        if record.measure != Measure::SolidAngle || record.wi.z <= 0.0 || record.wo.z <= 0.0 {
            return 0.0;
        }

        square_to_cosine_hemisphere_pdf(&record.wo)
    }
}
