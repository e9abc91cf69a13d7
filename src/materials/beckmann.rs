// Copyright @yucwang 2026

use crate::core::bsdf::{BSDF, BSDFQueryRecord, Measure};
use crate::core::computation_node::ComputationNode;
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::spectrum::RGBSpectrum;
use crate::math::warp::{square_to_beckmann, square_to_beckmann_pdf};

fn reflect(wi: &Vector3f, m: &Vector3f) -> Vector3f {
    2.0 * wi.dot(m) * m - wi
}

fn fresnel_schlick(r0: RGBSpectrum, cos_theta: Float) -> RGBSpectrum {
    let c = (1.0 - cos_theta).max(0.0);
    let c5 = c * c * c * c * c;
    r0 + (RGBSpectrum::white() - r0) * c5
}

// Smith shadowing, rational approximation for the Beckmann distribution.
fn smith_beckmann_g1(v: &Vector3f, m: &Vector3f, alpha: Float) -> Float {
    if v.dot(m) * v.z <= 0.0 {
        return 0.0;
    }

    let cos2 = v.z * v.z;
    let tan_theta = ((1.0 - cos2).max(0.0) / cos2.max(1e-8)).sqrt();
    if tan_theta <= 0.0 {
        return 1.0;
    }

    let b = 1.0 / (alpha * tan_theta);
    if b >= 1.6 {
        return 1.0;
    }

    (3.535 * b + 2.181 * b * b) / (1.0 + 2.276 * b + 2.577 * b * b)
}

/// Rough conductor with Beckmann-distributed microfacet normals.
pub struct BeckmannBSDF {
    alpha: Float,
    specular_reflectance: RGBSpectrum,
}

impl BeckmannBSDF {
    pub fn new(alpha: Float, specular_reflectance: RGBSpectrum) -> Self {
        Self { alpha: alpha.max(1e-4), specular_reflectance }
    }
}

impl ComputationNode for BeckmannBSDF {
    fn to_string(&self) -> String {
        format!("BeckmannBSDF [alpha={}]", self.alpha)
    }
}

impl BSDF for BeckmannBSDF {
    fn sample(&self, record: &mut BSDFQueryRecord, u: &Vector2f) -> RGBSpectrum {
        record.measure = Measure::SolidAngle;
        if record.wi.z <= 0.0 {
            return RGBSpectrum::default();
        }

        let m = square_to_beckmann(u, self.alpha);
        if record.wi.dot(&m) <= 0.0 {
            return RGBSpectrum::default();
        }

        record.wo = reflect(&record.wi, &m);
        if record.wo.z <= 0.0 {
            return RGBSpectrum::default();
        }

        let pdf = self.pdf(record);
        if pdf <= 0.0 {
            return RGBSpectrum::default();
        }

        self.eval(record) * (record.wo.z / pdf)
    }

    fn eval(&self, record: &BSDFQueryRecord) -> RGBSpectrum {
        if record.measure != Measure::SolidAngle || record.wi.z <= 0.0 || record.wo.z <= 0.0 {
            return RGBSpectrum::default();
        }

        let mut m = record.wi + record.wo;
        if m.norm_squared() <= 0.0 {
            return RGBSpectrum::default();
        }
        m = m.normalize();
        if m.z <= 0.0 {
            return RGBSpectrum::default();
        }

        // D recovered from the sampling density, which is D * cos(theta_m).
        let d = square_to_beckmann_pdf(&m, self.alpha) / m.z;
        let g = smith_beckmann_g1(&record.wi, &m, self.alpha)
            * smith_beckmann_g1(&record.wo, &m, self.alpha);
        let f = fresnel_schlick(self.specular_reflectance, record.wi.dot(&m).abs());

        f * (d * g / (4.0 * record.wi.z * record.wo.z))
    }

    fn pdf(&self, record: &BSDFQueryRecord) -> Float {
        if record.measure != Measure::SolidAngle || record.wi.z <= 0.0 || record.wo.z <= 0.0 {
            return 0.0;
        }

        let mut m = record.wi + record.wo;
        if m.norm_squared() <= 0.0 {
            return 0.0;
        }
        m = m.normalize();

        let jacobian = 4.0 * record.wo.dot(&m).abs();
        if jacobian <= 1e-6 {
            return 0.0;
        }

        square_to_beckmann_pdf(&m, self.alpha) / jacobian
    }
}
