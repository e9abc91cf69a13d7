// Copyright @yucwang 2026

use crate::core::computation_node::ComputationNode;
use crate::core::emitter::{Emitter, EmitterQueryRecord};
use crate::core::error::RenderResult;
use crate::core::shape::Shape;
use crate::core::tangent_frame::{build_tangent_frame, local_to_world};
use crate::math::constants::{Float, Vector2f};
use crate::math::spectrum::RGBSpectrum;
use crate::math::warp::{square_to_cosine_hemisphere, square_to_cosine_hemisphere_pdf};
use std::sync::Arc;

/// One-sided area light attached to a shape. Emits only into the
/// hemisphere the surface normal points into.
pub struct AreaEmitter {
    shape: Arc<dyn Shape>,
    radiance: RGBSpectrum,
}

impl AreaEmitter {
    pub fn from_shape(shape: Arc<dyn Shape>, radiance: RGBSpectrum) -> Self {
        Self { shape, radiance }
    }
}

impl ComputationNode for AreaEmitter {
    fn to_string(&self) -> String {
        String::from("AreaEmitter")
    }
}

impl Emitter for AreaEmitter {
    fn eval(&self, record: &EmitterQueryRecord) -> RGBSpectrum {
        // The reference point must lie on the emitting side.
        if record.n.dot(&record.wi) < 0.0 {
            self.radiance
        } else {
            RGBSpectrum::default()
        }
    }

    fn sample(&self, record: &mut EmitterQueryRecord, u: &Vector2f) -> RGBSpectrum {
        let position = self.shape.sample_position(u);
        let intersection = position.intersection();
        record.p = intersection.p();
        record.n = intersection.sh_normal();
        record.uv = intersection.uv();

        let to_p = record.p - record.ref_p;
        record.dist = to_p.norm();
        if record.dist <= 0.0 {
            record.pdf = 0.0;
            return RGBSpectrum::default();
        }
        record.wi = to_p / record.dist;
        record.pdf = self.pdf(record);

        self.eval(record)
    }

    // p_omega(x, x_l) = p_area(x_l) * ||x - x_l||^2 / |n_l . w_i|
    fn pdf(&self, record: &EmitterQueryRecord) -> Float {
        let cos_light = record.n.dot(&record.wi).abs();
        if cos_light <= 1e-6 || record.dist <= 0.0 {
            return 0.0;
        }

        let area_pdf = self.shape.pdf_position(&record.p);
        area_pdf * record.dist * record.dist / cos_light
    }

    fn sample_position(&self, record: &mut EmitterQueryRecord, u: &Vector2f) -> RGBSpectrum {
        let position = self.shape.sample_position(u);
        let intersection = position.intersection();
        record.p = intersection.p();
        record.n = intersection.sh_normal();
        record.uv = intersection.uv();
        record.pdf = position.pdf();

        self.radiance
    }

    fn sample_direction(
        &self,
        position_record: &EmitterQueryRecord,
        direction_record: &mut EmitterQueryRecord,
        u: &Vector2f,
    ) -> RenderResult<RGBSpectrum> {
        let local = square_to_cosine_hemisphere(u);
        let (tangent, bitangent) = build_tangent_frame(&position_record.n);

        direction_record.ref_p = position_record.p;
        direction_record.wi = local_to_world(&local, &tangent, &bitangent, &position_record.n);
        direction_record.pdf = square_to_cosine_hemisphere_pdf(&local);

        Ok(RGBSpectrum::white())
    }
}
