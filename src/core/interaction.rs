// Copyright @yucwang 2023

use crate::core::bsdf::BSDF;
use crate::math::constants::{Float, Vector2f, Vector3f};
use std::sync::Arc;

/// Result of a ray query: hit point, parametric distance, shading and
/// geometric normals, texture coordinates, and back-references to the hit
/// surface. Read-only to the integrators.
pub struct SurfaceIntersection {
    p: Vector3f,
    geo_normal: Vector3f,
    sh_normal: Vector3f,
    uv: Vector2f,
    t: Float,
    material: Option<Arc<dyn BSDF>>,
    object_index: Option<usize>,
    emitter_index: Option<usize>,
}

pub struct SurfaceSampleRecord {
    intersection: SurfaceIntersection,
    pdf: Float,
}

impl SurfaceIntersection {
    pub fn new(p: Vector3f,
               geo_normal: Vector3f,
               sh_normal: Vector3f,
               uv: Vector2f,
               t: Float) -> Self {
        Self { p, geo_normal, sh_normal, uv, t,
               material: None, object_index: None, emitter_index: None }
    }

    pub fn t(&self) -> Float {
        self.t
    }

    pub fn p(&self) -> Vector3f {
        self.p
    }

    pub fn uv(&self) -> Vector2f {
        self.uv
    }

    pub fn geo_normal(&self) -> Vector3f {
        self.geo_normal
    }

    pub fn sh_normal(&self) -> Vector3f {
        self.sh_normal
    }

    pub fn material(&self) -> Option<&dyn BSDF> {
        self.material.as_deref()
    }

    pub fn object_index(&self) -> Option<usize> {
        self.object_index
    }

    pub fn emitter_index(&self) -> Option<usize> {
        self.emitter_index
    }

    pub fn is_emitter(&self) -> bool {
        self.emitter_index.is_some()
    }

    pub fn with_material(mut self, material: Arc<dyn BSDF>) -> Self {
        self.material = Some(material);
        self
    }

    pub fn with_object_index(mut self, object_index: Option<usize>) -> Self {
        self.object_index = object_index;
        self
    }

    pub fn with_emitter_index(mut self, emitter_index: Option<usize>) -> Self {
        self.emitter_index = emitter_index;
        self
    }
}

impl SurfaceSampleRecord {
    pub fn new(intersection: SurfaceIntersection, pdf: Float) -> Self {
        Self { intersection, pdf }
    }

    pub fn intersection(&self) -> &SurfaceIntersection {
        &self.intersection
    }

    pub fn pdf(&self) -> Float {
        self.pdf
    }
}
