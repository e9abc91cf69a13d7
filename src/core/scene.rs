// Copyright @yucwang 2026

use crate::core::bsdf::BSDF;
use crate::core::emitter::{Emitter, EmitterQueryRecord};
use crate::core::error::{RenderError, RenderResult};
use crate::core::interaction::SurfaceIntersection;
use crate::core::shape::Shape;
use crate::emitters::area::AreaEmitter;
use crate::math::constants::{Float, Vector3f};
use crate::math::ray::Ray3f;
use crate::math::spectrum::{RGBSpectrum, Spectrum};
use std::collections::HashMap;
use std::sync::Arc;

pub struct SceneObject {
    pub shape: Arc<dyn Shape>,
    pub material: Arc<dyn BSDF>,
    pub emission: RGBSpectrum,
    pub name: Option<String>,
}

impl SceneObject {
    pub fn new(shape: Arc<dyn Shape>, material: Arc<dyn BSDF>) -> Self {
        Self { shape, material, emission: RGBSpectrum::default(), name: None }
    }

    pub fn with_emission(shape: Arc<dyn Shape>, material: Arc<dyn BSDF>, emission: RGBSpectrum) -> Self {
        Self { shape, material, emission, name: None }
    }

    pub fn with_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }
}

pub struct Scene {
    objects: Vec<SceneObject>,
    emitters: Vec<Arc<dyn Emitter>>,
    emitter_of_object: HashMap<usize, usize>,
    background: RGBSpectrum,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            emitters: Vec::new(),
            emitter_of_object: HashMap::new(),
            background: RGBSpectrum::default(),
        }
    }

    pub fn add_object(&mut self, object: SceneObject) {
        let object_index = self.objects.len();
        if !object.emission.is_black() {
            let emitter = AreaEmitter::from_shape(object.shape.clone(), object.emission);
            self.emitter_of_object.insert(object_index, self.emitters.len());
            self.emitters.push(Arc::new(emitter));
        }
        self.objects.push(object);
    }

    pub fn set_background(&mut self, background: RGBSpectrum) {
        self.background = background;
    }

    /// Radiance carried by rays that leave the scene.
    pub fn background(&self, _ray: &Ray3f) -> RGBSpectrum {
        self.background
    }

    pub fn objects(&self) -> &Vec<SceneObject> {
        &self.objects
    }

    pub fn emitters(&self) -> &Vec<Arc<dyn Emitter>> {
        &self.emitters
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Setup-time validation. An emitter whose shape has no positive area
    /// can never be sampled and is a configuration error.
    pub fn validate(&self) -> RenderResult<()> {
        for (&object_index, _) in &self.emitter_of_object {
            let object = &self.objects[object_index];
            if object.shape.surface_area() <= 0.0 {
                let name = object.name.clone().unwrap_or_else(|| format!("object {}", object_index));
                log::error!("emitter attached to {} has no surface area", name);
                return Err(RenderError::InvalidConfig(
                    format!("emitter attached to {} has no surface area", name),
                ));
            }
        }
        Ok(())
    }

    pub fn ray_intersection(&self, ray: &Ray3f) -> Option<SurfaceIntersection> {
        let mut closest: Option<(usize, SurfaceIntersection)> = None;
        for (index, object) in self.objects.iter().enumerate() {
            if let Some(hit) = object.shape.ray_intersection(ray) {
                let closer = match &closest {
                    Some((_, best)) => hit.t() < best.t(),
                    None => true,
                };
                if closer {
                    closest = Some((index, hit));
                }
            }
        }

        closest.map(|(index, hit)| {
            let object = &self.objects[index];
            hit.with_material(object.material.clone())
                .with_object_index(Some(index))
                .with_emitter_index(self.emitter_of_object.get(&index).copied())
        })
    }

    /// Occlusion query: true if anything lies within the ray segment.
    pub fn ray_intersection_t(&self, ray: &Ray3f) -> bool {
        self.objects.iter().any(|object| object.shape.ray_intersection_t(ray))
    }

    /// Uniformly select an emitter; returns it with the selection density.
    pub fn sample_emitter(&self, u: Float) -> Option<(&dyn Emitter, Float)> {
        if self.emitters.is_empty() {
            return None;
        }

        let emitter_count = self.emitters.len();
        let mut index = (u * emitter_count as Float) as usize;
        if index >= emitter_count {
            index = emitter_count - 1;
        }

        Some((self.emitters[index].as_ref(), 1.0 / emitter_count as Float))
    }

    /// The emitter attached to a surface hit, if any.
    pub fn emitter_at(&self, hit: &SurfaceIntersection) -> Option<&dyn Emitter> {
        hit.emitter_index().map(|index| self.emitters[index].as_ref())
    }

    /// Solid-angle density of producing the direction toward `hit` from
    /// `ref_p` through emitter sampling, selection density included.
    pub fn pdf_emitter_direct(&self, hit: &SurfaceIntersection, ref_p: &Vector3f) -> Float {
        let emitter = match self.emitter_at(hit) {
            Some(emitter) => emitter,
            None => return 0.0,
        };

        let record = EmitterQueryRecord::from_hit(*ref_p, hit.p(), hit.sh_normal(), hit.uv());
        let selection_pdf = 1.0 / self.emitters.len() as Float;
        selection_pdf * emitter.pdf(&record)
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
