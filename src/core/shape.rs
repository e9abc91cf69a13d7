// Copyright @yucwang 2023

use crate::core::computation_node::ComputationNode;
use crate::core::interaction::{SurfaceIntersection, SurfaceSampleRecord};
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::ray::Ray3f;

pub trait Shape: ComputationNode + Send + Sync {
    fn ray_intersection(&self, ray: &Ray3f) -> Option<SurfaceIntersection>;
    fn ray_intersection_t(&self, ray: &Ray3f) -> bool;
    /// Uniform position sample with its area density.
    fn sample_position(&self, u: &Vector2f) -> SurfaceSampleRecord;
    /// Area density of `p`, assuming it lies on the surface.
    fn pdf_position(&self, p: &Vector3f) -> Float;
    fn surface_area(&self) -> Float;
}
