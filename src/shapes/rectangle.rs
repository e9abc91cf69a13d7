// Copyright @yucwang 2026

use crate::core::computation_node::ComputationNode;
use crate::core::interaction::{SurfaceIntersection, SurfaceSampleRecord};
use crate::core::shape::Shape;
use crate::math::constants::{EPSILON, Float, Vector2f, Vector3f};
use crate::math::ray::Ray3f;

/// Parallelogram spanned by two edge vectors; the geometric normal is
/// `edge0 x edge1`, normalized.
pub struct Rectangle {
    origin: Vector3f,
    edge0: Vector3f,
    edge1: Vector3f,
    normal: Vector3f,
    area: Float,
    inv_area: Float,
}

impl Rectangle {
    pub fn new(origin: Vector3f, edge0: Vector3f, edge1: Vector3f) -> Self {
        let cross = edge0.cross(&edge1);
        let area = cross.norm();
        let normal = if area > 0.0 { cross / area } else { Vector3f::new(0.0, 0.0, 1.0) };
        let inv_area = if area > 0.0 { 1.0 / area } else { 0.0 };

        Self { origin, edge0, edge1, normal, area, inv_area }
    }

    fn intersect_plane(&self, ray: &Ray3f) -> Option<(Float, Vector2f)> {
        let denom = self.normal.dot(&ray.dir());
        if denom.abs() < EPSILON {
            return None;
        }

        let t = self.normal.dot(&(self.origin - ray.origin())) / denom;
        if !ray.test_segment(t) {
            return None;
        }

        let rel = ray.at(t) - self.origin;
        let a = rel.dot(&self.edge0) / self.edge0.norm_squared();
        let b = rel.dot(&self.edge1) / self.edge1.norm_squared();
        if !(0.0..=1.0).contains(&a) || !(0.0..=1.0).contains(&b) {
            return None;
        }

        Some((t, Vector2f::new(a, b)))
    }
}

impl ComputationNode for Rectangle {
    fn to_string(&self) -> String {
        String::from("Rectangle")
    }
}

impl Shape for Rectangle {
    fn ray_intersection(&self, ray: &Ray3f) -> Option<SurfaceIntersection> {
        let (t, uv) = self.intersect_plane(ray)?;
        Some(SurfaceIntersection::new(ray.at(t), self.normal, self.normal, uv, t))
    }

    fn ray_intersection_t(&self, ray: &Ray3f) -> bool {
        self.intersect_plane(ray).is_some()
    }

    fn sample_position(&self, u: &Vector2f) -> SurfaceSampleRecord {
        let p = self.origin + self.edge0 * u.x + self.edge1 * u.y;
        let intersection = SurfaceIntersection::new(p, self.normal, self.normal, *u, 0.0);
        SurfaceSampleRecord::new(intersection, self.inv_area)
    }

    fn pdf_position(&self, _p: &Vector3f) -> Float {
        self.inv_area
    }

    fn surface_area(&self) -> Float {
        self.area
    }
}
