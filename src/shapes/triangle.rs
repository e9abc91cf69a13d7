// Copyright @yucwang 2023

use crate::core::computation_node::ComputationNode;
use crate::core::interaction::{SurfaceIntersection, SurfaceSampleRecord};
use crate::core::shape::Shape;
use crate::math::constants::{EPSILON, Float, Vector2f, Vector3f};
use crate::math::ray::Ray3f;
use crate::math::warp::square_to_uniform_triangle;

pub struct Triangle {
    p0: Vector3f,
    p1: Vector3f,
    p2: Vector3f,
}

impl Triangle {
    pub fn new(p0: Vector3f, p1: Vector3f, p2: Vector3f) -> Self {
        Triangle { p0, p1, p2 }
    }

    pub fn geometric_normal(&self) -> Vector3f {
        (self.p1 - self.p0).cross(&(self.p2 - self.p0)).normalize()
    }

    fn contains(&self, p: &Vector3f) -> bool {
        let geo_normal = (self.p1 - self.p0).cross(&(self.p2 - self.p0));

        let n0 = (self.p1 - self.p0).cross(&(p - self.p0));
        let n1 = (self.p2 - self.p1).cross(&(p - self.p1));
        let n2 = (self.p0 - self.p2).cross(&(p - self.p2));

        n0.dot(&geo_normal) >= 0.0 && n1.dot(&geo_normal) >= 0.0 && n2.dot(&geo_normal) >= 0.0
    }

    fn plane_hit(&self, ray: &Ray3f) -> Option<Float> {
        let geo_normal = self.geometric_normal();
        let n_dot_dir = geo_normal.dot(&ray.dir());
        if n_dot_dir.abs() < EPSILON {
            return None;
        }

        let plane_d = geo_normal.dot(&self.p0);
        let t = (plane_d - geo_normal.dot(&ray.origin())) / n_dot_dir;
        if !ray.test_segment(t) {
            return None;
        }

        Some(t)
    }
}

impl ComputationNode for Triangle {
    fn to_string(&self) -> String {
        String::from("Triangle")
    }
}

impl Shape for Triangle {
    fn ray_intersection(&self, ray: &Ray3f) -> Option<SurfaceIntersection> {
        let t = self.plane_hit(ray)?;
        let p = ray.at(t);
        if !self.contains(&p) {
            return None;
        }

        let n = self.geometric_normal();
        // Barycentric coordinates double as texture coordinates.
        let area2 = (self.p1 - self.p0).cross(&(self.p2 - self.p0)).norm();
        let v = (self.p0 - p).cross(&(self.p2 - p)).norm() / area2;
        let w = (self.p0 - p).cross(&(self.p1 - p)).norm() / area2;
        Some(SurfaceIntersection::new(p, n, n, Vector2f::new(v, w), t))
    }

    fn ray_intersection_t(&self, ray: &Ray3f) -> bool {
        match self.plane_hit(ray) {
            Some(t) => self.contains(&ray.at(t)),
            None => false,
        }
    }

    fn sample_position(&self, u: &Vector2f) -> SurfaceSampleRecord {
        let uv = square_to_uniform_triangle(u);
        let p = self.p0 * (1.0 - uv.x - uv.y) + self.p1 * uv.x + self.p2 * uv.y;
        let n = self.geometric_normal();

        let intersection = SurfaceIntersection::new(p, n, n, uv, 0.0);
        SurfaceSampleRecord::new(intersection, 1.0 / self.surface_area())
    }

    fn pdf_position(&self, _p: &Vector3f) -> Float {
        1.0 / self.surface_area()
    }

    fn surface_area(&self) -> Float {
        0.5 * (self.p1 - self.p0).cross(&(self.p2 - self.p0)).norm()
    }
}
