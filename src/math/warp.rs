// Copyright @yucwang 2023

use super::constants::{Float, INV_FOUR_PI, INV_PI, INV_TWO_PI, PI, Vector2f, Vector3f};

pub fn square_to_uniform_square(u: &Vector2f) -> Vector2f {
    *u
}

pub fn square_to_uniform_square_pdf(p: &Vector2f) -> Float {
    if p.x >= 0.0 && p.x <= 1.0 && p.y >= 0.0 && p.y <= 1.0 {
        1.0
    } else {
        0.0
    }
}

// Inverse CDF of the 1D tent on [-1, 1].
fn tent_inverse(u: Float) -> Float {
    if u < 0.5 {
        (2.0 * u).sqrt() - 1.0
    } else {
        1.0 - (2.0 - 2.0 * u).sqrt()
    }
}

fn tent_pdf_1d(x: Float) -> Float {
    if x.abs() <= 1.0 {
        1.0 - x.abs()
    } else {
        0.0
    }
}

pub fn square_to_tent(u: &Vector2f) -> Vector2f {
    Vector2f::new(tent_inverse(u.x), tent_inverse(u.y))
}

pub fn square_to_tent_pdf(p: &Vector2f) -> Float {
    tent_pdf_1d(p.x) * tent_pdf_1d(p.y)
}

pub fn square_to_uniform_disk(u: &Vector2f) -> Vector2f {
    let r = u.x.sqrt();
    let theta = 2.0 * PI * u.y;

    Vector2f::new(r * theta.cos(), r * theta.sin())
}

pub fn square_to_uniform_disk_pdf(p: &Vector2f) -> Float {
    if p.norm() <= 1.0 {
        INV_PI
    } else {
        0.0
    }
}

// Fold samples above the diagonal back into the unit right triangle.
pub fn square_to_uniform_triangle(u: &Vector2f) -> Vector2f {
    if u.x + u.y <= 1.0 {
        *u
    } else {
        Vector2f::new(1.0 - u.x, 1.0 - u.y)
    }
}

pub fn square_to_uniform_triangle_pdf(p: &Vector2f) -> Float {
    if p.x >= 0.0 && p.y >= 0.0 && p.x + p.y <= 1.0 {
        2.0
    } else {
        0.0
    }
}

pub fn square_to_uniform_sphere(u: &Vector2f) -> Vector3f {
    let phi = 2.0 * PI * u.x;
    let theta = (1.0 - 2.0 * u.y).acos();

    let sin_theta = theta.sin();
    Vector3f::new(sin_theta * phi.cos(), sin_theta * phi.sin(), theta.cos())
}

pub fn square_to_uniform_sphere_pdf(_v: &Vector3f) -> Float {
    INV_FOUR_PI
}

pub fn square_to_uniform_hemisphere(u: &Vector2f) -> Vector3f {
    let phi = 2.0 * PI * u.x;
    let theta = (1.0 - u.y).acos();

    let sin_theta = theta.sin();
    Vector3f::new(sin_theta * phi.cos(), sin_theta * phi.sin(), theta.cos())
}

pub fn square_to_uniform_hemisphere_pdf(v: &Vector3f) -> Float {
    if v.z >= 0.0 {
        INV_TWO_PI
    } else {
        0.0
    }
}

// Malley's method: uniform disk sample lifted onto the hemisphere.
pub fn square_to_cosine_hemisphere(u: &Vector2f) -> Vector3f {
    let phi = 2.0 * PI * u.y;
    let r = u.x.sqrt();

    Vector3f::new(r * phi.cos(), r * phi.sin(), (1.0 - u.x).sqrt())
}

pub fn square_to_cosine_hemisphere_pdf(v: &Vector3f) -> Float {
    if v.z < 0.0 || v.z > 1.0 {
        0.0
    } else {
        v.z * INV_PI
    }
}

pub fn square_to_beckmann(u: &Vector2f, alpha: Float) -> Vector3f {
    let phi = 2.0 * PI * u.y;
    // Keep the logarithm finite so grazing normals stay above the horizon.
    let theta = (-(alpha * alpha) * u.x.max(Float::MIN_POSITIVE).ln()).sqrt().atan();

    let sin_theta = theta.sin();
    Vector3f::new(sin_theta * phi.cos(), sin_theta * phi.sin(), theta.cos())
}

// Normalized Beckmann distribution times the cosine of the sampled normal.
pub fn square_to_beckmann_pdf(m: &Vector3f, alpha: Float) -> Float {
    let cos_theta = m.z;
    if cos_theta <= 0.0 {
        return 0.0;
    }

    let cos2_theta = cos_theta * cos_theta;
    let sin2_theta = (1.0 - cos2_theta).max(0.0);
    let tan2_theta = sin2_theta / cos2_theta;
    if tan2_theta.is_infinite() {
        return 0.0;
    }

    let alpha2 = alpha * alpha;
    let cos4_theta = cos2_theta * cos2_theta;
    let d = (-tan2_theta / alpha2).exp() / (PI * alpha2 * cos4_theta);

    d * cos_theta
}

/* Tests for the warp/pdf pairs */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sampler::{IndependentSampler, Sampler};

    const SAMPLE_COUNT: usize = 100_000;

    fn sampler() -> IndependentSampler {
        IndependentSampler::new(42)
    }

    #[test]
    fn test_uniform_square_pdf_values() {
        assert_eq!(square_to_uniform_square_pdf(&Vector2f::new(0.5, 0.5)), 1.0);
        assert_eq!(square_to_uniform_square_pdf(&Vector2f::new(0.0, 1.0)), 1.0);
        assert_eq!(square_to_uniform_square_pdf(&Vector2f::new(1.2, 0.5)), 0.0);
        assert_eq!(square_to_uniform_square_pdf(&Vector2f::new(0.5, -0.1)), 0.0);
    }

    #[test]
    fn test_tent_domain_and_density() {
        let mut rng = sampler();
        let mut mean_abs_x = 0.0;
        for _ in 0..SAMPLE_COUNT {
            let p = square_to_tent(&rng.next_2d());
            assert!(p.x.abs() <= 1.0 && p.y.abs() <= 1.0);
            assert!(square_to_tent_pdf(&p) > 0.0 || p.x.abs() == 1.0 || p.y.abs() == 1.0);
            mean_abs_x += p.x.abs() as f64;
        }
        mean_abs_x /= SAMPLE_COUNT as f64;
        // E[|x|] of the tent is 1/3.
        assert!((mean_abs_x - 1.0 / 3.0).abs() < 0.01);

        assert_eq!(square_to_tent_pdf(&Vector2f::new(0.0, 0.0)), 1.0);
        assert_eq!(square_to_tent_pdf(&Vector2f::new(1.5, 0.0)), 0.0);
        assert!((square_to_tent_pdf(&Vector2f::new(0.5, 0.0)) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_uniform_disk_domain_and_density() {
        let mut rng = sampler();
        let mut quadrant = [0usize; 4];
        let mut inner = 0usize;
        for _ in 0..SAMPLE_COUNT {
            let p = square_to_uniform_disk(&rng.next_2d());
            assert!(p.norm() <= 1.0 + 1e-6);
            let q = (p.x >= 0.0) as usize + 2 * ((p.y >= 0.0) as usize);
            quadrant[q] += 1;
            if p.norm_squared() <= 0.5 {
                inner += 1;
            }
        }
        for count in quadrant {
            let fraction = count as f64 / SAMPLE_COUNT as f64;
            assert!((fraction - 0.25).abs() < 0.01);
        }
        // Half of the disk area lies inside r = sqrt(0.5).
        let inner_fraction = inner as f64 / SAMPLE_COUNT as f64;
        assert!((inner_fraction - 0.5).abs() < 0.01);

        assert!((square_to_uniform_disk_pdf(&Vector2f::new(0.3, 0.3)) - INV_PI).abs() < 1e-6);
        assert_eq!(square_to_uniform_disk_pdf(&Vector2f::new(1.2, 0.0)), 0.0);
    }

    #[test]
    fn test_uniform_triangle_domain() {
        let mut rng = sampler();
        for _ in 0..SAMPLE_COUNT {
            let p = square_to_uniform_triangle(&rng.next_2d());
            assert!(p.x >= 0.0 && p.y >= 0.0 && p.x + p.y <= 1.0 + 1e-6);
        }
        assert_eq!(square_to_uniform_triangle_pdf(&Vector2f::new(0.25, 0.25)), 2.0);
        assert_eq!(square_to_uniform_triangle_pdf(&Vector2f::new(0.75, 0.75)), 0.0);
    }

    #[test]
    fn test_uniform_sphere_statistics() {
        let mut rng = sampler();
        let mut mean_z = 0.0;
        for _ in 0..SAMPLE_COUNT {
            let v = square_to_uniform_sphere(&rng.next_2d());
            assert!((v.norm() - 1.0).abs() < 1e-4);
            mean_z += v.z as f64;
        }
        mean_z /= SAMPLE_COUNT as f64;
        assert!(mean_z.abs() < 0.01);
        assert!((square_to_uniform_sphere_pdf(&Vector3f::new(0.0, 0.0, -1.0)) - INV_FOUR_PI).abs() < 1e-6);
    }

    #[test]
    fn test_uniform_hemisphere_statistics() {
        let mut rng = sampler();
        let mut mean_z = 0.0;
        for _ in 0..SAMPLE_COUNT {
            let v = square_to_uniform_hemisphere(&rng.next_2d());
            assert!(v.z >= 0.0);
            assert!((v.norm() - 1.0).abs() < 1e-4);
            mean_z += v.z as f64;
        }
        mean_z /= SAMPLE_COUNT as f64;
        // E[cos theta] under the uniform hemisphere is 1/2.
        assert!((mean_z - 0.5).abs() < 0.01);

        assert_eq!(square_to_uniform_hemisphere_pdf(&Vector3f::new(0.0, 0.0, -1.0)), 0.0);
        assert!((square_to_uniform_hemisphere_pdf(&Vector3f::new(0.0, 0.0, 1.0)) - INV_TWO_PI).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_hemisphere_statistics() {
        let mut rng = sampler();
        let mut mean_z = 0.0;
        for _ in 0..SAMPLE_COUNT {
            let v = square_to_cosine_hemisphere(&rng.next_2d());
            assert!(v.z >= 0.0);
            assert!((v.norm() - 1.0).abs() < 1e-4);
            mean_z += v.z as f64;
        }
        mean_z /= SAMPLE_COUNT as f64;
        // E[cos theta] under the cosine-weighted hemisphere is 2/3.
        assert!((mean_z - 2.0 / 3.0).abs() < 0.01);
    }

    #[test]
    fn test_cosine_hemisphere_pdf_values() {
        assert_eq!(square_to_cosine_hemisphere_pdf(&Vector3f::new(0.0, 0.0, -0.5)), 0.0);
        assert_eq!(square_to_cosine_hemisphere_pdf(&Vector3f::new(0.0, 0.0, 1.5)), 0.0);
        let v = Vector3f::new(0.0, 0.6, 0.8);
        assert!((square_to_cosine_hemisphere_pdf(&v) - 0.8 * INV_PI).abs() < 1e-6);
    }

    #[test]
    fn test_beckmann_domain_and_guards() {
        let alpha = 0.3;
        let mut rng = sampler();
        for _ in 0..SAMPLE_COUNT {
            let m = square_to_beckmann(&rng.next_2d(), alpha);
            assert!(m.z >= 0.0);
            assert!((m.norm() - 1.0).abs() < 1e-4);
            assert!(square_to_beckmann_pdf(&m, alpha) >= 0.0);
        }

        // Below the horizon the density vanishes.
        assert_eq!(square_to_beckmann_pdf(&Vector3f::new(0.0, 0.0, -1.0), alpha), 0.0);
        assert_eq!(square_to_beckmann_pdf(&Vector3f::new(1.0, 0.0, 0.0), alpha), 0.0);
    }

    #[test]
    fn test_beckmann_pdf_normalization() {
        // Numerically integrate the density over the hemisphere.
        let alpha = 0.3;
        let theta_steps = 512;
        let phi_steps = 256;
        let d_theta = (PI / 2.0) as f64 / theta_steps as f64;
        let d_phi = (2.0 * PI) as f64 / phi_steps as f64;

        let mut integral = 0.0f64;
        for i in 0..theta_steps {
            let theta = (i as f64 + 0.5) * d_theta;
            let sin_theta = theta.sin();
            let m = Vector3f::new(sin_theta as Float, 0.0, theta.cos() as Float);
            let pdf = square_to_beckmann_pdf(&m, alpha) as f64;
            integral += pdf * sin_theta * d_theta * d_phi * phi_steps as f64;
        }

        assert!((integral - 1.0).abs() < 0.01);
    }
}
