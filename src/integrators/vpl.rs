// Copyright @yucwang 2026

use crate::core::bsdf::{BSDFQueryRecord, Measure};
use crate::core::computation_node::ComputationNode;
use crate::core::emitter::EmitterQueryRecord;
use crate::core::error::RenderResult;
use crate::core::integrator::Integrator;
use crate::core::sampler::Sampler;
use crate::core::scene::Scene;
use crate::core::tangent_frame::{build_tangent_frame, local_to_world, world_to_local};
use crate::integrators::{emitter_hit_radiance, occluded, spawn_ray};
use crate::math::constants::{EPSILON, Float, Vector3f};
use crate::math::ray::Ray3f;
use crate::math::spectrum::{RGBSpectrum, Spectrum};

// Near-field clamp: shading points closer to a VPL than this are treated
// as if they were at this distance, which bounds the 1/r^2 term.
const MIN_VPL_DISTANCE: Float = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VplKind {
    /// Deposited directly on an emitter.
    Emitter,
    /// Deposited on a surface during the indirect walk.
    Surface,
}

/// Virtual point light: a stand-in light created during preprocessing.
/// Owned by the integrator that produced it, immutable once rendering
/// starts, rebuilt on every preprocess call.
pub struct Vpl {
    pub kind: VplKind,
    pub position: Vector3f,
    pub normal: Vector3f,
    pub flux: RGBSpectrum,
}

/// Instant radiosity. A preprocessing random walk from the emitters
/// deposits virtual point lights; the render phase sums their point-light
/// contributions at every shading point.
pub struct VplIntegrator {
    num_vpls: usize,
    max_walk_depth: u32,
    samples_per_pixel: u32,
    vpls: Vec<Vpl>,
}

impl VplIntegrator {
    pub fn new(num_vpls: usize, max_walk_depth: u32, samples_per_pixel: u32) -> Self {
        Self {
            num_vpls,
            max_walk_depth,
            samples_per_pixel,
            vpls: Vec::new(),
        }
    }

    pub fn vpls(&self) -> &[Vpl] {
        &self.vpls
    }

    /// Bounded random walk depositing indirect VPLs. Stops on a miss, a
    /// zero-throughput sample, roulette death, the depth bound, or a
    /// shading/geometric normal disagreement (which would leak energy
    /// through back-facing geometry).
    fn indirect_walk(
        &mut self,
        scene: &Scene,
        sampler: &mut dyn Sampler,
        start: Ray3f,
        flux: RGBSpectrum,
    ) {
        let mut current = start;
        let mut weight = flux;
        let mut depth = 0;

        while depth < self.max_walk_depth && !weight.is_black() {
            let hit = match scene.ray_intersection(&current) {
                Some(hit) => hit,
                None => break,
            };
            let material = match hit.material() {
                Some(material) => material,
                None => break,
            };

            let n_geo = hit.geo_normal();
            let n_sh = hit.sh_normal();
            let wi_world = -current.dir();
            if wi_world.dot(&n_geo) * wi_world.dot(&n_sh) <= 0.0 {
                break;
            }

            let (tangent, bitangent) = build_tangent_frame(&n_sh);
            let wi_local = world_to_local(&wi_world, &tangent, &bitangent, &n_sh);

            let mut bsdf_record = BSDFQueryRecord::new(wi_local, hit.uv());
            let bsdf_weight = material.sample(&mut bsdf_record, &sampler.next_2d());
            if bsdf_weight.is_black() {
                break;
            }

            let deposited = weight * bsdf_weight;
            self.vpls.push(Vpl {
                kind: VplKind::Surface,
                position: hit.p(),
                normal: n_sh,
                flux: deposited,
            });

            let wo_world = local_to_world(&bsdf_record.wo, &tangent, &bitangent, &n_sh);
            if wo_world.dot(&n_geo) * wo_world.dot(&n_sh) <= 0.0 {
                break;
            }

            // Roulette on the carried flux, 1/q on survival.
            let survival = deposited.max_channel().min(1.0);
            if survival <= 0.0 || sampler.next_1d() >= survival {
                break;
            }
            weight = deposited / survival;

            current = spawn_ray(&hit, wo_world);
            depth += 1;
        }
    }
}

impl ComputationNode for VplIntegrator {
    fn to_string(&self) -> String {
        format!("VplIntegrator [num_vpls={}, max_walk_depth={}]", self.num_vpls, self.max_walk_depth)
    }
}

impl Integrator for VplIntegrator {
    fn preprocess(&mut self, scene: &Scene, sampler: &mut dyn Sampler) -> RenderResult<()> {
        self.vpls.clear();
        if scene.emitters().is_empty() {
            log::warn!("no emitters in the scene, the VPL set stays empty");
            return Ok(());
        }

        for _ in 0..self.num_vpls {
            let (emitter, selection_pdf) = match scene.sample_emitter(sampler.next_1d()) {
                Some(selected) => selected,
                None => break,
            };

            let mut position_record = EmitterQueryRecord::new(Vector3f::zeros());
            let radiance = emitter.sample_position(&mut position_record, &sampler.next_2d());
            if radiance.is_black() || position_record.pdf <= 0.0 {
                continue;
            }

            // Flux normalized by the selection and point densities.
            let flux = radiance / (selection_pdf * position_record.pdf);
            self.vpls.push(Vpl {
                kind: VplKind::Emitter,
                position: position_record.p,
                normal: position_record.n,
                flux,
            });

            let mut direction_record = EmitterQueryRecord::new(position_record.p);
            let direction_weight =
                emitter.sample_direction(&position_record, &mut direction_record, &sampler.next_2d())?;
            if direction_record.pdf <= 0.0 {
                continue;
            }

            let start = Ray3f::new(
                position_record.p + position_record.n * EPSILON,
                direction_record.wi,
                Some(EPSILON),
                None,
            );
            self.indirect_walk(scene, sampler, start, flux * direction_weight);
        }

        // 1/N so the sum over VPLs estimates the lighting integral.
        let inv_count = 1.0 / self.num_vpls as Float;
        for vpl in &mut self.vpls {
            vpl.flux = vpl.flux * inv_count;
        }

        log::info!("VPL preprocessing done, {} lights generated", self.vpls.len());
        Ok(())
    }

    fn trace_ray(&self, scene: &Scene, _sampler: &mut dyn Sampler, ray: &Ray3f) -> RGBSpectrum {
        let hit = match scene.ray_intersection(ray) {
            Some(hit) => hit,
            None => return scene.background(ray),
        };

        if let Some(radiance) = emitter_hit_radiance(scene, ray, &hit) {
            return radiance;
        }

        let material = match hit.material() {
            Some(material) => material,
            None => return RGBSpectrum::default(),
        };

        let n_sh = hit.sh_normal();
        let (tangent, bitangent) = build_tangent_frame(&n_sh);
        let wi_local = world_to_local(&-ray.dir(), &tangent, &bitangent, &n_sh);

        let mut lo = RGBSpectrum::default();
        for vpl in &self.vpls {
            let to_vpl = vpl.position - hit.p();
            let dist = to_vpl.norm();
            if dist <= 0.0 {
                continue;
            }
            let dir = to_vpl / dist;

            let cos_surface = n_sh.dot(&dir).max(0.0);
            let cos_vpl = vpl.normal.dot(&-dir).max(0.0);
            if cos_surface <= 0.0 || cos_vpl <= 0.0 {
                continue;
            }

            if occluded(scene, &hit, &dir, dist) {
                continue;
            }

            let bsdf_record = BSDFQueryRecord::with_directions(
                wi_local,
                world_to_local(&dir, &tangent, &bitangent, &n_sh),
                hit.uv(),
                Measure::SolidAngle,
            );
            let f = material.eval(&bsdf_record);
            if f.is_black() {
                continue;
            }

            let dist2 = (dist * dist).max(MIN_VPL_DISTANCE * MIN_VPL_DISTANCE);
            lo += f * vpl.flux * (cos_surface * cos_vpl / dist2);
        }

        lo
    }

    fn samples_per_pixel(&self) -> u32 {
        self.samples_per_pixel
    }
}
