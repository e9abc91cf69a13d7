// Copyright @yucwang 2021

use crate::core::error::RenderResult;
use crate::core::integrator::Integrator;
use crate::core::sampler::{IndependentSampler, Sampler};
use crate::core::scene::Scene;
use crate::core::sensor::Sensor;
use crate::math::bitmap::Bitmap;
use crate::math::constants::{Float, Vector2f, Vector3f};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;

pub use super::renderer::Renderer;

const BLOCK_SIZE: usize = 64;

/// Block-based multithreaded renderer. Integrator preprocessing runs to
/// completion up front; afterwards every worker only reads the scene and
/// the integrator, each pixel owning a seeded sampler stream so results
/// are reproducible regardless of scheduling.
pub struct SimpleRenderer {
    integrator: Box<dyn Integrator>,
    seed: u64,
}

impl SimpleRenderer {
    pub fn new(integrator: Box<dyn Integrator>, seed: u64) -> Self {
        Self { integrator, seed }
    }
}

impl Renderer for SimpleRenderer {
    fn render(&mut self, scene: &Scene, sensor: &mut dyn Sensor) -> RenderResult<Bitmap> {
        let (width, height) = {
            let bmp = sensor.bitmap();
            (bmp.width(), bmp.height())
        };
        if width == 0 || height == 0 {
            return Ok(Bitmap::new(0, 0));
        }

        scene.validate()?;

        let mut preprocess_sampler = IndependentSampler::new(self.seed.wrapping_add(0x9E3779B9));
        self.integrator.preprocess(scene, &mut preprocess_sampler)?;
        log::info!("rendering with {}", self.integrator.to_string());

        let spp = match self.integrator.samples_per_pixel() {
            0 => 1,
            v => v,
        };
        let inv_spp = 1.0 / (spp as Float);

        let blocks_x = (width + BLOCK_SIZE - 1) / BLOCK_SIZE;
        let blocks_y = (height + BLOCK_SIZE - 1) / BLOCK_SIZE;
        let total_blocks = blocks_x * blocks_y;

        let integrator_ref: &dyn Integrator = self.integrator.as_ref();
        let sensor_ref: &dyn Sensor = &*sensor;
        let seed = self.seed;

        let progress = ProgressBar::new(total_blocks as u64);
        progress.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} blocks")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let next_block = Arc::new(AtomicUsize::new(0));
        let thread_count = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let (tx, rx) = mpsc::channel::<(usize, usize, usize, usize, Vec<Vector3f>)>();
        let mut output = vec![Vector3f::zeros(); width * height];

        thread::scope(|scope| {
            for _ in 0..thread_count {
                let next_block = Arc::clone(&next_block);
                let tx = tx.clone();
                scope.spawn(move || {
                    let base_sampler = IndependentSampler::new(seed);
                    loop {
                        let block_index = next_block.fetch_add(1, Ordering::Relaxed);
                        if block_index >= total_blocks {
                            break;
                        }

                        let x0 = (block_index % blocks_x) * BLOCK_SIZE;
                        let y0 = (block_index / blocks_x) * BLOCK_SIZE;
                        let x1 = (x0 + BLOCK_SIZE).min(width);
                        let y1 = (y0 + BLOCK_SIZE).min(height);

                        let mut block = vec![Vector3f::zeros(); (x1 - x0) * (y1 - y0)];
                        for y in y0..y1 {
                            for x in x0..x1 {
                                let pixel_seed = ((seed & 0xFFF) << 32)
                                    | (((y as u64) & 0xFFFF) << 16)
                                    | ((x as u64) & 0xFFFF);
                                let mut sampler = base_sampler.clone_seeded(pixel_seed);

                                let mut color = Vector3f::zeros();
                                for _ in 0..spp {
                                    let jitter = sampler.next_2d();
                                    let u = (x as Float + jitter.x) / (width as Float);
                                    let v = (y as Float + jitter.y) / (height as Float);
                                    let ray = sensor_ref.sample_ray(&Vector2f::new(u, v));
                                    let radiance =
                                        integrator_ref.trace_ray(scene, sampler.as_mut(), &ray);
                                    color += Vector3f::new(radiance[0], radiance[1], radiance[2]);
                                }

                                block[(x - x0) + (x1 - x0) * (y - y0)] = color * inv_spp;
                            }
                        }
                        if tx.send((x0, y0, x1, y1, block)).is_err() {
                            break;
                        }
                    }
                });
            }

            drop(tx);
            for _ in 0..total_blocks {
                if let Ok((x0, y0, x1, y1, block)) = rx.recv() {
                    for y in y0..y1 {
                        for x in x0..x1 {
                            output[x + width * y] = block[(x - x0) + (x1 - x0) * (y - y0)];
                        }
                    }
                    progress.inc(1);
                }
            }
        });
        progress.finish_and_clear();

        let bitmap = sensor.bitmap_mut();
        for y in 0..height {
            for x in 0..width {
                bitmap[(x, y)] = output[x + width * y];
            }
        }

        Ok(bitmap.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrators::direct_ems::DirectEmitterSampling;
    use crate::integrators::test_scenes::light_over_floor;
    use crate::math::ray::Ray3f;

    struct FixedSensor {
        bitmap: Bitmap,
    }

    impl Sensor for FixedSensor {
        fn sample_ray(&self, _u: &Vector2f) -> Ray3f {
            // Every pixel looks straight at the light from below.
            Ray3f::new(Vector3f::new(0.0, 0.0, 1.0), Vector3f::new(0.0, 0.0, 1.0), None, None)
        }

        fn bitmap(&self) -> &Bitmap {
            &self.bitmap
        }

        fn bitmap_mut(&mut self) -> &mut Bitmap {
            &mut self.bitmap
        }
    }

    #[test]
    fn test_renderer_fills_every_pixel() {
        let scene = light_over_floor();
        let mut renderer = SimpleRenderer::new(Box::new(DirectEmitterSampling::new(2)), 1);
        let mut sensor = FixedSensor { bitmap: Bitmap::new(70, 33) };

        let image = renderer.render(&scene, &mut sensor).expect("render should succeed");
        assert_eq!(image.width(), 70);
        assert_eq!(image.height(), 33);
        for y in 0..image.height() {
            for x in 0..image.width() {
                assert!((image[(x, y)].x - 10.0).abs() < 1e-4);
            }
        }
    }
}
