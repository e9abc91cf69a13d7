// Copyright 2020 TwoCookingMice

use canele::core::scene::{Scene, SceneObject};
use canele::integrators::create_integrator;
use canele::io::exr_utils;
use canele::materials::lambertian_diffuse::LambertianDiffuseBSDF;
use canele::math::constants::Vector3f;
use canele::math::spectrum::RGBSpectrum;
use canele::renderers::simple::{Renderer, SimpleRenderer};
use canele::sensors::perspective::PerspectiveCamera;
use canele::shapes::rectangle::Rectangle;

use std::env;
use std::sync::Arc;

// Scene descriptions are out of scope here, so the demo box is built in
// code: white floor/ceiling/back, colored side walls, one ceiling light.
fn build_box_scene() -> Scene {
    let white = RGBSpectrum::splat(0.75);
    let red = RGBSpectrum::new(0.65, 0.05, 0.05);
    let green = RGBSpectrum::new(0.12, 0.45, 0.15);

    let mut scene = Scene::new();

    scene.add_object(SceneObject::new(
        Arc::new(Rectangle::new(
            Vector3f::new(-1.0, -1.0, 0.0),
            Vector3f::new(2.0, 0.0, 0.0),
            Vector3f::new(0.0, 2.0, 0.0),
        )),
        Arc::new(LambertianDiffuseBSDF::new(white)),
    ).with_name(String::from("floor")));

    scene.add_object(SceneObject::new(
        Arc::new(Rectangle::new(
            Vector3f::new(-1.0, -1.0, 2.0),
            Vector3f::new(0.0, 2.0, 0.0),
            Vector3f::new(2.0, 0.0, 0.0),
        )),
        Arc::new(LambertianDiffuseBSDF::new(white)),
    ).with_name(String::from("ceiling")));

    scene.add_object(SceneObject::new(
        Arc::new(Rectangle::new(
            Vector3f::new(-1.0, 1.0, 0.0),
            Vector3f::new(2.0, 0.0, 0.0),
            Vector3f::new(0.0, 0.0, 2.0),
        )),
        Arc::new(LambertianDiffuseBSDF::new(white)),
    ).with_name(String::from("back")));

    scene.add_object(SceneObject::new(
        Arc::new(Rectangle::new(
            Vector3f::new(-1.0, -1.0, 0.0),
            Vector3f::new(0.0, 2.0, 0.0),
            Vector3f::new(0.0, 0.0, 2.0),
        )),
        Arc::new(LambertianDiffuseBSDF::new(red)),
    ).with_name(String::from("left")));

    scene.add_object(SceneObject::new(
        Arc::new(Rectangle::new(
            Vector3f::new(1.0, -1.0, 0.0),
            Vector3f::new(0.0, 0.0, 2.0),
            Vector3f::new(0.0, 2.0, 0.0),
        )),
        Arc::new(LambertianDiffuseBSDF::new(green)),
    ).with_name(String::from("right")));

    scene.add_object(SceneObject::with_emission(
        Arc::new(Rectangle::new(
            Vector3f::new(-0.25, -0.25, 1.99),
            Vector3f::new(0.0, 0.5, 0.0),
            Vector3f::new(0.5, 0.0, 0.0),
        )),
        Arc::new(LambertianDiffuseBSDF::new(RGBSpectrum::default())),
        RGBSpectrum::splat(15.0),
    ).with_name(String::from("light")));

    scene
}

fn main() {
    env::set_var("RUST_LOG", "info");
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <integrator> <output.exr> [--spp N] [--size N] [--seed N]", args[0]);
        eprintln!("  integrators: direct_ems, direct_mats, direct_mis, path, path_nee, path_mis, vpl");
        std::process::exit(1);
    }

    let integrator_name = &args[1];
    let output_path = &args[2];
    let mut spp: u32 = 32;
    let mut size: usize = 400;
    let mut seed: u64 = 0;

    let mut i = 3;
    while i < args.len() {
        match args[i].as_str() {
            "--spp" => {
                i += 1;
                spp = args.get(i).and_then(|v| v.parse::<u32>().ok()).unwrap_or(spp);
            }
            "--size" => {
                i += 1;
                size = args.get(i).and_then(|v| v.parse::<usize>().ok()).unwrap_or(size);
            }
            "--seed" => {
                i += 1;
                seed = args.get(i).and_then(|v| v.parse::<u64>().ok()).unwrap_or(seed);
            }
            _ => {}
        }
        i += 1;
    }

    let integrator = match create_integrator(integrator_name, spp) {
        Ok(integrator) => integrator,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let scene = build_box_scene();
    let mut camera = PerspectiveCamera::new(
        Vector3f::new(0.0, -3.4, 1.0),
        Vector3f::new(0.0, 0.0, 1.0),
        Vector3f::new(0.0, 0.0, 1.0),
        40.0f32.to_radians(),
        size,
        size,
    );

    let mut renderer = SimpleRenderer::new(integrator, seed);
    let image = match renderer.render(&scene, &mut camera) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("render failed: {}", e);
            std::process::exit(1);
        }
    };

    exr_utils::write_exr_to_file(&image.raw_copy(), image.width(), image.height(), output_path);
}
