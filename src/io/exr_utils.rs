/* Copyright 2020 @TwoCookingMice */

use crate::math::constants::Float;

use exr::prelude::*;

// Write EXR Image to file
pub fn write_exr_to_file(image: &[(Float, Float, Float)],
                         width: usize,
                         height: usize,
                         file_path: &str) {
    log::info!("Starting writing openexr images: {}.", file_path);

    let write_result = write_rgb_file(file_path, width, height, |x, y| {
        let pixel = image[y * width + x];
        (pixel.0, pixel.1, pixel.2)
    });
    match write_result {
        Ok(()) => log::info!("EXR written to: {}.", file_path),
        Err(e) => log::error!("EXR written error: {}.", e),
    }
}
