// Copyright 2020 @TwoCookingMice

use super::constants::{Float, Vector3f};

use std::ops;
use std::vec::Vec;

#[derive(Debug, Clone)]
pub struct Bitmap {
    data: Vec<Vector3f>,
    height: usize,
    width: usize,
}

impl ops::Index<(usize, usize)> for Bitmap {
    type Output = Vector3f;

    fn index(&self, index: (usize, usize)) -> &Vector3f {
        let transformed_index = index.0 + self.width * index.1;
        assert!(transformed_index < self.height * self.width);
        &self.data[transformed_index]
    }
}

impl ops::IndexMut<(usize, usize)> for Bitmap {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Vector3f {
        let transformed_index = index.0 + self.width * index.1;
        assert!(transformed_index < self.height * self.width);
        &mut self.data[transformed_index]
    }
}

impl Bitmap {
    pub fn new(width: usize, height: usize) -> Self {
        let pixel_number = width * height;
        Self { data: vec![Vector3f::new(0.0, 0.0, 0.0); pixel_number],
               width,
               height }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn raw_copy(&self) -> Vec<(Float, Float, Float)> {
        self.data.iter().map(|p| (p.x, p.y, p.z)).collect()
    }
}

/* Test for Bitmap */

#[cfg(test)]
mod tests {
    use super::Bitmap;
    use super::Vector3f;

    #[test]
    fn test_bitmap_basic_functions() {
        let mut bitmap = Bitmap::new(16, 8);
        assert_eq!(bitmap.width(), 16);
        assert_eq!(bitmap.height(), 8);

        bitmap[(5, 6)] = Vector3f::new(1.0, 0.5, 0.6);
        assert!((bitmap[(5, 6)][0] - 1.0).abs() < 1e-6);
        assert!((bitmap[(2, 6)][0] - 0.0).abs() < 1e-6);

        let raw = bitmap.raw_copy();
        assert_eq!(raw.len(), 16 * 8);
        assert!((raw[5 + 16 * 6].1 - 0.5).abs() < 1e-6);
    }
}
