// Copyright @yucwang 2021

use crate::core::error::RenderResult;
use crate::core::scene::Scene;
use crate::core::sensor::Sensor;
use crate::math::bitmap::Bitmap;

pub trait Renderer {
    fn render(&mut self, scene: &Scene, sensor: &mut dyn Sensor) -> RenderResult<Bitmap>;
}
