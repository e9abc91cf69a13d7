// Copyright @yucwang 2023

pub mod beckmann;
pub mod lambertian_diffuse;
pub mod mirror;
