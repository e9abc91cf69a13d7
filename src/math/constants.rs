/* Copyright 2020 @Yuchen Wong */

pub type Float = f32;

pub type Vector2f = nalgebra::Vector2<Float>;
pub type Vector3f = nalgebra::Vector3<Float>;

pub const EPSILON: Float = 1e-4;
pub const SHADOW_EPSILON: Float = 1e-3;
pub const PI: Float = 3.14159265359;
pub const INV_PI: Float = 0.31830988618;
pub const INV_TWO_PI: Float = 0.15915494309;
pub const INV_FOUR_PI: Float = 0.07957747154;
