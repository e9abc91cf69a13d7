// Copyright @yucwang 2026

use thiserror::Error;

/// Failures that abort the requested operation. Zero-contribution outcomes
/// (occlusion, absorption, roulette death) are ordinary values, not errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{0} is not yet implemented")]
    NotImplemented(&'static str),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type RenderResult<T> = Result<T, RenderError>;
