use thiserror::Error;

use crate::grid::Color;

#[derive(Error, Debug)]
pub enum ErosionError {
    #[error("invalid lattice dimensions {width}x{height}: both must be positive")]
    InvalidDimensions { width: usize, height: usize },

    #[error("x = {x} is outside the bounded axis [0, {width})")]
    OutOfBounds { x: i64, width: usize },

    #[error("walk from ({x}, {y}) with color {color} not absorbed after {steps} steps")]
    NoAbsorption {
        x: usize,
        y: usize,
        color: Color,
        steps: u64,
    },

    #[error("color {color} is outside the palette of {num_colors} colors")]
    InvalidColor { color: Color, num_colors: u8 },

    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    #[error("failed to parse parameters: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read parameters: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ErosionError>;
