use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ErosionError, Result};

/// Default walk budget. Large enough for lattices of a few hundred
/// thousand cells; a monochrome lattice is detected before walking.
pub const DEFAULT_MAX_WALK_STEPS: u64 = 10_000_000;

/// Deterministic starting coloring.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InitialPattern {
    /// Bands stacked along the cyclic axis: color = y / (Y / k), clamped to k - 1.
    #[default]
    RowBands,
    /// Bands side by side along the bounded axis.
    ColumnBands,
    /// A single color-0 cell on a color-1 background.
    Seed { x: usize, y: usize },
}

/// What a walker does when it tries to step off the bounded axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgePolicy {
    /// Mirror the move back into the lattice (x = -1 -> 1, x = X -> X - 2).
    #[default]
    Reflect,
    /// Wrap x as well, turning the cylinder into a torus.
    Periodic,
}

/// How each chain step picks the cell its walker starts from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourcePolicy {
    /// Any cell of the attacking color, uniformly.
    #[default]
    Uniform,
    /// Attacking-color cells touching another color, uniformly.
    Frontier,
}

/// All tunable parameters of a chain run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    pub num_colors: u8,
    pub pattern: InitialPattern,
    pub edge: EdgePolicy,
    pub source: SourcePolicy,
    pub max_walk_steps: u64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            num_colors: 2,
            pattern: InitialPattern::default(),
            edge: EdgePolicy::default(),
            source: SourcePolicy::default(),
            max_walk_steps: DEFAULT_MAX_WALK_STEPS,
        }
    }
}

impl Params {
    pub fn validate(&self) -> Result<()> {
        if self.num_colors < 2 {
            return Err(ErosionError::InvalidParams(format!(
                "num_colors must be at least 2, got {}",
                self.num_colors
            )));
        }
        if self.max_walk_steps == 0 {
            return Err(ErosionError::InvalidParams(
                "max_walk_steps must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Parse a (possibly partial) JSON document; missing fields take defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let params: Params = serde_json::from_str(text)?;
        params.validate()?;
        Ok(params)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}
