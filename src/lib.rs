//! Competitive erosion on a cylinder lattice.
//!
//! Colored regions grow by launching random walkers from their own cells;
//! each walker recolors the first cell of another color it reaches.
//! [`chain::ErosionEngine`] drives the Markov chain over a [`grid::Lattice`].

pub mod chain;
pub mod config;
pub mod error;
pub mod grid;
pub mod rng;
pub mod walk;

use std::time::Instant;

pub use chain::{Erosion, ErosionEngine};
pub use config::{EdgePolicy, InitialPattern, Params, SourcePolicy};
pub use error::{ErosionError, Result};
pub use grid::{Color, Lattice, Site};

pub struct Timing {
    pub name: &'static str,
    pub ms: f64,
}

/// Build a `w` x `h` cylinder from `params`, seed it with `seed` and run
/// `steps` erosion events.
pub fn run(
    seed: u64,
    w: usize,
    h: usize,
    steps: u64,
    params: &Params,
) -> Result<(ErosionEngine, Vec<Timing>)> {
    let mut timings = Vec::new();
    let total_start = Instant::now();

    // 1. Allocate and color the lattice
    let t = Instant::now();
    let mut engine = ErosionEngine::new(w, h, seed, params.clone())?;
    timings.push(Timing {
        name: "initialize",
        ms: t.elapsed().as_secs_f64() * 1000.0,
    });

    // 2. Markov chain
    let t = Instant::now();
    engine.markov_chain(steps)?;
    timings.push(Timing {
        name: "chain",
        ms: t.elapsed().as_secs_f64() * 1000.0,
    });

    let total_ms = total_start.elapsed().as_secs_f64() * 1000.0;
    timings.push(Timing {
        name: "TOTAL",
        ms: total_ms,
    });

    Ok((engine, timings))
}
