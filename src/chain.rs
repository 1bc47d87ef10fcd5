use tracing::{debug, info, warn};

use crate::config::{Params, SourcePolicy};
use crate::error::{ErosionError, Result};
use crate::grid::{Color, Lattice, Site};
use crate::rng::Rng;
use crate::walk::{self, Absorption};

/// One erosion event: a walker launched from `source` changed `site` from
/// `from` to `to` after `walk_len` moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Erosion {
    pub source: Site,
    pub site: Site,
    pub from: Color,
    pub to: Color,
    pub walk_len: u64,
}

/// Markov-chain driver. Exclusively owns the lattice and the generator;
/// chain state is exactly `(lattice, rng)`.
#[derive(Clone, Debug)]
pub struct ErosionEngine {
    lattice: Lattice,
    rng: Rng,
    params: Params,
    counts: Vec<usize>,
    steps: u64,
}

impl ErosionEngine {
    /// Build a `width` x `height` cylinder, color it with `params.pattern`
    /// and seed the generator.
    pub fn new(width: usize, height: usize, seed: u64, params: Params) -> Result<Self> {
        params.validate()?;
        let mut lattice = Lattice::new(width, height)?;
        lattice.initialize(params.pattern, params.num_colors)?;
        Self::with_lattice(lattice, seed, params)
    }

    /// Adopt a caller-colored lattice. Every label must lie in the palette.
    pub fn with_lattice(lattice: Lattice, seed: u64, params: Params) -> Result<Self> {
        params.validate()?;
        if let Some(&c) = lattice.as_slice().iter().find(|&&c| c >= params.num_colors) {
            return Err(ErosionError::InvalidColor {
                color: c,
                num_colors: params.num_colors,
            });
        }
        let counts = lattice.color_counts(params.num_colors);
        Ok(Self {
            lattice,
            rng: Rng::new(seed),
            params,
            counts,
            steps: 0,
        })
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Cells per color label; always sums to the lattice size.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Erosion events applied so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Restore the starting coloring. Leaves the generator and step count alone.
    pub fn initialize_graph(&mut self) -> Result<()> {
        self.lattice
            .initialize(self.params.pattern, self.params.num_colors)?;
        self.counts = self.lattice.color_counts(self.params.num_colors);
        Ok(())
    }

    pub fn color(&self, x: i64, y: i64) -> Result<Color> {
        self.lattice.color(x, y)
    }

    pub fn set_color(&mut self, x: i64, y: i64, color: Color) -> Result<()> {
        if color >= self.params.num_colors {
            return Err(ErosionError::InvalidColor {
                color,
                num_colors: self.params.num_colors,
            });
        }
        let site = self.lattice.resolve(x, y)?;
        self.recolor(site, color);
        Ok(())
    }

    /// Walk from `(x, y)` until the first cell not colored `color`; returns
    /// the visited sites, start first and absorbing site last. Does not
    /// modify the lattice.
    pub fn random_walk(&mut self, x: i64, y: i64, color: Color) -> Result<Vec<Site>> {
        let start = self.lattice.resolve(x, y)?;
        self.check_absorbable(start, color)?;
        walk::random_walk(
            &self.lattice,
            &mut self.rng,
            start,
            color,
            self.params.edge,
            self.params.max_walk_steps,
        )
    }

    /// Run `n` erosion steps. Stops at the first failure; steps already
    /// taken stay applied.
    pub fn markov_chain(&mut self, n: u64) -> Result<()> {
        info!(
            steps = n,
            width = self.lattice.width(),
            height = self.lattice.height(),
            "starting chain"
        );
        for _ in 0..n {
            self.step()?;
        }
        info!(total_steps = self.steps, counts = ?self.counts, "chain finished");
        Ok(())
    }

    /// One chain step: pick the attacking color and a source cell, walk,
    /// erode the absorbing cell.
    pub fn step(&mut self) -> Result<Erosion> {
        let attacker = self.attacker();
        if self.counts[attacker as usize] == self.lattice.cells() {
            return Err(ErosionError::NoAbsorption {
                x: 0,
                y: 0,
                color: attacker,
                steps: 0,
            });
        }
        let source = self.pick_source(attacker);
        self.erode(source, attacker)
    }

    /// Force a step from `(x, y)` using that cell's current color as the attacker.
    pub fn erode_from(&mut self, x: i64, y: i64) -> Result<Erosion> {
        let start = self.lattice.resolve(x, y)?;
        let color = self.lattice.get(start);
        self.erode(start, color)
    }

    fn erode(&mut self, start: Site, color: Color) -> Result<Erosion> {
        self.check_absorbable(start, color)?;
        let walked = walk::walk_until_absorbed(
            &self.lattice,
            &mut self.rng,
            start,
            color,
            self.params.edge,
            self.params.max_walk_steps,
            |_| {},
        );
        let Absorption { site, steps } = match walked {
            Ok(a) => a,
            Err(e) => {
                warn!(step = self.steps, error = %e, "walk failed");
                return Err(e);
            }
        };

        let from = self.lattice.get(site);
        self.recolor(site, color);
        self.steps += 1;
        debug!(
            step = self.steps,
            x = site.0,
            y = site.1,
            from,
            to = color,
            walk_len = steps,
            "eroded"
        );
        Ok(Erosion {
            source: start,
            site,
            from,
            to: color,
            walk_len: steps,
        })
    }

    /// Fail fast when a walk could never be absorbed: the start matches
    /// `color` and so does every other cell. The cylinder is connected, so
    /// any differently colored cell is reachable.
    fn check_absorbable(&self, start: Site, color: Color) -> Result<()> {
        let same = self.counts.get(color as usize).copied().unwrap_or(0);
        if self.lattice.get(start) == color && same == self.lattice.cells() {
            return Err(ErosionError::NoAbsorption {
                x: start.0,
                y: start.1,
                color,
                steps: 0,
            });
        }
        Ok(())
    }

    fn recolor(&mut self, site: Site, color: Color) {
        let old = self.lattice.get(site);
        self.counts[old as usize] -= 1;
        self.counts[color as usize] += 1;
        self.lattice.put(site, color);
    }

    /// Round-robin over labels starting at `steps % k`, skipping extinct colors.
    fn attacker(&self) -> Color {
        let k = self.params.num_colors as usize;
        let first = (self.steps % k as u64) as usize;
        (0..k)
            .map(|i| (first + i) % k)
            .find(|&c| self.counts[c] > 0)
            .unwrap_or(first) as Color
    }

    fn pick_source(&mut self, color: Color) -> Site {
        match self.params.source {
            SourcePolicy::Uniform => {
                // attacker() only returns colors with live cells
                let cells = self.lattice.cells();
                loop {
                    let i = self.rng.range_usize(cells);
                    if self.lattice.as_slice()[i] == color {
                        return self.lattice.site(i);
                    }
                }
            }
            SourcePolicy::Frontier => {
                // Non-empty: color is live, not everywhere, and the cylinder is connected.
                let frontier = self.lattice.frontier_cells(color, self.params.edge);
                frontier[self.rng.range_usize(frontier.len())]
            }
        }
    }
}
