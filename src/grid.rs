use rayon::prelude::*;

use crate::config::{EdgePolicy, InitialPattern};
use crate::error::{ErosionError, Result};

/// Color label of one lattice cell.
pub type Color = u8;

/// Normalized lattice coordinate `(x, y)` with `x < width`, `y < height`.
pub type Site = (usize, usize);

/// Row-major flat lattice of color labels on a cylinder.
/// x runs along the bounded axis (width X), y along the cyclic axis (height Y).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lattice {
    data: Vec<Color>,
    w: usize,
    h: usize,
}

impl Lattice {
    pub fn new(w: usize, h: usize) -> Result<Self> {
        let n = cell_count(w, h)?;
        Ok(Self {
            data: vec![0; n],
            w,
            h,
        })
    }

    /// Adopt an existing row-major color buffer of length `w * h`.
    pub fn from_colors(w: usize, h: usize, data: Vec<Color>) -> Result<Self> {
        if data.len() != cell_count(w, h)? {
            return Err(ErosionError::InvalidDimensions { width: w, height: h });
        }
        Ok(Self { data, w, h })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.w
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.h
    }

    #[inline]
    pub fn cells(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Color] {
        &self.data
    }

    /// Flat index of a normalized site. Unlike the crate-internal accessors,
    /// this rejects x or y outside the lattice instead of aliasing another cell.
    pub fn index(&self, x: usize, y: usize) -> Result<usize> {
        if x >= self.w {
            return Err(ErosionError::OutOfBounds { x: x as i64, width: self.w });
        }
        if y >= self.h {
            return Err(ErosionError::InvalidParams(format!(
                "y = {y} is not normalized for height {}",
                self.h
            )));
        }
        Ok(self.idx(x, y))
    }

    #[inline]
    pub(crate) fn idx(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.w && y < self.h);
        y * self.w + x
    }

    #[inline]
    pub(crate) fn site(&self, i: usize) -> Site {
        (i % self.w, i / self.w)
    }

    /// Normalize signed coordinates, rejecting x off the bounded axis.
    pub fn resolve(&self, x: i64, y: i64) -> Result<Site> {
        wrap_xy(x, y, self.w, self.h).ok_or(ErosionError::OutOfBounds { x, width: self.w })
    }

    #[inline]
    pub(crate) fn get(&self, (x, y): Site) -> Color {
        self.data[self.idx(x, y)]
    }

    #[inline]
    pub(crate) fn put(&mut self, (x, y): Site, c: Color) {
        let i = self.idx(x, y);
        self.data[i] = c;
    }

    pub fn color(&self, x: i64, y: i64) -> Result<Color> {
        Ok(self.get(self.resolve(x, y)?))
    }

    pub fn set_color(&mut self, x: i64, y: i64, c: Color) -> Result<()> {
        let site = self.resolve(x, y)?;
        self.put(site, c);
        Ok(())
    }

    /// Overwrite every cell with the starting coloring for `num_colors` colors.
    pub fn initialize(&mut self, pattern: InitialPattern, num_colors: u8) -> Result<()> {
        let k = num_colors.max(1) as usize;
        let w = self.w;
        let h = self.h;
        match pattern {
            InitialPattern::RowBands => {
                let band = (h / k).max(1);
                for (y, row) in self.data.chunks_mut(w).enumerate() {
                    row.fill((y / band).min(k - 1) as Color);
                }
            }
            InitialPattern::ColumnBands => {
                let band = (w / k).max(1);
                for row in self.data.chunks_mut(w) {
                    for (x, c) in row.iter_mut().enumerate() {
                        *c = (x / band).min(k - 1) as Color;
                    }
                }
            }
            InitialPattern::Seed { x, y } => {
                if x >= w || y >= h {
                    return Err(ErosionError::InvalidParams(format!(
                        "seed cell ({x}, {y}) outside {w}x{h} lattice"
                    )));
                }
                self.data.fill(1);
                self.put((x, y), 0);
            }
        }
        Ok(())
    }

    /// Number of cells holding each label in `0..num_colors`.
    /// Labels outside the palette are not counted.
    pub fn color_counts(&self, num_colors: u8) -> Vec<usize> {
        let k = num_colors as usize;
        self.data
            .par_chunks(self.w)
            .map(|row| {
                let mut counts = vec![0usize; k];
                for &c in row {
                    if let Some(n) = counts.get_mut(c as usize) {
                        *n += 1;
                    }
                }
                counts
            })
            .reduce(
                || vec![0usize; k],
                |mut a, b| {
                    for (x, y) in a.iter_mut().zip(b) {
                        *x += y;
                    }
                    a
                },
            )
    }

    /// Cells of `color` with at least one 4-neighbor of another color,
    /// in row-major order. Under `EdgePolicy::Periodic` the x seam counts
    /// as adjacent too.
    pub fn frontier_cells(&self, color: Color, edge: EdgePolicy) -> Vec<Site> {
        let w = self.w;
        let h = self.h;
        let rows: Vec<Vec<Site>> = (0..h)
            .into_par_iter()
            .map(|y| {
                let mut row_frontier = Vec::new();
                for x in 0..w {
                    if self.get((x, y)) != color {
                        continue;
                    }
                    if neighbors4(x, y, w, h, edge).any(|n| self.get(n) != color) {
                        row_frontier.push((x, y));
                    }
                }
                row_frontier
            })
            .collect();
        rows.into_iter().flatten().collect()
    }
}

fn cell_count(w: usize, h: usize) -> Result<usize> {
    match w.checked_mul(h) {
        Some(n) if n > 0 => Ok(n),
        _ => Err(ErosionError::InvalidDimensions { width: w, height: h }),
    }
}

/// Wrap y onto the cyclic axis. x is bounded (cylinder side walls).
/// Returns None if x is out of bounds.
#[inline]
pub fn wrap_xy(x: i64, y: i64, w: usize, h: usize) -> Option<Site> {
    if x < 0 || x >= w as i64 {
        return None;
    }
    let wy = ((y % h as i64) + h as i64) as usize % h;
    Some((x as usize, wy))
}

/// 4-connected neighbors with wrapping along y.
pub fn neighbors4_wrap(x: usize, y: usize, w: usize, h: usize) -> impl Iterator<Item = Site> {
    let offsets: [(i64, i64); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
    let mut out = [(0usize, 0usize); 4];
    let mut n = 0;
    for (dx, dy) in offsets {
        if let Some(pos) = wrap_xy(x as i64 + dx, y as i64 + dy, w, h) {
            out[n] = pos;
            n += 1;
        }
    }
    out.into_iter().take(n)
}

/// 4-connected neighbors as a walker sees them: y always wraps, x wraps
/// only under `EdgePolicy::Periodic`. A reflected move off a wall lands on
/// a cell that is already an in-bounds neighbor, so `Reflect` needs nothing extra.
pub fn neighbors4(
    x: usize,
    y: usize,
    w: usize,
    h: usize,
    edge: EdgePolicy,
) -> impl Iterator<Item = Site> {
    let mut out = [(0usize, 0usize); 4];
    let mut n = 0;
    for pos in neighbors4_wrap(x, y, w, h) {
        out[n] = pos;
        n += 1;
    }
    if edge == EdgePolicy::Periodic && w > 1 {
        if x == 0 {
            out[n] = (w - 1, y);
            n += 1;
        } else if x == w - 1 {
            out[n] = (0, y);
            n += 1;
        }
    }
    out.into_iter().take(n)
}
