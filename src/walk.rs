use crate::config::EdgePolicy;
use crate::error::{ErosionError, Result};
use crate::grid::{Color, Lattice, Site};
use crate::rng::Rng;

/// Unit moves indexed by the direction draw: East, West, North, South.
pub const DIRECTIONS: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Where a walk stopped and how many moves it took to get there.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Absorption {
    pub site: Site,
    pub steps: u64,
}

/// Fold a raw x back onto `[0, w)` according to the edge policy.
#[inline]
fn fold_x(x: i64, w: usize, edge: EdgePolicy) -> usize {
    let w = w as i64;
    match edge {
        EdgePolicy::Periodic => (((x % w) + w) % w) as usize,
        EdgePolicy::Reflect => {
            let r = if x < 0 {
                -x
            } else if x >= w {
                2 * (w - 1) - x
            } else {
                x
            };
            r.clamp(0, w - 1) as usize
        }
    }
}

/// One lattice move from `(x, y)` in direction `dir` (index into [`DIRECTIONS`]).
#[inline]
pub fn advance((x, y): Site, dir: usize, w: usize, h: usize, edge: EdgePolicy) -> Site {
    let (dx, dy) = DIRECTIONS[dir];
    let nx = fold_x(x as i64 + dx, w, edge);
    let h = h as i64;
    let ny = (((y as i64 + dy) % h) + h) as usize % h as usize;
    (nx, ny)
}

/// Walk from `start` until the first cell whose color differs from `color`.
///
/// `start` must be a normalized site. `visit` sees every position in order,
/// the start included. A start cell
/// that already differs absorbs at step zero. The walk consumes exactly one
/// RNG draw per move, so callers that record the trace and callers that
/// don't stay on the same random stream.
pub fn walk_until_absorbed<F: FnMut(Site)>(
    lattice: &Lattice,
    rng: &mut Rng,
    start: Site,
    color: Color,
    edge: EdgePolicy,
    max_steps: u64,
    mut visit: F,
) -> Result<Absorption> {
    lattice.index(start.0, start.1)?;
    let w = lattice.width();
    let h = lattice.height();
    let mut pos = start;
    visit(pos);
    if lattice.get(pos) != color {
        return Ok(Absorption { site: pos, steps: 0 });
    }

    for steps in 1..=max_steps {
        pos = advance(pos, rng.range_usize(DIRECTIONS.len()), w, h, edge);
        visit(pos);
        if lattice.get(pos) != color {
            return Ok(Absorption { site: pos, steps });
        }
    }

    Err(ErosionError::NoAbsorption {
        x: start.0,
        y: start.1,
        color,
        steps: max_steps,
    })
}

/// Same walk, returning the full trace. The last element is the absorbing site.
pub fn random_walk(
    lattice: &Lattice,
    rng: &mut Rng,
    start: Site,
    color: Color,
    edge: EdgePolicy,
    max_steps: u64,
) -> Result<Vec<Site>> {
    let mut trace = Vec::new();
    walk_until_absorbed(lattice, rng, start, color, edge, max_steps, |p| trace.push(p))?;
    Ok(trace)
}
