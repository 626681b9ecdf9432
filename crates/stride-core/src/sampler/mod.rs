//! Context sampling: turning a source node into positive training pairs.
//!
//! Two interchangeable strategies sit behind [`ContextSampler`]:
//!
//! - [`PoolSampler`] draws with replacement from a precomputed, reweighted
//!   two-hop neighborhood pool.
//! - [`WalkSampler`] runs a second-order biased random walk whose transition
//!   probabilities depend on both the current and the previous node.
//!
//! Both fill a caller-reusable scratch buffer and return how many context
//! edges they produced (at most `window`). Each call consumes generator
//! draws in a fixed order - one [`Lcg::uniform01`] per drawn sample or walk
//! step - which keeps whole-run reproducibility intact whichever strategy is
//! active.

mod pool;
mod walk;

pub use pool::{PoolEdge, PoolSampler};
pub use walk::{StepClass, WalkSampler};

use crate::rng::Lcg;

/// Upper bound on context length; also the per-node two-hop pool capacity.
pub const MAX_CONTEXT_LEN: usize = 100;

/// One sampled context edge: a destination and the weight it was drawn with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextEdge {
    /// Dense id of the context node.
    pub dest: u32,
    /// Weight of the traversed edge.
    pub weight: f32,
}

/// A strategy producing up to `window` context edges for a source node.
pub trait ContextSampler {
    /// Fill `out` with context edges for `source` and return the count.
    ///
    /// `out` is cleared first; fewer than `window` entries mean the strategy
    /// ran out of graph (e.g. a dead-end walk), never an error.
    fn sample(&self, source: u32, rng: &mut Lcg, window: usize, out: &mut Vec<ContextEdge>)
        -> usize;
}

/// Select an index from a normalized cumulative walk over `weights`.
///
/// Walks the distribution until the running sum passes `x`; rounding residue
/// falls to the last entry. `z` is the precomputed weight sum.
fn pick_cumulative(weights: impl Iterator<Item = f32>, z: f32, x: f32) -> usize {
    let mut cumul = 0.0f32;
    let mut last = 0;
    for (i, w) in weights.enumerate() {
        let norm = w / z;
        if cumul <= x && x < cumul + norm {
            return i;
        }
        cumul += norm;
        last = i;
    }
    last
}
