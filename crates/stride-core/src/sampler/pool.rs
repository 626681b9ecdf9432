//! Precomputed two-hop neighborhood pools.

use super::{pick_cumulative, ContextEdge, ContextSampler, MAX_CONTEXT_LEN};
use crate::graph::Graph;
use crate::rng::Lcg;

/// An edge kept in a node's precomputed pool, with its reweighted draw weight
/// and a marker for whether it was reached in one hop or two.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolEdge {
    /// Dense id of the pooled node.
    pub dest: u32,
    /// Draw weight after the one-hop/two-hop preference rescale.
    pub weight: f32,
    /// True if the node was reached through a one-hop neighbor.
    pub two_hop: bool,
}

/// Context sampling from per-node two-hop neighborhood pools.
///
/// The pools are computed once, up front, for every node: first the node's
/// direct destinations (one-hop), then the destinations reachable through
/// them (two-hop), each node admitted at most once and the source never
/// admitted. One-hop weights are scaled by `onehop_pref`, two-hop weights by
/// `1 - onehop_pref`. Sampling then draws `window` independent entries with
/// replacement from the pool's normalized weights.
#[derive(Debug, Clone)]
pub struct PoolSampler {
    pools: Vec<Vec<PoolEdge>>,
}

impl PoolSampler {
    /// Precompute the pool of every node in the graph.
    #[must_use]
    pub fn precompute(graph: &Graph, onehop_pref: f32) -> Self {
        let mut visited = vec![false; graph.node_count()];
        let pools = (0..graph.node_count() as u32)
            .map(|src| Self::pool_for(graph, src, onehop_pref, &mut visited))
            .collect();
        Self { pools }
    }

    /// Collect and reweight one node's pool. `visited` is scratch owned by
    /// the caller; it is left fully cleared on return.
    fn pool_for(graph: &Graph, src: u32, onehop_pref: f32, visited: &mut [bool]) -> Vec<PoolEdge> {
        let mut pool: Vec<PoolEdge> = Vec::new();

        // Marking the source first keeps it (and self-loops) out of the pool.
        visited[src as usize] = true;
        for edge in graph.out_edges(src) {
            if pool.len() >= MAX_CONTEXT_LEN {
                break;
            }
            if !visited[edge.dest as usize] {
                visited[edge.dest as usize] = true;
                pool.push(PoolEdge {
                    dest: edge.dest,
                    weight: edge.weight,
                    two_hop: false,
                });
            }
        }

        let one_hops = pool.len();
        for hop in 0..one_hops {
            let via = pool[hop].dest;
            for edge in graph.out_edges(via) {
                if pool.len() >= MAX_CONTEXT_LEN {
                    break;
                }
                if !visited[edge.dest as usize] && edge.dest != src {
                    visited[edge.dest as usize] = true;
                    pool.push(PoolEdge {
                        dest: edge.dest,
                        weight: edge.weight,
                        two_hop: true,
                    });
                }
            }
        }

        for entry in &mut pool {
            entry.weight *= if entry.two_hop {
                1.0 - onehop_pref
            } else {
                onehop_pref
            };
        }

        visited[src as usize] = false;
        for entry in &pool {
            visited[entry.dest as usize] = false;
        }
        pool
    }

    /// Precomputed pool of a node, mainly for inspection in tests.
    #[must_use]
    pub fn pool(&self, id: u32) -> &[PoolEdge] {
        &self.pools[id as usize]
    }
}

impl ContextSampler for PoolSampler {
    fn sample(
        &self,
        source: u32,
        rng: &mut Lcg,
        window: usize,
        out: &mut Vec<ContextEdge>,
    ) -> usize {
        out.clear();
        let pool = &self.pools[source as usize];
        if pool.is_empty() {
            return 0;
        }
        let z: f32 = pool.iter().map(|e| e.weight).sum();
        for _ in 0..window {
            let x = rng.uniform01();
            let chosen = pick_cumulative(pool.iter().map(|e| e.weight), z, x);
            out.push(ContextEdge {
                dest: pool[chosen].dest,
                weight: pool[chosen].weight,
            });
        }
        out.len()
    }
}
