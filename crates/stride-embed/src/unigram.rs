//! Negative-sampling table: a discrete distribution over node ids.

use stride_core::Graph;

/// Exponent flattening the degree distribution. Smooths between raw degree
/// (over-samples hubs) and uniform (over-samples leaves), as in word2vec.
const POWER: f64 = 0.75;

/// Fixed-length table whose entry frequencies approximate each node's
/// `out_degree^0.75` share. Built once before training, immutable after.
#[derive(Debug, Clone)]
pub struct UnigramTable {
    table: Vec<u32>,
}

impl UnigramTable {
    /// Fill a table of `table_size` slots from the graph's degrees.
    ///
    /// Walks ids in order, assigning slots to the current id until the
    /// filled fraction passes its cumulative weight share; the final id is
    /// clamped into range. The graph must have at least one node.
    #[must_use]
    pub fn build(graph: &Graph, table_size: usize) -> Self {
        let n = graph.node_count();
        assert!(n > 0, "unigram table over an empty graph");

        let z: f64 = (0..n)
            .map(|id| (graph.out_degree(id as u32) as f64).powf(POWER))
            .sum();

        let mut table = vec![0u32; table_size];
        if z == 0.0 {
            // Degenerate graph with no edges at all; every slot points at 0.
            return Self { table };
        }

        let mut id = 0usize;
        let mut share = (graph.out_degree(0) as f64).powf(POWER) / z;
        for (slot, entry) in table.iter_mut().enumerate() {
            *entry = id as u32;
            if slot as f64 / table_size as f64 > share {
                id += 1;
                if id < n {
                    share += (graph.out_degree(id as u32) as f64).powf(POWER) / z;
                }
            }
            if id >= n {
                id = n - 1;
            }
        }
        Self { table }
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the table has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Draw a candidate id from a generator state: the high bits index the
    /// table modulo its length.
    #[must_use]
    pub fn draw(&self, state: u64) -> u32 {
        self.table[((state >> 16) % self.table.len() as u64) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stride_core::{learn_vocab, Vocab, MAX_OUT_DEGREE};

    fn graph_from(text: &str) -> Graph {
        let mut vocab = Vocab::new();
        learn_vocab(text, &mut vocab).unwrap();
        vocab.finalize(1);
        Graph::build(&vocab, text, true, MAX_OUT_DEGREE).unwrap()
    }

    #[test]
    fn frequencies_approach_degree_power_shares() {
        // hub has out-degree 4, mid 2, leaf 1; spokes have 0.
        let text = "hub\ta\nhub\tb\nhub\tc\nhub\td\nmid\ta\nmid\tb\nleaf\ta\n";
        let graph = graph_from(text);
        let table = UnigramTable::build(&graph, 100_000);

        let mut counts = vec![0u64; graph.node_count()];
        for slot in 0..table.len() {
            // Exercise the table directly rather than through draw(); the
            // distribution is over slots, not generator states.
            counts[table.table[slot] as usize] += 1;
        }

        let z: f64 = (0..graph.node_count())
            .map(|id| (graph.out_degree(id as u32) as f64).powf(0.75))
            .sum();
        for id in 0..graph.node_count() {
            let expected = (graph.out_degree(id as u32) as f64).powf(0.75) / z;
            let observed = counts[id] as f64 / table.len() as f64;
            assert!(
                (observed - expected).abs() < 0.01,
                "id {id}: observed {observed:.4}, expected {expected:.4}"
            );
        }
    }

    #[test]
    fn larger_tables_tighten_the_approximation() {
        let text = "a\tb\na\tc\nb\tc\n";
        let graph = graph_from(text);

        let err_of = |size: usize| {
            let table = UnigramTable::build(&graph, size);
            let mut counts = vec![0u64; graph.node_count()];
            for slot in 0..table.len() {
                counts[table.table[slot] as usize] += 1;
            }
            let z: f64 = (0..graph.node_count())
                .map(|id| (graph.out_degree(id as u32) as f64).powf(0.75))
                .sum();
            (0..graph.node_count())
                .map(|id| {
                    let expected = (graph.out_degree(id as u32) as f64).powf(0.75) / z;
                    (counts[id] as f64 / size as f64 - expected).abs()
                })
                .fold(0.0f64, f64::max)
        };

        assert!(err_of(100_000) <= err_of(100));
    }

    #[test]
    fn zero_degree_nodes_get_no_slots() {
        let text = "a\tb\n";
        let graph = graph_from(text);
        let table = UnigramTable::build(&graph, 1000);
        // "b" has out-degree 0; every slot belongs to "a"'s id.
        assert!(table.table.iter().all(|&id| graph.out_degree(id) > 0));
    }

    #[test]
    fn draw_maps_states_into_range() {
        let text = "a\tb\nb\ta\n";
        let graph = graph_from(text);
        let table = UnigramTable::build(&graph, 997);
        let mut rng = stride_core::Lcg::new(123456);
        for _ in 0..100 {
            let id = table.draw(rng.next());
            assert!((id as usize) < graph.node_count());
        }
    }
}
