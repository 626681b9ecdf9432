//! Second-order biased random walks.

use super::{pick_cumulative, ContextEdge, ContextSampler};
use crate::graph::Graph;
use crate::rng::Lcg;

/// How a candidate destination relates to the walk's previous node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepClass {
    /// The destination is the previous node itself.
    Return,
    /// The destination is one of the previous node's direct neighbors.
    CommonNeighbor,
    /// The destination is neither: a genuinely new direction.
    NewDirection,
}

/// Context sampling by second-order biased random walk.
///
/// Each step weighs the current node's outgoing edges by where they lead
/// relative to the previous node: back to it (x `q1`), to one of its
/// neighbors (x 1), or somewhere new (x `p1`).
///
/// Note the factor assignment: `q1` scales the *return* step and `p1` the
/// *new-direction* step, which is the reverse of the published node2vec
/// naming (return parameter p, in-out parameter q). The assignment is
/// deliberate and models trained under it depend on it - do not swap the
/// factors to match the paper. `walk_from_a_to_b_classifies_triangle`
/// pins the classification.
#[derive(Debug, Clone, Copy)]
pub struct WalkSampler<'a> {
    graph: &'a Graph,
    p1: f32,
    q1: f32,
}

impl<'a> WalkSampler<'a> {
    /// Create a walker over `graph` with the given bias factors.
    #[must_use]
    pub const fn new(graph: &'a Graph, p1: f32, q1: f32) -> Self {
        Self { graph, p1, q1 }
    }

    /// Classify a candidate destination against the walk's previous node.
    #[must_use]
    pub fn classify(&self, prev: u32, dest: u32) -> StepClass {
        if dest == prev {
            StepClass::Return
        } else if self.graph.is_neighbor(prev, dest) {
            StepClass::CommonNeighbor
        } else {
            StepClass::NewDirection
        }
    }

    fn bias(&self, prev: u32, dest: u32) -> f32 {
        match self.classify(prev, dest) {
            StepClass::Return => self.q1,
            StepClass::CommonNeighbor => 1.0,
            StepClass::NewDirection => self.p1,
        }
    }
}

impl ContextSampler for WalkSampler<'_> {
    /// Walk up to `window` steps from `source`, starting with
    /// (previous, current) = (source, source).
    ///
    /// A current node with no outgoing edges ends the walk early: the call
    /// returns however many context edges were produced by then. (The
    /// alternative - re-emitting the last edge - would let an absorbing node
    /// dominate every window.)
    fn sample(
        &self,
        source: u32,
        rng: &mut Lcg,
        window: usize,
        out: &mut Vec<ContextEdge>,
    ) -> usize {
        out.clear();
        let mut prev = source;
        let mut current = source;
        while out.len() < window {
            let edges = self.graph.out_edges(current);
            if edges.is_empty() {
                break;
            }
            let z: f32 = edges
                .iter()
                .map(|e| e.weight * self.bias(prev, e.dest))
                .sum();
            let x = rng.uniform01();
            let chosen = pick_cumulative(
                edges.iter().map(|e| e.weight * self.bias(prev, e.dest)),
                z,
                x,
            );
            let edge = edges[chosen];
            out.push(ContextEdge {
                dest: edge.dest,
                weight: edge.weight,
            });
            prev = current;
            current = edge.dest;
        }
        out.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::MAX_OUT_DEGREE;
    use crate::vocab::Vocab;

    fn build(text: &str) -> (Vocab, Graph) {
        let mut vocab = Vocab::new();
        crate::graph::learn_vocab(text, &mut vocab).unwrap();
        vocab.finalize(1);
        let graph = Graph::build(&vocab, text, true, MAX_OUT_DEGREE).unwrap();
        (vocab, graph)
    }

    #[test]
    fn walk_from_a_to_b_classifies_triangle() {
        // Undirected triangle A-B-C-A, expressed as explicit directed edges.
        let text = "A\tB\nB\tA\nB\tC\nC\tB\nC\tA\nA\tC\n";
        let (vocab, graph) = build(text);
        let a = vocab.search("A").unwrap();
        let c = vocab.search("C").unwrap();

        // Standing at B after arriving from A: A is a return step, C is a
        // common neighbor of A, not a new direction. Holds for any p1/q1.
        for (p1, q1) in [(0.5, 0.5), (2.0, 0.25), (1.0, 1.0)] {
            let sampler = WalkSampler::new(&graph, p1, q1);
            assert_eq!(sampler.classify(a, a), StepClass::Return);
            assert_eq!(sampler.classify(a, c), StepClass::CommonNeighbor);
        }
    }

    #[test]
    fn new_direction_requires_no_edge_from_prev() {
        // Path A -> B -> C with no A -> C edge.
        let text = "A\tB\nB\tC\n";
        let (vocab, graph) = build(text);
        let a = vocab.search("A").unwrap();
        let c = vocab.search("C").unwrap();
        let sampler = WalkSampler::new(&graph, 0.5, 0.5);
        assert_eq!(sampler.classify(a, c), StepClass::NewDirection);
    }

    #[test]
    fn cycle_walk_fills_the_window() {
        let text = "A\tB\nB\tC\nC\tD\nD\tA\n";
        let (vocab, graph) = build(text);
        let sampler = WalkSampler::new(&graph, 1.0, 1.0);

        let a = vocab.search("A").unwrap();
        let mut rng = Lcg::new(123456);
        let mut ctx = Vec::new();
        let n = sampler.sample(a, &mut rng, 5, &mut ctx);
        assert_eq!(n, 5);
        // Out-degree is 1 everywhere, so the walk is forced around the cycle.
        let expected: Vec<u32> = ["B", "C", "D", "A", "B"]
            .iter()
            .map(|k| vocab.search(k).unwrap())
            .collect();
        let got: Vec<u32> = ctx.iter().map(|e| e.dest).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn dead_end_stops_walk() {
        // A -> B -> C and C has no outgoing edges: the walk ends after two
        // steps, pinning the early-stop choice for degenerate walks.
        let text = "A\tB\nB\tC\n";
        let (vocab, graph) = build(text);
        let sampler = WalkSampler::new(&graph, 0.5, 0.5);

        let a = vocab.search("A").unwrap();
        let mut rng = Lcg::new(123456);
        let mut ctx = Vec::new();
        let n = sampler.sample(a, &mut rng, 10, &mut ctx);
        assert_eq!(n, 2);
        assert_eq!(vocab.key(ctx[0].dest), "B");
        assert_eq!(vocab.key(ctx[1].dest), "C");
    }

    #[test]
    fn source_with_no_edges_produces_nothing() {
        let text = "A\tB\n";
        let (vocab, graph) = build(text);
        let sampler = WalkSampler::new(&graph, 0.5, 0.5);

        let b = vocab.search("B").unwrap();
        let mut rng = Lcg::new(123456);
        let mut ctx = Vec::new();
        assert_eq!(sampler.sample(b, &mut rng, 5, &mut ctx), 0);
    }

    #[test]
    fn each_step_consumes_exactly_one_draw() {
        let text = "A\tB\nB\tC\nC\tD\nD\tA\n";
        let (vocab, graph) = build(text);
        let sampler = WalkSampler::new(&graph, 1.0, 1.0);

        let a = vocab.search("A").unwrap();
        let mut rng = Lcg::new(123456);
        let mut ctx = Vec::new();
        sampler.sample(a, &mut rng, 3, &mut ctx);

        let mut reference = Lcg::new(123456);
        for _ in 0..3 {
            reference.uniform01();
        }
        assert_eq!(rng.state(), reference.state());
    }
}
