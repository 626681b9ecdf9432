//! Skip-gram trainer with negative sampling.
//!
//! [`Trainer::train`] runs the whole pipeline as one forward pass:
//! vocabulary -> graph -> samplers and tables -> SGD sweeps -> trained model.
//! Two flat matrices are learned: `syn0` (the input vectors that get
//! written out) and `syn1neg` (the output vectors negative sampling scores
//! against). For every sampled context edge the *context node's* input row
//! is pulled toward the source's output row and pushed away from drawn
//! negatives, with the per-context error accumulated and applied once after
//! the negative loop.
//!
//! Reproducibility: the sampling/negative stream is re-seeded from the
//! configured seed at the start of every sweep, and matrix initialization
//! draws from its own stream seeded with 1. Both streams are [`Lcg`]s, so a
//! run is a pure function of (config, inputs).

use crate::community::Communities;
use crate::config::{SamplingMode, TrainConfig};
use crate::error::{Error, Result};
use crate::sigmoid::SigmoidTable;
use crate::unigram::UnigramTable;
use crate::vectors::WordVectors;
use std::io::Write;
use stride_core::sampler::{ContextEdge, ContextSampler, PoolSampler, WalkSampler};
use stride_core::{learn_vocab, Graph, GraphStats, Lcg, Vocab};

/// Drives vocabulary construction, table precomputation, and the SGD sweeps.
pub struct Trainer {
    config: TrainConfig,
    communities: Option<Communities>,
    pretrained: Option<WordVectors>,
}

/// The result of a training run: the vocabulary and its input vectors, plus
/// any pre-trained vectors that matched no trained node.
pub struct TrainedModel {
    vocab: Vocab,
    dim: usize,
    syn0: Vec<f32>,
    leftover: Vec<(String, Vec<f32>)>,
    graph_stats: GraphStats,
    train_nodes: u64,
}

impl Trainer {
    /// Create a trainer; recoverable config violations are clamped here.
    #[must_use]
    pub fn new(mut config: TrainConfig) -> Self {
        config.clamp();
        Self {
            config,
            communities: None,
            pretrained: None,
        }
    }

    /// Attach a community oracle; positive pairs whose endpoints share no
    /// community train with a negative label instead.
    #[must_use]
    pub fn with_communities(mut self, communities: Communities) -> Self {
        self.communities = Some(communities);
        self
    }

    /// Attach pre-trained vectors seeding the input matrix. A dimension
    /// mismatch with the configured embedding size is fatal here, before
    /// anything is built.
    pub fn with_pretrained(mut self, pretrained: WordVectors) -> Result<Self> {
        if !pretrained.is_empty() && pretrained.dim() != self.config.dim {
            return Err(Error::DimensionMismatch {
                expected: self.config.dim,
                found: pretrained.dim(),
            });
        }
        self.pretrained = Some(pretrained);
        Ok(self)
    }

    /// Run the full pipeline over a tab-separated edge stream.
    pub fn train(&self, edge_text: &str) -> Result<TrainedModel> {
        let cfg = &self.config;

        // Vocabulary pass.
        let mut vocab = Vocab::new();
        learn_vocab(edge_text, &mut vocab)?;
        let train_nodes = vocab.finalize(cfg.min_count);
        if vocab.is_empty() {
            return Err(Error::EmptyVocabulary);
        }
        if cfg.trace > 1 {
            eprintln!("#nodes: {} (train count {})", vocab.len(), train_nodes);
        }

        // Graph pass.
        let graph = Graph::build(&vocab, edge_text, cfg.directed, cfg.max_out_degree)?;
        let graph_stats = graph.stats();
        if cfg.trace > 0 {
            if graph_stats.oov_skipped > 0 {
                eprintln!(
                    "skipped {} edge(s) with out-of-vocabulary endpoints",
                    graph_stats.oov_skipped
                );
            }
            if graph_stats.capacity_dropped > 0 {
                eprintln!(
                    "dropped {} edge(s) past the out-degree cap of {}",
                    graph_stats.capacity_dropped, cfg.max_out_degree
                );
            }
        }

        // Context sampler; the pool variant precomputes its neighborhoods
        // here, once, before any sweep.
        let pool;
        let walk;
        let sampler: &dyn ContextSampler = match cfg.mode {
            SamplingMode::Pool => {
                pool = PoolSampler::precompute(&graph, cfg.onehop_pref);
                &pool
            }
            SamplingMode::Walk => {
                walk = WalkSampler::new(&graph, cfg.p1, cfg.q1);
                &walk
            }
        };

        // Matrices and tables.
        let dim = cfg.dim;
        let mut syn0 = vec![0.0f32; vocab.len() * dim];
        let mut syn1neg = vec![0.0f32; vocab.len() * dim];
        self.init_input_matrix(&vocab, &mut syn0);

        let table = UnigramTable::build(&graph, cfg.table_size);
        let sigmoid = SigmoidTable::new();
        if cfg.trace > 1 {
            eprintln!("unigram table initialized ({} slots)", table.len());
        }

        // Sweeps.
        let mut ctx: Vec<ContextEdge> = Vec::with_capacity(cfg.window);
        let mut err = vec![0.0f32; dim];
        for iteration in 0..cfg.iterations {
            let mut rng = Lcg::new(cfg.seed);
            for word in 0..vocab.len() as u32 {
                let count = sampler.sample(word, &mut rng, cfg.window, &mut ctx);
                for i in 0..count {
                    let edge = ctx[i];
                    let positive = match &self.communities {
                        Some(c) => c.overlap(vocab.key(word), vocab.key(edge.dest)),
                        None => true,
                    };
                    negative_sampling_update(
                        edge.dest,
                        word,
                        positive,
                        cfg,
                        &table,
                        &sigmoid,
                        vocab.len(),
                        &mut rng,
                        &mut syn0,
                        &mut syn1neg,
                        &mut err,
                    );
                }
            }
            if cfg.trace > 1 {
                eprintln!("iteration {}/{} done", iteration + 1, cfg.iterations);
            }
        }

        // Pre-trained vectors that matched no trained node pass through to
        // the output, in file order.
        let leftover = match &self.pretrained {
            Some(pt) => pt
                .iter()
                .filter(|(key, _)| vocab.search(key).is_none())
                .map(|(key, vec)| (key.to_owned(), vec.to_vec()))
                .collect(),
            None => Vec::new(),
        };

        Ok(TrainedModel {
            vocab,
            dim,
            syn0,
            leftover,
            graph_stats,
            train_nodes,
        })
    }

    /// Seed `syn0`: rows matched by pre-trained vectors are copied verbatim
    /// (consuming no draws); every other row takes `dim` draws from a fresh
    /// stream seeded with 1.
    fn init_input_matrix(&self, vocab: &Vocab, syn0: &mut [f32]) {
        let dim = self.config.dim;
        let mut rng = Lcg::new(1);
        for id in 0..vocab.len() {
            let row = &mut syn0[id * dim..(id + 1) * dim];
            let seeded = self
                .pretrained
                .as_ref()
                .and_then(|pt| pt.get(vocab.key(id as u32)));
            match seeded {
                Some(vec) => row.copy_from_slice(vec),
                None => {
                    for slot in row {
                        *slot = (rng.uniform01() - 0.5) / dim as f32;
                    }
                }
            }
        }
    }
}

/// One negative-sampling update for a sampled (source `word`, context
/// `dest`) pair: slot 0 is the positive example (label 0 if the community
/// oracle vetoed it), the remaining slots draw negatives from the unigram
/// table. A drawn candidate equal to the source is discarded without a
/// replacement draw.
#[allow(clippy::too_many_arguments)]
fn negative_sampling_update(
    dest: u32,
    word: u32,
    positive: bool,
    cfg: &TrainConfig,
    table: &UnigramTable,
    sigmoid: &SigmoidTable,
    vocab_size: usize,
    rng: &mut Lcg,
    syn0: &mut [f32],
    syn1neg: &mut [f32],
    err: &mut [f32],
) {
    let dim = cfg.dim;
    let l1 = dest as usize * dim;
    err.fill(0.0);

    for d in 0..=cfg.negative {
        let (target, label) = if d == 0 {
            (word as usize, if positive { 1.0f32 } else { 0.0 })
        } else {
            let state = rng.next();
            let mut candidate = table.draw(state) as usize;
            // Id 0 is reserved; remap it pseudo-randomly off the same state.
            if candidate == 0 && vocab_size > 1 {
                candidate = (state % (vocab_size as u64 - 1)) as usize + 1;
            }
            if candidate == word as usize {
                continue;
            }
            (candidate, 0.0f32)
        };

        let l2 = target * dim;
        let mut dot = 0.0f32;
        for c in 0..dim {
            dot += syn0[l1 + c] * syn1neg[l2 + c];
        }
        let g = sigmoid.gradient(dot, label, cfg.alpha);
        for c in 0..dim {
            err[c] += g * syn1neg[l2 + c];
        }
        for c in 0..dim {
            syn1neg[l2 + c] += g * syn0[l1 + c];
        }
    }

    for c in 0..dim {
        syn0[l1 + c] += err[c];
    }
}

impl TrainedModel {
    /// The finalized vocabulary.
    #[must_use]
    pub fn vocab(&self) -> &Vocab {
        &self.vocab
    }

    /// Embedding dimension.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Input vector of a trained node.
    #[must_use]
    pub fn embedding(&self, id: u32) -> &[f32] {
        &self.syn0[id as usize * self.dim..(id as usize + 1) * self.dim]
    }

    /// Counters from the graph build.
    #[must_use]
    pub fn graph_stats(&self) -> GraphStats {
        self.graph_stats
    }

    /// Sum of surviving vocabulary frequencies.
    #[must_use]
    pub fn train_nodes(&self) -> u64 {
        self.train_nodes
    }

    /// Write the vectors: one line per trained node in id order (key then
    /// `dim` floats, 6 decimals, every token followed by a space), then one
    /// line per unmatched pre-trained vector. No header.
    pub fn write_vectors<W: Write>(&self, mut out: W) -> Result<()> {
        for id in 0..self.vocab.len() as u32 {
            write!(out, "{} ", self.vocab.key(id))?;
            for value in self.embedding(id) {
                write!(out, "{value:.6} ")?;
            }
            writeln!(out)?;
        }
        for (key, vec) in &self.leftover {
            write!(out, "{key} ")?;
            for value in vec {
                write!(out, "{value:.6} ")?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CYCLE: &str = "A\tB\t1.0\nB\tC\t1.0\nC\tD\t1.0\nD\tA\t1.0\n";

    fn small_config() -> TrainConfig {
        TrainConfig {
            dim: 4,
            window: 5,
            negative: 2,
            iterations: 1,
            p1: 1.0,
            q1: 1.0,
            table_size: 10_000,
            trace: 0,
            ..TrainConfig::default()
        }
    }

    fn rendered(model: &TrainedModel) -> String {
        let mut out = Vec::new();
        model.write_vectors(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn cycle_graph_trains_and_writes_four_rows() {
        let model = Trainer::new(small_config()).train(CYCLE).unwrap();
        assert_eq!(model.vocab().len(), 4);
        // Every endpoint is observed twice around the cycle.
        assert_eq!(model.train_nodes(), 8);

        let text = rendered(&model);
        assert_eq!(text.lines().count(), 4);
        for line in text.lines() {
            let fields: Vec<&str> = line.split_whitespace().collect();
            assert_eq!(fields.len(), 5, "key plus 4 floats: {line}");
            for value in &fields[1..] {
                value.parse::<f32>().unwrap();
            }
        }
    }

    #[test]
    fn identical_runs_produce_byte_identical_vectors() {
        let first = rendered(&Trainer::new(small_config()).train(CYCLE).unwrap());
        let second = rendered(&Trainer::new(small_config()).train(CYCLE).unwrap());
        assert_eq!(first, second);
    }

    #[test]
    fn pool_mode_trains_too() {
        let config = TrainConfig {
            mode: SamplingMode::Pool,
            ..small_config()
        };
        let model = Trainer::new(config).train(CYCLE).unwrap();
        assert_eq!(rendered(&model).lines().count(), 4);
    }

    #[test]
    fn training_moves_the_initialized_rows() {
        let untrained = Trainer::new(TrainConfig {
            iterations: 0,
            ..small_config()
        })
        .train(CYCLE)
        .unwrap();
        let trained = Trainer::new(small_config()).train(CYCLE).unwrap();
        assert_ne!(untrained.embedding(0), trained.embedding(0));
    }

    #[test]
    fn community_veto_changes_the_outcome() {
        // Every node in its own community: no pair overlaps, every positive
        // slot trains with label 0.
        let vetoing = Communities::from_text("A\nB\nC\nD\n");
        let vetoed = Trainer::new(small_config())
            .with_communities(vetoing)
            .train(CYCLE)
            .unwrap();
        let free = Trainer::new(small_config()).train(CYCLE).unwrap();
        assert_ne!(rendered(&vetoed), rendered(&free));

        // All nodes in one community: overlap always holds, so the oracle
        // changes nothing.
        let permissive = Communities::from_text("A B C D\n");
        let allowed = Trainer::new(small_config())
            .with_communities(permissive)
            .train(CYCLE)
            .unwrap();
        assert_eq!(rendered(&allowed), rendered(&free));
    }

    #[test]
    fn pretrained_rows_seed_the_input_matrix() {
        let pretrained =
            WordVectors::from_text("A 0.1 0.2 0.3 0.4\nghost 0.9 0.9 0.9 0.9\n").unwrap();
        let model = Trainer::new(TrainConfig {
            iterations: 0,
            ..small_config()
        })
        .with_pretrained(pretrained)
        .unwrap()
        .train(CYCLE)
        .unwrap();

        let a = model.vocab().search("A").unwrap();
        assert_eq!(model.embedding(a), &[0.1f32, 0.2, 0.3, 0.4][..]);

        // The unmatched vector passes through after the trained rows.
        let text = rendered(&model);
        assert_eq!(text.lines().count(), 5);
        let last = text.lines().last().unwrap();
        assert!(last.starts_with("ghost "));
        assert!(last.contains("0.900000"));
    }

    #[test]
    fn pretrained_dimension_mismatch_is_fatal_before_training() {
        let pretrained = WordVectors::from_text("A 0.1 0.2\n").unwrap();
        let err = Trainer::new(small_config()).with_pretrained(pretrained);
        assert!(matches!(
            err,
            Err(Error::DimensionMismatch {
                expected: 4,
                found: 2
            })
        ));
    }

    #[test]
    fn empty_edge_stream_is_fatal() {
        let err = Trainer::new(small_config()).train("");
        assert!(matches!(err, Err(Error::EmptyVocabulary)));
    }

    #[test]
    fn min_count_prunes_and_their_edges_are_skipped() {
        // "loner" appears once; with min_count 2 it is purged and its edge
        // records count as out-of-vocabulary skips.
        let text = "A\tB\nB\tA\nA\tB\nloner\tA\n";
        let config = TrainConfig {
            min_count: 2,
            ..small_config()
        };
        let model = Trainer::new(config).train(text).unwrap();
        assert_eq!(model.vocab().len(), 2);
        assert_eq!(model.graph_stats().oov_skipped, 1);
    }
}
