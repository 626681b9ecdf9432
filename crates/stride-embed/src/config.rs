//! Training configuration.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Re-export of the context-length ceiling the window clamps to.
pub use stride_core::sampler::MAX_CONTEXT_LEN;

/// Which context-sampling strategy the trainer runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplingMode {
    /// Precomputed two-hop neighborhood pool.
    Pool,
    /// Second-order biased random walk.
    Walk,
}

/// All knobs of a training run.
///
/// `Default` carries the stock parameters; a JSON file with any subset of
/// the fields can override them via [`TrainConfig::from_path`], and the CLI
/// applies flag overrides on top of that.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// Embedding dimension.
    pub dim: usize,
    /// Starting learning rate.
    pub alpha: f32,
    /// Whether the input edges are directed; if not, reverse edges are added.
    pub directed: bool,
    /// Context window length; clamped to [`MAX_CONTEXT_LEN`] with a warning.
    pub window: usize,
    /// Negative samples per positive example.
    pub negative: usize,
    /// Full passes over the vocabulary.
    pub iterations: usize,
    /// Context sampling strategy.
    pub mode: SamplingMode,
    /// Nodes observed fewer times than this are purged (id 0 excepted).
    pub min_count: u32,
    /// New-direction factor of the biased walk (see `WalkSampler` on the
    /// deliberately reversed naming).
    pub p1: f32,
    /// Return factor of the biased walk.
    pub q1: f32,
    /// One-hop preference weight of the pool sampler.
    pub onehop_pref: f32,
    /// Adjacency list cap per node.
    pub max_out_degree: usize,
    /// Negative-sampling table length.
    pub table_size: usize,
    /// Seed for the sampling/negative-draw stream.
    pub seed: u64,
    /// Verbosity: 0 quiet, 1 warnings, 2 progress, 3 per-node chatter.
    pub trace: u8,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            dim: 128,
            alpha: 0.025,
            directed: true,
            window: 5,
            negative: 10,
            iterations: 10,
            mode: SamplingMode::Walk,
            min_count: 1,
            p1: 0.5,
            q1: 0.5,
            onehop_pref: 0.7,
            max_out_degree: stride_core::MAX_OUT_DEGREE,
            table_size: 100_000_000,
            seed: 123456,
            trace: 2,
        }
    }
}

impl TrainConfig {
    /// Load a config from a JSON file; absent fields keep their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Clamp out-of-range values that are recoverable. Currently only the
    /// window, which cannot exceed the fixed context capacity.
    pub fn clamp(&mut self) {
        if self.window > MAX_CONTEXT_LEN {
            if self.trace > 0 {
                eprintln!(
                    "window {} too large, clamping to {}",
                    self.window, MAX_CONTEXT_LEN
                );
            }
            self.window = MAX_CONTEXT_LEN;
        }
    }
}
