//! Embedding training for stride.
//!
//! Drives the full node2vec pipeline over the graph layer in `stride-core`:
//! vocabulary and graph construction, the negative-sampling and sigmoid
//! tables, the skip-gram SGD sweeps, and the final vector output. Also hosts
//! the trainer's optional collaborators - a community-overlap oracle that can
//! veto positive pairs and a pre-trained vector file that seeds the input
//! matrix - plus a post-hoc k-means clusterer over written vectors.
//!
//! The pipeline is a strictly forward state machine (vocabulary -> graph ->
//! tables -> sweeps -> vectors); nothing is resumable mid-iteration, and a
//! whole run is reproducible to the bit for a fixed seed and input.
//!
//! # Example
//!
//! ```rust
//! use stride_embed::{SamplingMode, TrainConfig, Trainer};
//!
//! let config = TrainConfig {
//!     dim: 8,
//!     window: 4,
//!     negative: 2,
//!     iterations: 1,
//!     table_size: 10_000,
//!     mode: SamplingMode::Walk,
//!     trace: 0,
//!     ..TrainConfig::default()
//! };
//! let model = Trainer::new(config)
//!     .train("A\tB\t1.0\nB\tC\t1.0\nC\tA\t1.0\n")
//!     .unwrap();
//! assert_eq!(model.vocab().len(), 3);
//!
//! let mut out = Vec::new();
//! model.write_vectors(&mut out).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap().lines().count(), 3);
//! ```

mod community;
mod config;
mod error;
mod kmeans;
mod sigmoid;
mod trainer;
mod unigram;
mod vectors;

pub use community::Communities;
pub use config::{SamplingMode, TrainConfig, MAX_CONTEXT_LEN};
pub use error::{Error, Result};
pub use kmeans::{cluster, write_clusters, Clustering, KMeansConfig};
pub use sigmoid::{SigmoidTable, EXP_TABLE_SIZE, MAX_EXP};
pub use trainer::{TrainedModel, Trainer};
pub use unigram::UnigramTable;
pub use vectors::WordVectors;
