//! Core graph layer for stride.
//!
//! This crate holds everything the embedding trainer samples from:
//!
//! - [`Lcg`] - the deterministic generator every sampling decision draws from
//! - [`Vocab`] - node key -> dense id index with open-addressing lookup
//! - [`Graph`] - per-node capped adjacency lists built from an edge stream
//! - [`sampler`] - the two context-sampling strategies (two-hop pool and
//!   second-order biased walk) behind one [`sampler::ContextSampler`] interface
//!
//! Determinism is the load-bearing property here: given the same seed and the
//! same inputs, every sampler consumes generator draws in the same order and
//! produces the same contexts, so a full training run is reproducible to the
//! bit. Anything that would break that (thread-local RNGs, hash-map iteration
//! order) is kept out of this crate.
//!
//! # Example
//!
//! ```rust
//! use stride_core::{Graph, Lcg, Vocab};
//! use stride_core::sampler::{ContextSampler, WalkSampler};
//!
//! let text = "A\tB\t1.0\nB\tC\t1.0\nC\tA\t1.0\n";
//! let mut vocab = Vocab::new();
//! stride_core::learn_vocab(text, &mut vocab).unwrap();
//! vocab.finalize(1);
//!
//! let graph = Graph::build(&vocab, text, true, 5000).unwrap();
//! let sampler = WalkSampler::new(&graph, 0.5, 0.5);
//!
//! let mut rng = Lcg::new(123456);
//! let mut ctx = Vec::new();
//! let n = sampler.sample(0, &mut rng, 5, &mut ctx);
//! assert_eq!(n, 5);
//! ```

mod error;
mod graph;
mod rng;
pub mod sampler;
mod vocab;

pub use error::{Error, Result};
pub use graph::{learn_vocab, parse_record, Edge, EdgeOutcome, Graph, GraphStats, MAX_OUT_DEGREE};
pub use rng::Lcg;
pub use vocab::{NodeEntry, Vocab, VOCAB_HASH_SIZE};
