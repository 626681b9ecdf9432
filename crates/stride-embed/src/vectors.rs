//! Pre-trained vector files.
//!
//! Text format, one vector per line: a node key followed by its components,
//! whitespace-separated. A leading `count dim` header line (exactly two
//! integer fields) is tolerated and skipped, so files written by word2vec
//! tooling and files written by [`crate::TrainedModel::write_vectors`] both
//! load. File order is preserved: pass-through of unmatched vectors must be
//! deterministic for byte-identical reruns.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// An ordered set of key -> fixed-length vector entries.
#[derive(Debug, Clone)]
pub struct WordVectors {
    keys: Vec<String>,
    vecs: Vec<Vec<f32>>,
    index: HashMap<String, usize>,
    dim: usize,
}

impl WordVectors {
    /// Load a vector file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_text(&fs::read_to_string(path)?)
    }

    /// Parse vector text. The dimension is fixed by the first vector line;
    /// any later line with a different arity is fatal.
    pub fn from_text(text: &str) -> Result<Self> {
        let mut keys = Vec::new();
        let mut vecs: Vec<Vec<f32>> = Vec::new();
        let mut index = HashMap::new();
        let mut dim = 0usize;

        for (idx, line) in text.lines().enumerate() {
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }
            let mut fields = line.split_whitespace();
            let Some(key) = fields.next() else {
                continue;
            };
            let rest: Vec<&str> = fields.collect();

            // Header: first content line, exactly two integer fields.
            if keys.is_empty()
                && rest.len() == 1
                && key.parse::<u64>().is_ok()
                && rest[0].parse::<u64>().is_ok()
            {
                continue;
            }

            let mut vec = Vec::with_capacity(rest.len());
            for field in &rest {
                let value = field.parse::<f32>().map_err(|_| Error::MalformedVector {
                    line: idx + 1,
                    reason: format!("component '{field}' is not a number"),
                })?;
                vec.push(value);
            }
            if vec.is_empty() {
                return Err(Error::MalformedVector {
                    line: idx + 1,
                    reason: "no vector components".to_owned(),
                });
            }
            if dim == 0 {
                dim = vec.len();
            } else if vec.len() != dim {
                return Err(Error::MalformedVector {
                    line: idx + 1,
                    reason: format!("{} components, expected {dim}", vec.len()),
                });
            }
            index.insert(key.to_owned(), keys.len());
            keys.push(key.to_owned());
            vecs.push(vec);
        }

        Ok(Self {
            keys,
            vecs,
            index,
            dim,
        })
    }

    /// Vector dimension (0 when empty).
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of vectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the file held no vectors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Vector for a key, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[f32]> {
        self.index.get(key).map(|&i| self.vecs[i].as_slice())
    }

    /// Iterate (key, vector) pairs in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f32])> {
        self.keys
            .iter()
            .map(String::as_str)
            .zip(self.vecs.iter().map(Vec::as_slice))
    }
}
