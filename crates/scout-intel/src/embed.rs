//! Embedding capability and semantic index.
//!
//! Embeddings are a capability, not an identity: retrieval asks for an
//! encoder and an index, and a missing capability degrades to the lexical
//! path with a stable ranking contract. The default encoder is a
//! deterministic token-hash projection; it needs no model download and
//! produces the same vector for the same text on every run.

use sha2::{Digest, Sha256};

/// Text-to-vector capability.
pub trait TextEncoder: Send + Sync {
    fn encode(&self, text: &str) -> Vec<f32>;
    fn dim(&self) -> usize;
}

/// Deterministic hashed-projection encoder.
///
/// Each whitespace token hashes into a bucket with a sign; the vector is
/// L2-normalized. Cheap, dependency-free, and stable across processes.
pub struct HashEncoder {
    dim: usize,
}

impl Default for HashEncoder {
    fn default() -> Self {
        Self { dim: 256 }
    }
}

impl HashEncoder {
    pub fn new(dim: usize) -> Self {
        assert!(dim > 0, "encoder dimension must be positive");
        Self { dim }
    }
}

impl TextEncoder for HashEncoder {
    fn encode(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; self.dim];
        for token in text
            .to_lowercase()
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let mut hasher = Sha256::new();
            hasher.update(token.as_bytes());
            let digest = hasher.finalize();
            let idx = (u16::from_be_bytes([digest[0], digest[1]]) as usize) % self.dim;
            let sign = if digest[2] % 2 == 0 { 1.0 } else { -1.0 };
            v[idx] += sign;
        }
        normalize(&mut v);
        v
    }

    fn dim(&self) -> usize {
        self.dim
    }
}

fn normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// In-memory cosine index over labeled vectors.
///
/// Vectors are normalized at build time, so a query is one dot product per
/// entry. Schema-scale corpora (hundreds to low thousands of labels) keep
/// exact search cheap; anything larger can swap in an ANN behind the same
/// interface.
#[derive(Default)]
pub struct SemanticIndex {
    labels: Vec<String>,
    vectors: Vec<Vec<f32>>,
}

impl SemanticIndex {
    pub fn build(labels: Vec<String>, mut vectors: Vec<Vec<f32>>) -> Self {
        assert_eq!(labels.len(), vectors.len(), "labels and vectors must align");
        for v in &mut vectors {
            normalize(v);
        }
        Self { labels, vectors }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Top-k labels by cosine similarity, ties broken by label for
    /// deterministic output.
    pub fn query(&self, vector: &[f32], k: usize) -> Vec<(String, f32)> {
        let mut query = vector.to_vec();
        normalize(&mut query);
        let mut scored: Vec<(f32, &String)> = self
            .vectors
            .iter()
            .zip(&self.labels)
            .map(|(v, label)| (cosine(&query, v), label))
            .collect();
        scored.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.1.cmp(b.1))
        });
        scored
            .into_iter()
            .take(k)
            .map(|(score, label)| (label.clone(), score))
            .collect()
    }
}

#[cfg(test)]
#[path = "embed_test.rs"]
mod tests;
