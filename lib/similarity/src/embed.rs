//! Feature/Embedding adapter.
//!
//! Normalizes a part's raw attributes into the payload an embedding
//! provider consumes, and caches the returned vectors in the catalog.
//! The adapter owns no similarity logic; production deployments plug in
//! an external provider behind [`EmbeddingProvider`]. [`HashEmbedder`] is
//! the deterministic offline stand-in used by the demo binary and tests.

use ahash::RandomState;
use partx_core::{Catalog, Part, Result, Vector};
use std::hash::{BuildHasher, Hash, Hasher};
use tracing::debug;

/// Contract for an external embedding provider: a fixed-dimension vector
/// per payload text. Implementations must be deterministic for a given
/// input; any randomness belongs in synthetic test data, never here.
pub trait EmbeddingProvider: Send + Sync {
    fn dim(&self) -> usize;

    /// Embed a batch of payload texts. The output length and order match
    /// the input.
    fn embed(&self, texts: &[String]) -> Result<Vec<Vector>>;
}

/// Builds the provider payload from a part's descriptive attributes.
///
/// The payload shape is part of the contract with the provider: two parts
/// with the same normalized attributes produce the same payload, so
/// re-embedding unchanged parts is idempotent.
#[derive(Debug, Clone, Default)]
pub struct PartFeaturizer;

impl PartFeaturizer {
    pub fn feature_text(&self, part: &Part) -> String {
        // Cost is bucketed so immaterial price noise does not move vectors.
        let cost_bucket = (part.cost / 5.0).round() as i64;
        format!(
            "{} material {} dims {} category {} cost_bucket {}",
            part.description.trim().to_lowercase(),
            part.material.trim().to_lowercase(),
            part.dimensions.trim().to_lowercase(),
            part.category.trim().to_lowercase(),
            cost_bucket
        )
    }
}

/// Embed every part in the catalog and cache the vectors. Returns the
/// number of vectors written.
pub fn embed_catalog(catalog: &Catalog, provider: &dyn EmbeddingProvider) -> Result<usize> {
    let featurizer = PartFeaturizer;
    let parts = catalog.parts_sorted();
    let texts: Vec<String> = parts.iter().map(|p| featurizer.feature_text(p)).collect();

    let vectors = provider.embed(&texts)?;
    debug!("embedded {} parts at dim {}", vectors.len(), provider.dim());

    for (part, vector) in parts.iter().zip(vectors) {
        catalog.set_vector(&part.global_id, vector)?;
    }
    Ok(parts.len())
}

/// Deterministic hashing embedder: character trigrams and words are hashed
/// into a fixed-dim accumulator, then normalized. Fixed hash seeds keep
/// the output identical across processes and runs.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dim: usize,
    hasher: RandomState,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            hasher: RandomState::with_seeds(
                0x9e37_79b9_7f4a_7c15,
                0xd1b5_4a32_d192_ed03,
                0x2545_f491_4f6c_dd1d,
                0x27d4_eb2f_1656_67c5,
            ),
        }
    }

    fn slot(&self, token: &str) -> usize {
        let mut hasher = self.hasher.build_hasher();
        token.hash(&mut hasher);
        (hasher.finish() as usize) % self.dim
    }

    fn embed_one(&self, text: &str) -> Vector {
        let mut accum = vec![0.0f32; self.dim];
        let normalized = text.to_lowercase();

        let padded = format!("  {normalized}  ");
        let chars: Vec<char> = padded.chars().collect();
        for window in chars.windows(3) {
            let trigram: String = window.iter().collect();
            accum[self.slot(&trigram)] += 1.0;
        }

        // Whole words carry more signal than their trigrams.
        for word in normalized.split_whitespace() {
            accum[self.slot(word)] += 2.0;
        }

        let mut vector = Vector::new(accum);
        vector.normalize();
        vector
    }
}

impl EmbeddingProvider for HashEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed(&self, texts: &[String]) -> Result<Vec<Vector>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}
