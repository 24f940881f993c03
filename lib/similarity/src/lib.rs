//! # partx Similarity
//!
//! Similarity index and duplicate clustering for the part catalog:
//!
//! - **Embedding adapter**: normalizes part attributes into provider
//!   payloads and caches returned vectors ([`embed`]).
//! - **Similarity index**: top-K cosine matching with exhaustive and
//!   approximate scan paths ([`index`], [`ann`]).
//! - **Duplicate clustering**: union-find over the qualifying edge set
//!   ([`cluster`]).
//! - **Single-flight cache**: one dedup run per catalog snapshot no
//!   matter how many callers ask ([`singleflight`]).
//!
//! All scoring is deterministic: fixed hash seeds, seeded RNG for the
//! approximate index, and total orderings with id tie-breaks throughout.

pub mod ann;
pub mod cluster;
pub mod embed;
pub mod index;
pub mod singleflight;

pub use ann::AnnIndex;
pub use cluster::{cluster, cluster_to_edges, DuplicateReport};
pub use embed::{embed_catalog, EmbeddingProvider, HashEmbedder, PartFeaturizer};
pub use index::{CandidateScope, PartMatch, SimilarityConfig, SimilarityIndex};
pub use singleflight::DedupCache;
