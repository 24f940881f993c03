//! # partx
//!
//! Part deduplication and supplier consolidation analytics engine.
//!
//! partx merges part masters exported from multiple source systems,
//! finds functionally-equivalent duplicate parts through embedding
//! similarity, scores supplier risk, and evaluates supplier
//! consolidation scenarios.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! cargo install partx
//! partx --data-dir ./data --http-port 8080
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use partx::prelude::*;
//!
//! // Build a catalog and embed its parts
//! let catalog = std::sync::Arc::new(Catalog::new(CatalogConfig { vector_dim: 64 }));
//! embed_catalog(&catalog, &HashEmbedder::new(64)).unwrap();
//!
//! // The query surface wraps every analytics operation
//! let ops = SourcingOps::new(catalog, SimilarityConfig::default());
//! assert!(ops.assess_supplier_risk("SUP999").is_err());
//! ```
//!
//! ## Crate Structure
//!
//! partx is composed of several crates:
//!
//! - [`partx-core`](https://docs.rs/partx-core) - Domain model, catalog snapshot, CSV ingestion
//! - [`partx-similarity`](https://docs.rs/partx-similarity) - Embedding adapter, similarity index, duplicate clustering
//! - [`partx-procurement`](https://docs.rs/partx-procurement) - Risk scoring, recommendations, consolidation evaluation
//! - [`partx-api`](https://docs.rs/partx-api) - Query surface and REST transport

// Re-export core types
pub use partx_core::{
    Catalog, CatalogConfig, ComplianceStatus, ComputeBudget, ConsolidationScenario,
    DuplicateCluster, Error, Part, PurchaseOrder, Result, RiskScore, ScenarioStatus,
    SimilarityEdge, SourceRef, Supplier, SupplierTier, Vector,
};

// Re-export similarity engine
pub use partx_similarity::{
    cluster, embed_catalog, CandidateScope, DedupCache, DuplicateReport, EmbeddingProvider,
    HashEmbedder, PartMatch, SimilarityConfig, SimilarityIndex,
};

// Re-export procurement analytics
pub use partx_procurement::{
    estimate_retooling_cost, recommend_suppliers, RiskScorer, ScenarioEvaluation,
    SupplierRecommendation,
};

// Re-export API
pub use partx_api::{RestApi, RiskAssessment, SourcingOps};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        embed_catalog, CandidateScope, Catalog, CatalogConfig, ComputeBudget,
        ConsolidationScenario, Error, HashEmbedder, Part, PartMatch, RestApi, Result,
        RiskAssessment, RiskScore, RiskScorer, SimilarityConfig, SimilarityIndex, SourcingOps,
        Supplier, SupplierTier, Vector,
    };
}
