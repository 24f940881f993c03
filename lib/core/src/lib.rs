//! # partx Core
//!
//! Core library for the partx part-deduplication and supplier-consolidation
//! analytics engine.
//!
//! This crate provides the shared domain model and snapshot store:
//!
//! - [`Part`] / [`Supplier`] / [`ConsolidationScenario`] - master records
//! - [`Vector`] - cached part embedding with cosine similarity
//! - [`SimilarityEdge`] / [`DuplicateCluster`] - the derived duplicate graph
//! - [`RiskScore`] - per-supplier risk sub-scores and composite
//! - [`Catalog`] - versioned in-memory snapshot of all masters
//! - [`ComputeBudget`] - caller-supplied deadline/cancellation for batch work
//! - [`ingest`] - CSV loaders for the source-system exports
//!
//! ## Example
//!
//! ```rust
//! use partx_core::{Catalog, CatalogConfig, Vector};
//!
//! let catalog = Catalog::new(CatalogConfig { vector_dim: 3 });
//! assert_eq!(catalog.part_count(), 0);
//! assert_eq!(catalog.vector_dim(), 3);
//! ```

pub mod budget;
pub mod catalog;
pub mod edge;
pub mod error;
pub mod ingest;
pub mod order;
pub mod part;
pub mod scenario;
pub mod supplier;
pub mod vector;

pub use budget::{CancelHandle, ComputeBudget};
pub use catalog::{Catalog, CatalogConfig};
pub use edge::{DuplicateCluster, SimilarityEdge};
pub use error::{Error, Result};
pub use ingest::IngestSummary;
pub use order::PurchaseOrder;
pub use part::{ComplianceStatus, Part, SourceRef};
pub use scenario::{ConsolidationScenario, ScenarioStatus};
pub use supplier::{RiskScore, Supplier, SupplierTier};
pub use vector::Vector;
