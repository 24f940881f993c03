//! # partx Procurement
//!
//! Supplier-facing analytics over the catalog snapshot:
//!
//! - **Risk scoring**: deterministic per-supplier sub-scores and weighted
//!   composite ([`risk`]).
//! - **Recommendation ranking**: filtered, ranked supplier shortlists per
//!   part category ([`recommend`]).
//! - **Consolidation evaluation**: retooling cost table and scenario
//!   reads with recomputed ROI ([`consolidation`]).
//! - **Spend analysis**: maverick spend aggregation from order history
//!   ([`spend`]).
//!
//! Everything here is a pure function over catalog state; there is no
//! hidden mutable state and no randomness.

pub mod consolidation;
pub mod recommend;
pub mod risk;
pub mod spend;

pub use consolidation::{estimate_retooling_cost, get_scenario, ScenarioEvaluation};
pub use recommend::{recommend_suppliers, SupplierRecommendation};
pub use risk::{risk_recommendation, RiskScorer, RiskWeights};
pub use spend::{spend_summary, SpendSummary, SupplierSpend};
