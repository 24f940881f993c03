//! # partx API
//!
//! The query surface and its REST transport:
//!
//! - [`ops`]: named operations (risk assessment, supplier recommendation,
//!   retooling estimates, scenario reads, similarity lookups, dedup runs)
//!   with input validation and derived-state caching.
//! - [`rest`]: actix-web handlers mapping those operations onto HTTP.
//!
//! The operations are the contract; the REST layer is one interchangeable
//! transport over them.

pub mod ops;
pub mod rest;

pub use ops::{DedupSummary, RiskAssessment, SourcingOps};
pub use rest::RestApi;
