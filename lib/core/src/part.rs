use serde::{Deserialize, Serialize};

/// Where a part record originated: the pair is unique per source system and
/// maps many-to-one into a merged [`Part`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRef {
    pub source_system: String,
    pub local_id: String,
}

impl SourceRef {
    pub fn new(source_system: impl Into<String>, local_id: impl Into<String>) -> Self {
        Self {
            source_system: source_system.into(),
            local_id: local_id.into(),
        }
    }
}

/// Compliance state carried on the part master record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    Compliant,
    PendingReview,
    NonCompliant,
    Unknown,
}

impl ComplianceStatus {
    /// Lenient parse for ingestion; anything unrecognized is `Unknown`
    /// rather than a load failure.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "compliant" | "approved" | "fda_approved" => ComplianceStatus::Compliant,
            "pending" | "pending_review" | "in_review" => ComplianceStatus::PendingReview,
            "non_compliant" | "noncompliant" | "rejected" => ComplianceStatus::NonCompliant,
            _ => ComplianceStatus::Unknown,
        }
    }
}

/// A normalized engineering part merged from one or more source-system
/// exports. `global_id` is assigned at ingestion and uniquely identifies
/// the merged record.
///
/// Duplicate status is deliberately not stored here: it is derived from the
/// latest clustering run, never authoritative on the master record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    pub global_id: String,
    pub source: SourceRef,
    pub description: String,
    pub material: String,
    pub dimensions: String,
    pub weight: f64,
    pub cost: f64,
    /// Should-cost reference for markup analysis.
    pub benchmark_cost: f64,
    pub category: String,
    pub compliance_status: ComplianceStatus,
    pub business_unit: String,
}

impl Part {
    /// Markup of actual cost over the should-cost benchmark, as a percent.
    /// Returns `None` when no benchmark is available.
    pub fn markup_pct(&self) -> Option<f64> {
        if self.benchmark_cost > 0.0 {
            Some((self.cost - self.benchmark_cost) / self.benchmark_cost * 100.0)
        } else {
            None
        }
    }
}
