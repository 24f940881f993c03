use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Contract tier from the supplier master.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SupplierTier {
    Preferred,
    Approved,
    Conditional,
}

impl SupplierTier {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "preferred" => SupplierTier::Preferred,
            "approved" | "standard" => SupplierTier::Approved,
            _ => SupplierTier::Conditional,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SupplierTier::Preferred => "Preferred",
            SupplierTier::Approved => "Approved",
            SupplierTier::Conditional => "Conditional",
        }
    }
}

/// Supplier master record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    pub supplier_id: String,
    pub name: String,
    pub region: String,
    /// Performance rating in [0, 5].
    pub rating: f64,
    pub avg_lead_time_days: f64,
    pub preferred_flag: bool,
    pub tier: SupplierTier,
    pub total_spend: f64,
    pub contract_end_date: Option<NaiveDate>,
    pub quality_certification: Option<String>,
}

/// Per-supplier risk sub-scores and derived composite.
///
/// All scores live in [0.05, 1.0] (continuity additionally capped at 0.99).
/// `estimated` marks the conservative 0.5 midpoint used when no supplier
/// data is available; callers must never read an estimated score as
/// measured risk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskScore {
    pub financial: f64,
    pub delivery: f64,
    pub quality: f64,
    pub supply_continuity: f64,
    pub composite: f64,
    pub estimated: bool,
}

impl RiskScore {
    /// Conservative default for missing risk data: a documented neutral
    /// midpoint, never "safe".
    pub fn estimated_midpoint() -> Self {
        Self {
            financial: 0.5,
            delivery: 0.5,
            quality: 0.5,
            supply_continuity: 0.5,
            composite: 0.5,
            estimated: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_parse() {
        assert_eq!(SupplierTier::parse("Preferred"), SupplierTier::Preferred);
        assert_eq!(SupplierTier::parse("standard"), SupplierTier::Approved);
        assert_eq!(SupplierTier::parse("anything"), SupplierTier::Conditional);
    }

    #[test]
    fn test_estimated_midpoint_flags_itself() {
        let score = RiskScore::estimated_midpoint();
        assert!(score.estimated);
        assert_eq!(score.composite, 0.5);
    }
}
