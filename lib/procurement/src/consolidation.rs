//! Consolidation scenario evaluation and retooling cost estimation.
//!
//! The retooling estimator is a rule table, not a model: same-region
//! switches cost a flat base amount, cross-region switches cost a
//! per-part-family amount with one default entry for unrecognized
//! families. Scenario reads always recompute ROI and net benefit from the
//! stored savings/cost and attach the target supplier's live risk.

use crate::risk::{risk_recommendation, RiskScorer};
use partx_core::{Catalog, ConsolidationScenario, Error, Result, RiskScore};
use serde::Serialize;
use tracing::debug;

/// Flat cost for a same-region supplier switch.
const SAME_REGION_BASE: f64 = 2_500.00;
/// Cross-region cost for a family not in the table.
const DEFAULT_FAMILY_COST: f64 = 10_000.00;

const FAMILY_COSTS: &[(&str, f64)] = &[
    ("fastener", 8_000.00),
    ("sensor", 12_000.00),
    ("valve", 15_000.00),
    ("actuator", 18_000.00),
    ("pump", 20_000.00),
    ("motor", 22_000.00),
];

const KNOWN_REGIONS: &[&str] = &["NA", "EU", "APAC"];

fn validate_region(region: &str) -> Result<String> {
    let normalized = region.trim().to_uppercase();
    if KNOWN_REGIONS.contains(&normalized.as_str()) {
        Ok(normalized)
    } else {
        Err(Error::Validation(format!("unknown region code: {region}")))
    }
}

/// One-time cost estimate for moving a part family between regions.
///
/// Same-region moves return the flat base cost regardless of family.
pub fn estimate_retooling_cost(
    current_region: &str,
    target_region: &str,
    part_family: &str,
) -> Result<f64> {
    let current = validate_region(current_region)?;
    let target = validate_region(target_region)?;
    if part_family.trim().is_empty() {
        return Err(Error::Validation("part_family must not be empty".into()));
    }

    if current == target {
        return Ok(SAME_REGION_BASE);
    }

    let family = part_family.trim().to_lowercase();
    let cost = FAMILY_COSTS
        .iter()
        .find(|(name, _)| *name == family)
        .map(|&(_, cost)| cost)
        .unwrap_or(DEFAULT_FAMILY_COST);
    Ok(cost)
}

/// A scenario read: stored definition plus metrics derived at read time.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioEvaluation {
    #[serde(flatten)]
    pub scenario: ConsolidationScenario,
    pub roi_pct: f64,
    pub net_benefit: f64,
    pub target_supplier_risk: RiskScore,
    pub target_supplier_recommendation: String,
}

/// Look up a scenario and derive its financial metrics and target risk.
///
/// An unknown target supplier does not fail the read; its risk falls back
/// to the flagged estimated midpoint so the caller still gets an answer
/// it can tell apart from measured data.
pub fn get_scenario(catalog: &Catalog, scenario_id: &str) -> Result<ScenarioEvaluation> {
    if scenario_id.trim().is_empty() {
        return Err(Error::Validation("scenario_id must not be empty".into()));
    }
    let scenario = catalog
        .scenario(scenario_id)
        .ok_or_else(|| Error::ScenarioNotFound(scenario_id.to_string()))?;

    let target_supplier_risk = match catalog.supplier(&scenario.target_supplier) {
        Some(supplier) => RiskScorer::default().score(&supplier),
        None => {
            debug!(
                scenario_id,
                target = %scenario.target_supplier,
                "target supplier unknown, using estimated risk midpoint"
            );
            RiskScore::estimated_midpoint()
        }
    };

    Ok(ScenarioEvaluation {
        roi_pct: scenario.roi_pct(),
        net_benefit: scenario.net_benefit(),
        target_supplier_recommendation: risk_recommendation(target_supplier_risk.composite)
            .to_string(),
        target_supplier_risk,
        scenario,
    })
}
