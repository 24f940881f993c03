//! Supplier recommendation ranking.
//!
//! Ranks suppliers for a part category by a weighted blend of rating,
//! lead time, and inverse composite risk. Hard filters (`min_rating`,
//! `max_lead_time`) exclude suppliers outright rather than penalizing
//! them; the blend only orders the survivors.

use crate::risk::{risk_recommendation, RiskScorer};
use ordered_float::OrderedFloat;
use partx_core::{Catalog, Error, Result, Supplier, SupplierTier};
use serde::Serialize;
use tracing::debug;

/// Lead time (days) beyond which the lead-time term bottoms out.
const LEAD_TIME_HORIZON: f64 = 30.0;
const MAX_RESULTS: usize = 5;

const RATING_WEIGHT: f64 = 0.4;
const LEAD_TIME_WEIGHT: f64 = 0.3;
const RISK_WEIGHT: f64 = 0.3;

#[derive(Debug, Clone, Serialize)]
pub struct SupplierRecommendation {
    pub supplier_id: String,
    pub name: String,
    pub tier: SupplierTier,
    pub rating: f64,
    pub lead_time: f64,
    pub composite_risk: f64,
    pub recommendation_score: f64,
    pub rationale: String,
}

fn recommendation_score(supplier: &Supplier, composite_risk: f64) -> f64 {
    let rating_term = supplier.rating / 5.0;
    let lead_term = 1.0 - supplier.avg_lead_time_days.min(LEAD_TIME_HORIZON) / LEAD_TIME_HORIZON;
    let risk_term = 1.0 - composite_risk;
    RATING_WEIGHT * rating_term + LEAD_TIME_WEIGHT * lead_term + RISK_WEIGHT * risk_term
}

fn rationale(supplier: &Supplier, composite_risk: f64) -> String {
    format!(
        "{} rating {:.1}/5, {:.0}-day avg lead time, composite risk {:.2}. {}",
        supplier.tier.as_str(),
        supplier.rating,
        supplier.avg_lead_time_days,
        composite_risk,
        risk_recommendation(composite_risk)
    )
}

/// Rank suppliers for `category`, best first, at most five results.
///
/// Category scoping uses the purchase-order history: a supplier is in
/// scope when it has supplied at least one part of the category. When no
/// order history exists at all, every supplier is in scope, since a cold
/// catalog has nothing to scope by.
pub fn recommend_suppliers(
    catalog: &Catalog,
    category: &str,
    min_rating: f64,
    max_lead_time: f64,
) -> Result<Vec<SupplierRecommendation>> {
    if category.trim().is_empty() {
        return Err(Error::Validation("part_category must not be empty".into()));
    }
    if !(0.0..=5.0).contains(&min_rating) {
        return Err(Error::Validation(format!(
            "min_rating must be within [0, 5], got {min_rating}"
        )));
    }
    if max_lead_time < 0.0 {
        return Err(Error::Validation(format!(
            "max_lead_time must not be negative, got {max_lead_time}"
        )));
    }

    let categories_by_supplier = catalog.supplier_categories();
    let scope_by_history = !categories_by_supplier.is_empty();
    let category_lower = category.trim().to_lowercase();

    let scorer = RiskScorer::default();
    let mut ranked: Vec<SupplierRecommendation> = catalog
        .suppliers_sorted()
        .into_iter()
        .filter(|s| {
            if !scope_by_history {
                return true;
            }
            categories_by_supplier
                .get(&s.supplier_id)
                .is_some_and(|cats| cats.iter().any(|c| c.to_lowercase() == category_lower))
        })
        .filter(|s| s.rating >= min_rating && s.avg_lead_time_days <= max_lead_time)
        .map(|s| {
            let composite = scorer.score(&s).composite;
            SupplierRecommendation {
                recommendation_score: recommendation_score(&s, composite),
                rationale: rationale(&s, composite),
                supplier_id: s.supplier_id,
                name: s.name,
                tier: s.tier,
                rating: s.rating,
                lead_time: s.avg_lead_time_days,
                composite_risk: composite,
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        OrderedFloat(b.recommendation_score)
            .cmp(&OrderedFloat(a.recommendation_score))
            .then_with(|| a.supplier_id.cmp(&b.supplier_id))
    });
    ranked.truncate(MAX_RESULTS);

    debug!(
        category,
        candidates = ranked.len(),
        "ranked supplier recommendations"
    );
    Ok(ranked)
}
