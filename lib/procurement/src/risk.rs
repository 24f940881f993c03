//! Supplier risk scoring.
//!
//! Pure functions of the supplier master record. Every sub-score and the
//! composite are clamped to [0.05, 1.0] so downstream weighting never sees
//! zero or negative risk; supply continuity is additionally capped at 0.99
//! because no supplier is a guaranteed source. No randomness anywhere:
//! the same supplier record always scores identically.

use partx_core::{Catalog, RiskScore, Supplier};
use rayon::prelude::*;

/// Floor/ceiling applied to every sub-score.
pub const SCORE_FLOOR: f64 = 0.05;
pub const SCORE_CEILING: f64 = 1.0;
/// Continuity never reaches certainty.
pub const CONTINUITY_CAP: f64 = 0.99;

const MAX_RATING: f64 = 5.0;
/// Lead time (days) at which delivery risk saturates.
const LEAD_TIME_SCALE: f64 = 50.0;
const PREFERRED_FINANCIAL_DISCOUNT: f64 = 0.15;
const PREFERRED_DELIVERY_DISCOUNT: f64 = 0.10;
const PREFERRED_CONTINUITY_BONUS: f64 = 0.15;

/// Composite weights over (financial, delivery, quality).
#[derive(Debug, Clone, Copy)]
pub struct RiskWeights {
    pub financial: f64,
    pub delivery: f64,
    pub quality: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            financial: 0.3,
            delivery: 0.3,
            quality: 0.4,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RiskScorer {
    weights: RiskWeights,
}

impl RiskScorer {
    pub fn new(weights: RiskWeights) -> Self {
        Self { weights }
    }

    fn clamp(value: f64) -> f64 {
        value.clamp(SCORE_FLOOR, SCORE_CEILING)
    }

    /// Score one supplier. Deterministic for a given record.
    pub fn score(&self, supplier: &Supplier) -> RiskScore {
        let rating_risk = 1.0 - supplier.rating / MAX_RATING;
        let lead_risk = supplier.avg_lead_time_days / LEAD_TIME_SCALE;

        let (fin_discount, del_discount, continuity_bonus) = if supplier.preferred_flag {
            (
                PREFERRED_FINANCIAL_DISCOUNT,
                PREFERRED_DELIVERY_DISCOUNT,
                PREFERRED_CONTINUITY_BONUS,
            )
        } else {
            (0.0, 0.0, 0.0)
        };

        let financial = Self::clamp(rating_risk - fin_discount);
        let delivery = Self::clamp(lead_risk - del_discount);
        let quality = Self::clamp(rating_risk);

        // The composite re-derives its financial and delivery components
        // from the raw rating/lead-time terms. Reusing the discounted
        // sub-scores would count the preferred bonus twice, once in the
        // sub-score and again through the weighted sum.
        let raw_financial = Self::clamp(rating_risk);
        let raw_delivery = Self::clamp(lead_risk);
        let composite = Self::clamp(
            self.weights.financial * raw_financial
                + self.weights.delivery * raw_delivery
                + self.weights.quality * quality,
        );

        let supply_continuity = Self::clamp(
            (supplier.rating / MAX_RATING + continuity_bonus).min(CONTINUITY_CAP),
        );

        RiskScore {
            financial,
            delivery,
            quality,
            supply_continuity,
            composite,
            estimated: false,
        }
    }

    /// Score every supplier in the catalog. Scoring is independent per
    /// supplier, so the batch runs across worker threads; output order
    /// follows supplier id ascending.
    pub fn score_all(&self, catalog: &Catalog) -> Vec<(String, RiskScore)> {
        catalog
            .suppliers_sorted()
            .into_par_iter()
            .map(|s| {
                let score = self.score(&s);
                (s.supplier_id, score)
            })
            .collect()
    }
}

/// Advisory text for a composite risk level. Band edges follow the
/// low/medium/high split used across procurement reporting (0.3, 0.6).
pub fn risk_recommendation(composite: f64) -> &'static str {
    if composite < 0.3 {
        "Low risk - Recommended for strategic partnership"
    } else if composite < 0.6 {
        "Medium risk - Monitor performance and review quarterly"
    } else {
        "High risk - Consider alternative suppliers or dual-sourcing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use partx_core::SupplierTier;

    fn supplier(rating: f64, lead: f64, preferred: bool) -> Supplier {
        Supplier {
            supplier_id: "SUP001".to_string(),
            name: "Arctic Components".to_string(),
            region: "NA".to_string(),
            rating,
            avg_lead_time_days: lead,
            preferred_flag: preferred,
            tier: if preferred {
                SupplierTier::Preferred
            } else {
                SupplierTier::Approved
            },
            total_spend: 1_000_000.0,
            contract_end_date: None,
            quality_certification: Some("ISO 9001".to_string()),
        }
    }

    #[test]
    fn test_preferred_high_rating_is_low_risk() {
        let score = RiskScorer::default().score(&supplier(4.8, 10.0, true));
        assert!(score.composite < 0.3, "composite = {}", score.composite);
        assert!(!score.estimated);
        assert_eq!(
            risk_recommendation(score.composite),
            "Low risk - Recommended for strategic partnership"
        );
    }

    #[test]
    fn test_scores_stay_in_bounds() {
        for (rating, lead, preferred) in [
            (5.0, 0.0, true),
            (5.0, 0.0, false),
            (0.0, 120.0, false),
            (0.5, 60.0, true),
        ] {
            let s = RiskScorer::default().score(&supplier(rating, lead, preferred));
            for value in [s.financial, s.delivery, s.quality, s.composite] {
                assert!((SCORE_FLOOR..=SCORE_CEILING).contains(&value), "{value}");
            }
            assert!(s.supply_continuity <= CONTINUITY_CAP);
            assert!(s.supply_continuity >= SCORE_FLOOR);
        }
    }

    #[test]
    fn test_composite_does_not_compound_preferred_discount() {
        // rating 3.0, lead 20: rating_risk = 0.4, lead_risk = 0.4.
        let preferred = RiskScorer::default().score(&supplier(3.0, 20.0, true));
        let plain = RiskScorer::default().score(&supplier(3.0, 20.0, false));

        // Sub-scores carry the discount.
        assert!((preferred.financial - 0.25).abs() < 1e-9);
        assert!((plain.financial - 0.4).abs() < 1e-9);
        assert!((preferred.delivery - 0.3).abs() < 1e-9);

        // The composite is built from the raw terms, so it is identical
        // for both suppliers: 0.3*0.4 + 0.3*0.4 + 0.4*0.4 = 0.4.
        assert!((preferred.composite - 0.4).abs() < 1e-9);
        assert_eq!(preferred.composite, plain.composite);

        // The naive re-weighting of discounted sub-scores would differ.
        let naive = 0.3 * preferred.financial + 0.3 * preferred.delivery + 0.4 * preferred.quality;
        assert!((naive - preferred.composite).abs() > 0.01);
    }

    #[test]
    fn test_continuity_capped() {
        let s = RiskScorer::default().score(&supplier(5.0, 5.0, true));
        assert!((s.supply_continuity - CONTINUITY_CAP).abs() < 1e-9);
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let scorer = RiskScorer::default();
        let record = supplier(4.1, 18.0, false);
        assert_eq!(scorer.score(&record), scorer.score(&record));
    }

    #[test]
    fn test_recommendation_bands() {
        assert!(risk_recommendation(0.29).starts_with("Low risk"));
        assert!(risk_recommendation(0.3).starts_with("Medium risk"));
        assert!(risk_recommendation(0.6).starts_with("High risk"));
    }
}
