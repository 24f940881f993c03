//! Query surface: named operations over the catalog snapshot.
//!
//! Stateless wrappers around the similarity and procurement engines,
//! plus two pieces of derived-state management: a similarity index cached
//! per catalog version, and a single-flight dedup cache so concurrent
//! callers share one clustering run. Every operation validates its inputs
//! before touching an engine and fails fast with a typed error.

use parking_lot::Mutex;
use partx_core::{Catalog, ComputeBudget, Error, Result, RiskScore, SupplierTier};
use partx_procurement::{
    estimate_retooling_cost, recommend_suppliers, risk_recommendation, spend_summary,
    RiskScorer, ScenarioEvaluation, SpendSummary, SupplierRecommendation,
};
use partx_similarity::{
    cluster, CandidateScope, DedupCache, DuplicateReport, PartMatch, SimilarityConfig,
    SimilarityIndex,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Response of `ASSESS_SUPPLIER_RISK`.
#[derive(Debug, Clone, Serialize)]
pub struct RiskAssessment {
    pub supplier_id: String,
    pub supplier_name: String,
    pub tier: SupplierTier,
    pub composite_risk: f64,
    pub financial_risk: f64,
    pub delivery_risk: f64,
    pub quality_risk: f64,
    pub supply_continuity: f64,
    pub recommendation: String,
    pub risk_is_estimated: bool,
}

impl RiskAssessment {
    fn from_score(
        supplier_id: String,
        supplier_name: String,
        tier: SupplierTier,
        score: RiskScore,
    ) -> Self {
        Self {
            supplier_id,
            supplier_name,
            tier,
            composite_risk: score.composite,
            financial_risk: score.financial,
            delivery_risk: score.delivery,
            quality_risk: score.quality,
            supply_continuity: score.supply_continuity,
            recommendation: risk_recommendation(score.composite).to_string(),
            risk_is_estimated: score.estimated,
        }
    }
}

/// Summary of a dedup run, serialized for callers.
#[derive(Debug, Clone, Serialize)]
pub struct DedupSummary {
    pub catalog_version: u64,
    pub parts_scanned: usize,
    pub duplicate_groups: usize,
    pub duplicate_parts: usize,
}

/// The operation facade handed to every transport.
pub struct SourcingOps {
    catalog: Arc<Catalog>,
    similarity_config: SimilarityConfig,
    /// Similarity index for the catalog version it was built against.
    index_cache: Mutex<Option<(u64, Arc<SimilarityIndex>)>>,
    dedup_cache: DedupCache,
    compute_timeout: Option<Duration>,
}

impl SourcingOps {
    pub fn new(catalog: Arc<Catalog>, similarity_config: SimilarityConfig) -> Self {
        Self {
            catalog,
            similarity_config,
            index_cache: Mutex::new(None),
            dedup_cache: DedupCache::new(),
            compute_timeout: Some(Duration::from_secs(30)),
        }
    }

    pub fn with_compute_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.compute_timeout = timeout;
        self
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    fn budget(&self) -> ComputeBudget {
        match self.compute_timeout {
            Some(timeout) => ComputeBudget::with_timeout(timeout),
            None => ComputeBudget::unbounded(),
        }
    }

    /// Similarity index for the current catalog version, rebuilt lazily
    /// when the catalog has changed since the last build.
    fn index(&self) -> Arc<SimilarityIndex> {
        let version = self.catalog.version();
        let mut cache = self.index_cache.lock();
        if let Some((cached_version, index)) = cache.as_ref() {
            if *cached_version == version {
                return Arc::clone(index);
            }
        }
        info!(version, "rebuilding similarity index");
        let index = Arc::new(SimilarityIndex::build(
            &self.catalog,
            self.similarity_config.clone(),
        ));
        *cache = Some((version, Arc::clone(&index)));
        index
    }

    /// `ASSESS_SUPPLIER_RISK`: risk sub-scores, composite, and advisory
    /// text for one supplier.
    pub fn assess_supplier_risk(&self, supplier_id: &str) -> Result<RiskAssessment> {
        if supplier_id.trim().is_empty() {
            return Err(Error::Validation("supplier_id must not be empty".into()));
        }
        let supplier = self
            .catalog
            .supplier(supplier_id)
            .ok_or_else(|| Error::SupplierNotFound(supplier_id.to_string()))?;

        let score = RiskScorer::default().score(&supplier);
        Ok(RiskAssessment::from_score(
            supplier.supplier_id,
            supplier.name,
            supplier.tier,
            score,
        ))
    }

    /// `RECOMMEND_SUPPLIER`: ranked shortlist for a part category.
    pub fn recommend_supplier(
        &self,
        part_category: &str,
        min_rating: f64,
        max_lead_time: f64,
    ) -> Result<Vec<SupplierRecommendation>> {
        recommend_suppliers(&self.catalog, part_category, min_rating, max_lead_time)
    }

    /// `CALCULATE_RETOOLING_COST`: rule-table estimate for a region move.
    pub fn calculate_retooling_cost(
        &self,
        current_region: &str,
        target_region: &str,
        part_family: &str,
    ) -> Result<f64> {
        estimate_retooling_cost(current_region, target_region, part_family)
    }

    /// `GET_CONSOLIDATION_SCENARIO`: scenario with recomputed financials
    /// and live target-supplier risk.
    pub fn get_consolidation_scenario(&self, scenario_id: &str) -> Result<ScenarioEvaluation> {
        partx_procurement::get_scenario(&self.catalog, scenario_id)
    }

    /// `FIND_SIMILAR_PARTS`: top-k neighbors of a part above `min_score`,
    /// optionally restricted to a category/business-unit scope.
    pub fn find_similar_parts(
        &self,
        part_id: &str,
        k: usize,
        min_score: f64,
        scope: Option<CandidateScope>,
    ) -> Result<Vec<PartMatch>> {
        if part_id.trim().is_empty() {
            return Err(Error::Validation("part_id must not be empty".into()));
        }
        if !(0.0..=100.0).contains(&min_score) {
            return Err(Error::Validation(format!(
                "min_score must be within [0, 100], got {min_score}"
            )));
        }
        self.index()
            .find_top_k(part_id, k, min_score, scope.as_ref(), &self.budget())
    }

    /// Run (or join) the duplicate scan for the current catalog snapshot.
    ///
    /// At most one clustering computation runs per snapshot; concurrent
    /// callers block on the in-flight run and share its report.
    pub fn run_dedup(&self) -> Result<Arc<DuplicateReport>> {
        let version = self.catalog.version();
        self.dedup_cache.get_or_compute(version, || {
            let index = self.index();
            let budget = self.budget();
            let edges = index.build_edges(&budget)?;
            let universe: Vec<String> = self
                .catalog
                .parts_sorted()
                .into_iter()
                .map(|p| p.global_id)
                .collect();
            let report = cluster(
                &edges,
                &universe,
                self.similarity_config.duplicate_threshold,
            );
            info!(
                version,
                parts = universe.len(),
                groups = report.duplicate_groups().count(),
                "duplicate scan complete"
            );
            Ok(report)
        })
    }

    /// Dedup run condensed to counts, for transports that only need the
    /// headline numbers.
    pub fn run_dedup_summary(&self) -> Result<DedupSummary> {
        let version = self.catalog.version();
        let report = self.run_dedup()?;
        Ok(DedupSummary {
            catalog_version: version,
            parts_scanned: report.clusters.iter().map(|c| c.len()).sum(),
            duplicate_groups: report.duplicate_groups().count(),
            duplicate_parts: report.duplicate_part_count(),
        })
    }

    /// Maverick spend rollup from the purchase-order history.
    pub fn maverick_spend(&self) -> SpendSummary {
        spend_summary(&self.catalog)
    }
}
