//! Similarity index over the part catalog.
//!
//! Finds, for each part, its top-K nearest neighbors by cosine similarity
//! scaled to [0, 100]. Results are strictly descending by score with ties
//! broken ascending by neighbor id, so recomputation over unchanged data is
//! idempotent. Small catalogs are scanned exhaustively in parallel; past
//! [`SimilarityConfig::ann_threshold`] parts, candidates come from the
//! approximate graph index and are re-scored exactly, preserving the
//! ordering and threshold contract within the graph's recall.

use crate::ann::AnnIndex;
use ahash::AHashMap;
use ordered_float::OrderedFloat;
use partx_core::{Catalog, ComputeBudget, Error, Result, SimilarityEdge, Vector};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

/// Tuning for similarity runs. All engine behavior flows through this
/// config; there is no ambient state.
#[derive(Debug, Clone)]
pub struct SimilarityConfig {
    /// Neighbors kept per part when rebuilding the edge set.
    pub top_k: usize,
    /// Hard score floor for stored edges, in [0, 100].
    pub min_score: f64,
    /// Score at or above which an edge makes two parts duplicates.
    pub duplicate_threshold: f64,
    /// Catalog size beyond which the approximate index is used.
    pub ann_threshold: usize,
    /// Seed for the approximate index's level draws.
    pub ann_seed: u64,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            top_k: 10,
            min_score: 75.0,
            duplicate_threshold: 90.0,
            ann_threshold: 5_000,
            ann_seed: 42,
        }
    }
}

/// One ranked neighbor of a query part.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartMatch {
    pub part_id: String,
    /// Cosine similarity scaled to [0, 100].
    pub score: f64,
    pub reason: String,
}

/// Optional restriction of the candidate universe to bound scan cost.
#[derive(Debug, Clone, Default)]
pub struct CandidateScope {
    pub category: Option<String>,
    pub business_unit: Option<String>,
}

struct Row {
    id: String,
    vector: Vector,
    category: String,
    business_unit: String,
}

/// Immutable similarity index over one catalog snapshot.
pub struct SimilarityIndex {
    rows: Vec<Row>,
    index_of: AHashMap<String, usize>,
    /// Parts present in the catalog but without a cached vector.
    unembedded: ahash::AHashSet<String>,
    ann: Option<AnnIndex>,
    config: SimilarityConfig,
}

impl SimilarityIndex {
    /// Build the index from the catalog. Rows are ordered by part id, so
    /// the index is identical regardless of catalog insertion order.
    pub fn build(catalog: &Catalog, config: SimilarityConfig) -> Self {
        let mut rows = Vec::new();
        let mut unembedded = ahash::AHashSet::new();

        for part in catalog.parts_sorted() {
            match catalog.vector(&part.global_id) {
                Some(vector) => rows.push(Row {
                    id: part.global_id,
                    vector,
                    category: part.category,
                    business_unit: part.business_unit,
                }),
                None => {
                    unembedded.insert(part.global_id);
                }
            }
        }
        if !unembedded.is_empty() {
            warn!("{} parts have no cached vector", unembedded.len());
        }

        let index_of = rows
            .iter()
            .enumerate()
            .map(|(i, row)| (row.id.clone(), i))
            .collect();

        let ann = if rows.len() >= config.ann_threshold {
            debug!("building approximate index over {} parts", rows.len());
            let mut ann = AnnIndex::new(16, 4, config.ann_seed);
            for row in &rows {
                ann.insert(&row.vector);
            }
            Some(ann)
        } else {
            None
        };

        Self {
            rows,
            index_of,
            unembedded,
            ann,
            config,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn config(&self) -> &SimilarityConfig {
        &self.config
    }

    /// Top-K neighbors of `part_id` scoring at or above `min_score`.
    ///
    /// `min_score` is a hard floor independent of `k`. Fails with
    /// [`Error::VectorMissing`] when the part exists but carries no cached
    /// vector, and [`Error::PartNotFound`] when it is entirely unknown.
    pub fn find_top_k(
        &self,
        part_id: &str,
        k: usize,
        min_score: f64,
        scope: Option<&CandidateScope>,
        budget: &ComputeBudget,
    ) -> Result<Vec<PartMatch>> {
        if k == 0 {
            return Err(Error::Validation("k must be at least 1".into()));
        }
        let query_idx = match self.index_of.get(part_id) {
            Some(&idx) => idx,
            None if self.unembedded.contains(part_id) => {
                return Err(Error::VectorMissing(part_id.to_string()));
            }
            None => return Err(Error::PartNotFound(part_id.to_string())),
        };

        let mut matches = match &self.ann {
            Some(ann) => self.candidates_approximate(ann, query_idx, k, min_score, scope),
            None => self.candidates_exhaustive(query_idx, min_score, scope, budget)?,
        };

        matches.sort_by(|a, b| {
            OrderedFloat(b.score)
                .cmp(&OrderedFloat(a.score))
                .then_with(|| a.part_id.cmp(&b.part_id))
        });
        matches.truncate(k);
        Ok(matches)
    }

    fn admits(&self, row: &Row, scope: Option<&CandidateScope>) -> bool {
        match scope {
            None => true,
            Some(scope) => {
                scope
                    .category
                    .as_deref()
                    .map_or(true, |c| row.category.eq_ignore_ascii_case(c))
                    && scope
                        .business_unit
                        .as_deref()
                        .map_or(true, |bu| row.business_unit.eq_ignore_ascii_case(bu))
            }
        }
    }

    fn candidates_exhaustive(
        &self,
        query_idx: usize,
        min_score: f64,
        scope: Option<&CandidateScope>,
        budget: &ComputeBudget,
    ) -> Result<Vec<PartMatch>> {
        let query = &self.rows[query_idx].vector;
        let scored: Vec<Option<PartMatch>> = self
            .rows
            .par_iter()
            .enumerate()
            .map(|(idx, row)| {
                budget.check()?;
                if idx == query_idx || !self.admits(row, scope) {
                    return Ok(None);
                }
                let score = scale_score(query.cosine_similarity(&row.vector));
                if score < min_score {
                    return Ok(None);
                }
                Ok(Some(PartMatch {
                    part_id: row.id.clone(),
                    score,
                    reason: match_reason(score).to_string(),
                }))
            })
            .collect::<Result<_>>()?;

        Ok(scored.into_iter().flatten().collect())
    }

    fn candidates_approximate(
        &self,
        ann: &AnnIndex,
        query_idx: usize,
        k: usize,
        min_score: f64,
        scope: Option<&CandidateScope>,
    ) -> Vec<PartMatch> {
        let query = &self.rows[query_idx].vector;
        // Over-fetch so scope filtering and the score floor still leave k.
        let ef = (k * 4).max(64);
        ann.search(query, ef)
            .into_iter()
            .filter_map(|(idx, _)| {
                let idx = idx as usize;
                if idx == query_idx {
                    return None;
                }
                let row = &self.rows[idx];
                if !self.admits(row, scope) {
                    return None;
                }
                // Exact re-score; the graph only proposes candidates.
                let score = scale_score(query.cosine_similarity(&row.vector));
                if score < min_score {
                    return None;
                }
                Some(PartMatch {
                    part_id: row.id.clone(),
                    score,
                    reason: match_reason(score).to_string(),
                })
            })
            .collect()
    }

    /// Rebuild the whole directed edge set: top-K qualifying neighbors per
    /// part. Wholesale and idempotent; a failed run leaves no partial
    /// state because callers replace their edge snapshot atomically.
    pub fn build_edges(&self, budget: &ComputeBudget) -> Result<Vec<SimilarityEdge>> {
        let per_part: Vec<Vec<SimilarityEdge>> = (0..self.rows.len())
            .into_par_iter()
            .map(|idx| {
                budget.check()?;
                let source = &self.rows[idx].id;
                let matches =
                    self.find_top_k(source, self.config.top_k, self.config.min_score, None, budget)?;
                Ok(matches
                    .into_iter()
                    .map(|m| SimilarityEdge::new(source.clone(), m.part_id, m.score, m.reason))
                    .collect())
            })
            .collect::<Result<_>>()?;

        Ok(per_part.into_iter().flatten().collect())
    }
}

/// Scale cosine similarity to [0, 100]; negative cosine floors at 0.
#[inline]
fn scale_score(cosine: f32) -> f64 {
    (f64::from(cosine).max(0.0) * 100.0).min(100.0)
}

/// Human-readable edge label derived from the score band.
fn match_reason(score: f64) -> &'static str {
    if score >= 97.0 {
        "near-identical attributes"
    } else if score >= 90.0 {
        "strong attribute match"
    } else {
        "similar attributes"
    }
}
