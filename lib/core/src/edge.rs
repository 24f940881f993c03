use serde::{Deserialize, Serialize};

/// A directed similarity edge from one part's top-K neighbor list.
///
/// Storage is directed (each part keeps its own neighbors) but the
/// underlying similarity is symmetric: when both directions exist they
/// carry the same score, possibly at different ranks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityEdge {
    pub source_id: String,
    pub target_id: String,
    /// Cosine similarity scaled to [0, 100].
    pub score: f64,
    pub reason: String,
}

impl SimilarityEdge {
    pub fn new(
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        score: f64,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            score,
            reason: reason.into(),
        }
    }
}

/// A maximal set of parts considered functionally equivalent.
///
/// The key is derived from the lowest-sorted member so it is stable across
/// runs over unchanged data; no authoritative cluster id exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateCluster {
    pub key: String,
    /// Member part ids, ascending.
    pub members: Vec<String>,
}

impl DuplicateCluster {
    /// Builds a cluster from its members, sorting them and deriving the
    /// stable key from the lowest member.
    pub fn from_members(mut members: Vec<String>) -> Self {
        members.sort();
        members.dedup();
        let key = format!("DUP-{}", members.first().map(String::as_str).unwrap_or(""));
        Self { key, members }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// A part is a duplicate iff it shares a cluster with at least one
    /// other part.
    pub fn is_duplicate_group(&self) -> bool {
        self.members.len() >= 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stable_key_from_lowest_member() {
        let c = DuplicateCluster::from_members(vec![
            "G000000007".to_string(),
            "G000000003".to_string(),
            "G000000005".to_string(),
        ]);
        assert_eq!(c.key, "DUP-G000000003");
        assert_eq!(c.members[0], "G000000003");
        assert!(c.is_duplicate_group());
    }

    #[test]
    fn test_singleton_is_not_duplicate() {
        let c = DuplicateCluster::from_members(vec!["G000000001".to_string()]);
        assert!(!c.is_duplicate_group());
    }
}
