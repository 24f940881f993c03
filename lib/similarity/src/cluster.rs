//! Duplicate clustering engine.
//!
//! Consumes the directed similarity edge set and partitions parts into
//! duplicate-equivalence clusters via union-find over connected
//! components. An undirected edge exists between two parts when *either*
//! direction reports a qualifying score; top-K truncation can drop one
//! direction of a genuinely symmetric pair, and requiring both directions
//! would miss those duplicates. The result is invariant to edge order.

use ahash::AHashMap;
use partx_core::{DuplicateCluster, SimilarityEdge};
use serde::Serialize;

/// Union-find with path compression and union by rank.
struct UnionFind {
    parent: Vec<u32>,
    rank: Vec<u8>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n as u32).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, x: u32) -> u32 {
        let mut root = x;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }
        // Path compression.
        let mut current = x;
        while self.parent[current as usize] != root {
            let next = self.parent[current as usize];
            self.parent[current as usize] = root;
            current = next;
        }
        root
    }

    fn union(&mut self, a: u32, b: u32) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        match self.rank[ra as usize].cmp(&self.rank[rb as usize]) {
            std::cmp::Ordering::Less => self.parent[ra as usize] = rb,
            std::cmp::Ordering::Greater => self.parent[rb as usize] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb as usize] = ra;
                self.rank[ra as usize] += 1;
            }
        }
    }
}

/// Result of one clustering run over a catalog snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateReport {
    pub threshold: f64,
    /// All clusters, including singletons, ordered by cluster key.
    pub clusters: Vec<DuplicateCluster>,
    #[serde(skip)]
    cluster_of: AHashMap<String, usize>,
}

impl DuplicateReport {
    /// A part is a duplicate iff its cluster has at least two members.
    /// Derived per run, never authoritative on the part master.
    pub fn is_duplicate(&self, part_id: &str) -> bool {
        self.cluster_for(part_id)
            .map(DuplicateCluster::is_duplicate_group)
            .unwrap_or(false)
    }

    pub fn cluster_for(&self, part_id: &str) -> Option<&DuplicateCluster> {
        self.cluster_of
            .get(part_id)
            .map(|&idx| &self.clusters[idx])
    }

    /// Clusters of size >= 2 only.
    pub fn duplicate_groups(&self) -> impl Iterator<Item = &DuplicateCluster> {
        self.clusters
            .iter()
            .filter(|c| c.is_duplicate_group())
    }

    pub fn duplicate_part_count(&self) -> usize {
        self.duplicate_groups().map(DuplicateCluster::len).sum()
    }
}

/// Partition `universe` into duplicate clusters given the edge set.
///
/// Parts named only in edges are included as well, so the partition covers
/// every id the caller knows about; parts with no qualifying edge become
/// singleton clusters.
pub fn cluster(
    edges: &[SimilarityEdge],
    universe: &[String],
    threshold: f64,
) -> DuplicateReport {
    // Deterministic id space: sorted union of the universe and edge
    // endpoints.
    let mut ids: Vec<String> = universe.to_vec();
    for edge in edges {
        ids.push(edge.source_id.clone());
        ids.push(edge.target_id.clone());
    }
    ids.sort();
    ids.dedup();

    let index_of: AHashMap<&str, u32> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| (id.as_str(), i as u32))
        .collect();

    let mut uf = UnionFind::new(ids.len());
    for edge in edges {
        if edge.source_id == edge.target_id {
            continue;
        }
        // A qualifying score in either direction merges the pair.
        if edge.score >= threshold {
            uf.union(
                index_of[edge.source_id.as_str()],
                index_of[edge.target_id.as_str()],
            );
        }
    }

    let mut members_by_root: AHashMap<u32, Vec<String>> = AHashMap::new();
    for (i, id) in ids.iter().enumerate() {
        let root = uf.find(i as u32);
        members_by_root.entry(root).or_default().push(id.clone());
    }

    let mut clusters: Vec<DuplicateCluster> = members_by_root
        .into_values()
        .map(DuplicateCluster::from_members)
        .collect();
    clusters.sort_by(|a, b| a.key.cmp(&b.key));

    let cluster_of = clusters
        .iter()
        .enumerate()
        .flat_map(|(idx, c)| c.members.iter().map(move |m| (m.clone(), idx)))
        .collect();

    DuplicateReport {
        threshold,
        clusters,
        cluster_of,
    }
}

/// Re-derive a minimal qualifying edge set from a report: a chain per
/// cluster. Feeding these edges back into [`cluster`] reproduces the same
/// partition, which is the engine's idempotence property.
pub fn cluster_to_edges(report: &DuplicateReport) -> Vec<SimilarityEdge> {
    let mut edges = Vec::new();
    for group in report.duplicate_groups() {
        for pair in group.members.windows(2) {
            edges.push(SimilarityEdge::new(
                pair[0].clone(),
                pair[1].clone(),
                100.0,
                "duplicate cluster member",
            ));
        }
    }
    edges
}
