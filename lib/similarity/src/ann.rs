//! Approximate nearest-neighbor index for catalogs past exhaustive-scan
//! size.
//!
//! A layered navigable-graph index in the HNSW family. Vectors are
//! normalized at insert so graph distance is `1 - dot`. Level draws come
//! from a seeded RNG and candidate heaps break distance ties on node index,
//! so building and searching the index twice over unchanged data yields
//! identical results. Callers re-score candidates exactly; the index only
//! proposes them, which keeps the ordering/threshold contract identical to
//! exhaustive search within the recall of the graph.

use ordered_float::OrderedFloat;
use partx_core::Vector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use smallvec::SmallVec;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

type Neighbors = SmallVec<[u32; 16]>;

struct AnnNode {
    /// Adjacency per layer; index 0 is the base layer holding all nodes.
    layers: Vec<Neighbors>,
}

pub struct AnnIndex {
    nodes: Vec<AnnNode>,
    vectors: Vec<Vector>,
    /// Node with the tallest layer stack; searches descend from its top.
    entry_point: u32,
    max_connections: usize,
    max_layers: usize,
    ef_construction: usize,
    rng: StdRng,
}

impl AnnIndex {
    pub fn new(max_connections: usize, max_layers: usize, seed: u64) -> Self {
        Self {
            nodes: Vec::new(),
            vectors: Vec::new(),
            entry_point: 0,
            max_connections,
            max_layers,
            ef_construction: 100,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Exponential-decay level draw from the seeded RNG.
    fn select_layer(&mut self) -> usize {
        let mut layer = 0;
        while layer < self.max_layers - 1 && self.rng.random::<f32>() < 0.5 {
            layer += 1;
        }
        layer
    }

    #[inline]
    fn distance(&self, query: &Vector, node_idx: u32) -> f32 {
        1.0 - query.dot(&self.vectors[node_idx as usize])
    }

    /// Beam search within one layer. Returns up to `ef` nearest candidates,
    /// ascending by distance with node-index tie-breaks.
    fn search_layer(&self, query: &Vector, entry: u32, ef: usize, layer: usize) -> Vec<(u32, f32)> {
        let mut visited = vec![false; self.nodes.len()];
        // Min-heap of candidates to expand.
        let mut candidates: BinaryHeap<(Reverse<OrderedFloat<f32>>, u32)> =
            BinaryHeap::with_capacity(ef * 2);
        // Max-heap of current results; the worst pops first.
        let mut results: BinaryHeap<(OrderedFloat<f32>, u32)> = BinaryHeap::with_capacity(ef + 1);

        let entry_dist = self.distance(query, entry);
        visited[entry as usize] = true;
        candidates.push((Reverse(OrderedFloat(entry_dist)), entry));
        results.push((OrderedFloat(entry_dist), entry));

        while let Some((Reverse(OrderedFloat(dist)), idx)) = candidates.pop() {
            if results.len() >= ef {
                let worst = results.peek().map(|(d, _)| d.0).unwrap_or(f32::INFINITY);
                if dist > worst {
                    break;
                }
            }

            if layer >= self.nodes[idx as usize].layers.len() {
                continue;
            }
            let neighbors: Neighbors = self.nodes[idx as usize].layers[layer].clone();
            for neighbor in neighbors {
                if visited[neighbor as usize] {
                    continue;
                }
                visited[neighbor as usize] = true;

                let neighbor_dist = self.distance(query, neighbor);
                let worst = results.peek().map(|(d, _)| d.0).unwrap_or(f32::INFINITY);
                if results.len() < ef || neighbor_dist < worst {
                    candidates.push((Reverse(OrderedFloat(neighbor_dist)), neighbor));
                    results.push((OrderedFloat(neighbor_dist), neighbor));
                    if results.len() > ef {
                        results.pop();
                    }
                }
            }
        }

        let mut out: Vec<(u32, f32)> = results
            .into_iter()
            .map(|(dist, idx)| (idx, dist.0))
            .collect();
        out.sort_by_key(|&(idx, dist)| (OrderedFloat(dist), idx));
        out
    }

    /// Insert a vector; the returned id is its dense index, assigned in
    /// insertion order.
    pub fn insert(&mut self, vector: &Vector) -> u32 {
        let node_idx = self.nodes.len() as u32;
        let normalized = vector.normalized();
        let layer = self.select_layer();

        self.vectors.push(normalized.clone());
        self.nodes.push(AnnNode {
            layers: vec![Neighbors::new(); layer + 1],
        });

        if node_idx == 0 {
            self.entry_point = 0;
            return node_idx;
        }

        // Greedy descent from the entry point through the layers above
        // the new node's own.
        let mut entry = self.entry_point;
        let top = self.nodes[entry as usize].layers.len().saturating_sub(1);
        for l in ((layer + 1)..=top).rev() {
            if let Some(&(best, _)) = self.search_layer(&normalized, entry, 1, l).first() {
                entry = best;
            }
        }

        for l in (0..=layer.min(top)).rev() {
            let candidates = self.search_layer(&normalized, entry, self.ef_construction, l);
            if let Some(&(best, _)) = candidates.first() {
                entry = best;
            }

            let neighbors: Vec<u32> = candidates
                .iter()
                .take(self.max_connections)
                .map(|&(idx, _)| idx)
                .collect();
            self.nodes[node_idx as usize].layers[l] = neighbors.iter().copied().collect();

            for &neighbor in &neighbors {
                if l < self.nodes[neighbor as usize].layers.len() {
                    self.nodes[neighbor as usize].layers[l].push(node_idx);
                    if self.nodes[neighbor as usize].layers[l].len() > self.max_connections * 2 {
                        self.prune(neighbor, l);
                    }
                }
            }
        }

        if layer > top {
            // The new node carries the tallest layer stack and becomes
            // the entry point for subsequent searches.
            self.entry_point = node_idx;
        }

        node_idx
    }

    /// Keep only the nearest links when a node's adjacency overflows.
    fn prune(&mut self, node: u32, layer: usize) {
        let anchor = self.vectors[node as usize].clone();
        let mut links: Vec<u32> = self.nodes[node as usize].layers[layer].to_vec();
        links.sort_by_key(|&other| (OrderedFloat(1.0 - anchor.dot(&self.vectors[other as usize])), other));
        links.truncate(self.max_connections * 2);
        self.nodes[node as usize].layers[layer] = links.into_iter().collect();
    }

    /// Return up to `ef` candidate ids with their cosine similarity,
    /// descending.
    pub fn search(&self, query: &Vector, ef: usize) -> Vec<(u32, f32)> {
        if self.nodes.is_empty() {
            return Vec::new();
        }
        let normalized = query.normalized();

        let mut entry = self.entry_point;
        let top = self.nodes[entry as usize].layers.len().saturating_sub(1);
        for layer in (1..=top).rev() {
            if let Some(&(best, _)) = self.search_layer(&normalized, entry, 1, layer).first() {
                entry = best;
            }
        }

        self.search_layer(&normalized, entry, ef.max(1), 0)
            .into_iter()
            .map(|(idx, dist)| (idx, 1.0 - dist))
            .collect()
    }
}
