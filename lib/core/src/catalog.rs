use crate::{
    ConsolidationScenario, Error, Part, PurchaseOrder, Result, Supplier, Vector,
};
use ahash::AHashMap;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Configuration for a catalog snapshot.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Expected embedding dimension; cached vectors must match.
    pub vector_dim: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self { vector_dim: 256 }
    }
}

/// In-memory snapshot of the merged catalog and procurement masters.
///
/// All analytics read from an immutable view of this state; writers bump
/// the snapshot version so derived results (similarity edges, duplicate
/// clusters) can be tied to the exact snapshot they were computed from.
pub struct Catalog {
    config: CatalogConfig,
    parts: RwLock<AHashMap<String, Part>>,
    /// Embedding cache, keyed by part global id. Derived data only.
    vectors: RwLock<AHashMap<String, Vector>>,
    suppliers: RwLock<AHashMap<String, Supplier>>,
    scenarios: RwLock<AHashMap<String, ConsolidationScenario>>,
    orders: RwLock<Vec<PurchaseOrder>>,
    version: AtomicU64,
}

impl Catalog {
    pub fn new(config: CatalogConfig) -> Self {
        Self {
            config,
            parts: RwLock::new(AHashMap::new()),
            vectors: RwLock::new(AHashMap::new()),
            suppliers: RwLock::new(AHashMap::new()),
            scenarios: RwLock::new(AHashMap::new()),
            orders: RwLock::new(Vec::new()),
            version: AtomicU64::new(0),
        }
    }

    pub fn vector_dim(&self) -> usize {
        self.config.vector_dim
    }

    /// Monotonic snapshot version; bumped on every write.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    fn bump(&self) {
        self.version.fetch_add(1, Ordering::AcqRel);
    }

    // ---- parts ----

    pub fn upsert_part(&self, part: Part) {
        self.parts.write().insert(part.global_id.clone(), part);
        self.bump();
    }

    pub fn part(&self, global_id: &str) -> Option<Part> {
        self.parts.read().get(global_id).cloned()
    }

    pub fn part_count(&self) -> usize {
        self.parts.read().len()
    }

    /// All parts, ascending by global id. Sorted so every batch pass over
    /// the catalog is order-independent of insertion history.
    pub fn parts_sorted(&self) -> Vec<Part> {
        let mut parts: Vec<Part> = self.parts.read().values().cloned().collect();
        parts.sort_by(|a, b| a.global_id.cmp(&b.global_id));
        parts
    }

    // ---- embedding cache ----

    pub fn set_vector(&self, global_id: &str, vector: Vector) -> Result<()> {
        if vector.dim() != self.config.vector_dim {
            return Err(Error::InvalidDimension {
                expected: self.config.vector_dim,
                actual: vector.dim(),
            });
        }
        if !self.parts.read().contains_key(global_id) {
            return Err(Error::PartNotFound(global_id.to_string()));
        }
        self.vectors.write().insert(global_id.to_string(), vector);
        self.bump();
        Ok(())
    }

    pub fn vector(&self, global_id: &str) -> Option<Vector> {
        self.vectors.read().get(global_id).cloned()
    }

    pub fn vector_count(&self) -> usize {
        self.vectors.read().len()
    }

    /// Drop all cached vectors (e.g. when the embedding provider or its
    /// dimension changes).
    pub fn clear_vectors(&self) {
        self.vectors.write().clear();
        self.bump();
    }

    // ---- suppliers ----

    pub fn upsert_supplier(&self, supplier: Supplier) {
        self.suppliers
            .write()
            .insert(supplier.supplier_id.clone(), supplier);
        self.bump();
    }

    pub fn supplier(&self, supplier_id: &str) -> Option<Supplier> {
        self.suppliers.read().get(supplier_id).cloned()
    }

    pub fn supplier_count(&self) -> usize {
        self.suppliers.read().len()
    }

    /// All suppliers, ascending by supplier id.
    pub fn suppliers_sorted(&self) -> Vec<Supplier> {
        let mut suppliers: Vec<Supplier> = self.suppliers.read().values().cloned().collect();
        suppliers.sort_by(|a, b| a.supplier_id.cmp(&b.supplier_id));
        suppliers
    }

    // ---- scenarios ----

    pub fn upsert_scenario(&self, scenario: ConsolidationScenario) -> Result<()> {
        scenario.validate()?;
        self.scenarios
            .write()
            .insert(scenario.scenario_id.clone(), scenario);
        self.bump();
        Ok(())
    }

    pub fn scenario(&self, scenario_id: &str) -> Option<ConsolidationScenario> {
        self.scenarios.read().get(scenario_id).cloned()
    }

    pub fn scenario_count(&self) -> usize {
        self.scenarios.read().len()
    }

    // ---- purchase orders ----

    pub fn push_orders(&self, mut orders: Vec<PurchaseOrder>) {
        self.orders.write().append(&mut orders);
        self.bump();
    }

    pub fn orders(&self) -> Vec<PurchaseOrder> {
        self.orders.read().clone()
    }

    /// Part categories each supplier has actually supplied, derived from
    /// the purchase-order history joined against the part master.
    pub fn supplier_categories(&self) -> AHashMap<String, Vec<String>> {
        let parts = self.parts.read();
        let orders = self.orders.read();

        let mut out: AHashMap<String, Vec<String>> = AHashMap::new();
        for order in orders.iter() {
            if let Some(part) = parts.get(&order.part_global_id) {
                let categories = out.entry(order.supplier_id.clone()).or_default();
                if !categories.contains(&part.category) {
                    categories.push(part.category.clone());
                }
            }
        }
        for categories in out.values_mut() {
            categories.sort();
        }
        out
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(CatalogConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ComplianceStatus, SourceRef};

    fn part(id: &str, category: &str) -> Part {
        Part {
            global_id: id.to_string(),
            source: SourceRef::new("plm_a", id),
            description: "test part".to_string(),
            material: "steel".to_string(),
            dimensions: "1x1x1".to_string(),
            weight: 1.0,
            cost: 10.0,
            benchmark_cost: 9.0,
            category: category.to_string(),
            compliance_status: ComplianceStatus::Unknown,
            business_unit: "BU1".to_string(),
        }
    }

    #[test]
    fn test_vector_dim_enforced() {
        let catalog = Catalog::new(CatalogConfig { vector_dim: 3 });
        catalog.upsert_part(part("G000000001", "Valve"));

        let bad = catalog.set_vector("G000000001", Vector::new(vec![1.0, 0.0]));
        assert!(matches!(bad, Err(Error::InvalidDimension { .. })));

        let ok = catalog.set_vector("G000000001", Vector::new(vec![1.0, 0.0, 0.0]));
        assert!(ok.is_ok());
    }

    #[test]
    fn test_vector_requires_part() {
        let catalog = Catalog::new(CatalogConfig { vector_dim: 2 });
        let err = catalog.set_vector("G999999999", Vector::new(vec![1.0, 0.0]));
        assert!(matches!(err, Err(Error::PartNotFound(_))));
    }

    #[test]
    fn test_version_bumps_on_writes() {
        let catalog = Catalog::new(CatalogConfig { vector_dim: 2 });
        let v0 = catalog.version();
        catalog.upsert_part(part("G000000001", "Valve"));
        assert!(catalog.version() > v0);
    }

    #[test]
    fn test_parts_sorted_is_order_independent() {
        let catalog = Catalog::new(CatalogConfig { vector_dim: 2 });
        catalog.upsert_part(part("G000000002", "Valve"));
        catalog.upsert_part(part("G000000001", "Motor"));

        let ids: Vec<String> = catalog
            .parts_sorted()
            .into_iter()
            .map(|p| p.global_id)
            .collect();
        assert_eq!(ids, vec!["G000000001", "G000000002"]);
    }

    #[test]
    fn test_supplier_categories_join() {
        let catalog = Catalog::new(CatalogConfig { vector_dim: 2 });
        catalog.upsert_part(part("G000000001", "Valve"));
        catalog.upsert_part(part("G000000002", "Motor"));
        catalog.push_orders(vec![
            PurchaseOrder {
                po_id: "PO000001".to_string(),
                part_global_id: "G000000001".to_string(),
                supplier_id: "SUP001".to_string(),
                quantity: 10.0,
                unit_price: 5.0,
                total_amount: 50.0,
                is_maverick: false,
            },
            PurchaseOrder {
                po_id: "PO000002".to_string(),
                part_global_id: "G000000002".to_string(),
                supplier_id: "SUP001".to_string(),
                quantity: 1.0,
                unit_price: 100.0,
                total_amount: 100.0,
                is_maverick: true,
            },
        ]);

        let categories = catalog.supplier_categories();
        assert_eq!(
            categories.get("SUP001").unwrap(),
            &vec!["Motor".to_string(), "Valve".to_string()]
        );
    }
}
