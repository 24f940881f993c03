//! Maverick spend analysis over the purchase-order history.
//!
//! Maverick orders are purchases placed outside negotiated contracts;
//! the flag arrives on the order record from the source system. The
//! summary aggregates spend per supplier so the dashboard can surface
//! off-contract leakage candidates for consolidation.

use ahash::AHashMap;
use partx_core::Catalog;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SupplierSpend {
    pub supplier_id: String,
    pub total_spend: f64,
    pub maverick_spend: f64,
    pub order_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpendSummary {
    pub total_spend: f64,
    pub maverick_spend: f64,
    /// Maverick share of total spend in [0, 100]; 0 when no spend exists.
    pub maverick_pct: f64,
    /// Per-supplier rows, descending by maverick spend then supplier id.
    pub by_supplier: Vec<SupplierSpend>,
}

/// Aggregate order history into a spend summary.
pub fn spend_summary(catalog: &Catalog) -> SpendSummary {
    let mut by_supplier: AHashMap<String, SupplierSpend> = AHashMap::new();
    let mut total_spend = 0.0;
    let mut maverick_spend = 0.0;

    for order in catalog.orders() {
        total_spend += order.total_amount;
        let row = by_supplier
            .entry(order.supplier_id.clone())
            .or_insert_with(|| SupplierSpend {
                supplier_id: order.supplier_id.clone(),
                total_spend: 0.0,
                maverick_spend: 0.0,
                order_count: 0,
            });
        row.total_spend += order.total_amount;
        row.order_count += 1;
        if order.is_maverick {
            row.maverick_spend += order.total_amount;
            maverick_spend += order.total_amount;
        }
    }

    let mut rows: Vec<SupplierSpend> = by_supplier.into_values().collect();
    rows.sort_by(|a, b| {
        b.maverick_spend
            .total_cmp(&a.maverick_spend)
            .then_with(|| a.supplier_id.cmp(&b.supplier_id))
    });

    let maverick_pct = if total_spend > 0.0 {
        maverick_spend / total_spend * 100.0
    } else {
        0.0
    };

    SpendSummary {
        total_spend,
        maverick_spend,
        maverick_pct,
        by_supplier: rows,
    }
}
