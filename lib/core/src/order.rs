use serde::{Deserialize, Serialize};

/// Purchase order line joined against the part and supplier masters.
/// Carries the fields the analytics actually read; the source export has
/// more columns (dates, status) that are dropped at ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub po_id: String,
    pub part_global_id: String,
    pub supplier_id: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub total_amount: f64,
    /// Off-contract spend flag.
    pub is_maverick: bool,
}
