//! CSV ingestion for the catalog and procurement masters.
//!
//! Reads the source-system exports (`part_master.csv`,
//! `supplier_master.csv`, `consolidation_scenarios.csv`,
//! `purchase_orders.csv`) with their original uppercase headers. Part
//! records are merged into the catalog by `(SOURCE_SYSTEM, LOCAL_ID)` and
//! receive a `G%09d` global id at ingestion when the export does not carry
//! one. Malformed rows are errors, not silent skips; missing files are
//! tolerated so suppliers-only workloads can run without a part master.

use crate::{
    Catalog, ComplianceStatus, ConsolidationScenario, Part, PurchaseOrder, Result,
    ScenarioStatus, SourceRef, Supplier, SupplierTier,
};
use ahash::AHashMap;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct SupplierRecord {
    #[serde(rename = "SUPPLIER_ID")]
    supplier_id: String,
    #[serde(rename = "SUPPLIER_NAME")]
    supplier_name: String,
    #[serde(rename = "SUPPLIER_REGION")]
    supplier_region: String,
    #[serde(rename = "RATING")]
    rating: f64,
    #[serde(rename = "AVG_LEAD_TIME_DAYS")]
    avg_lead_time_days: f64,
    #[serde(rename = "PREFERRED_FLAG", deserialize_with = "deserialize_bool")]
    preferred_flag: bool,
    #[serde(rename = "TOTAL_SPEND", default)]
    total_spend: f64,
    #[serde(rename = "SUPPLIER_TIER", default)]
    supplier_tier: String,
    #[serde(rename = "CONTRACT_END_DATE", default)]
    contract_end_date: Option<String>,
    #[serde(rename = "QUALITY_CERTIFICATION", default)]
    quality_certification: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PartRecord {
    #[serde(rename = "GLOBAL_ID", default)]
    global_id: Option<String>,
    #[serde(rename = "LOCAL_ID")]
    local_id: String,
    #[serde(rename = "SOURCE_SYSTEM")]
    source_system: String,
    #[serde(rename = "DESCRIPTION")]
    description: String,
    #[serde(rename = "MATERIAL", default)]
    material: String,
    #[serde(rename = "DIMENSIONS", default)]
    dimensions: String,
    #[serde(rename = "WEIGHT", default)]
    weight: f64,
    #[serde(rename = "UNIT_COST", default)]
    unit_cost: f64,
    #[serde(rename = "BENCHMARK_COST", default)]
    benchmark_cost: f64,
    #[serde(rename = "CATEGORY", default)]
    category: String,
    #[serde(rename = "COMPLIANCE_STATUS", default)]
    compliance_status: String,
    #[serde(rename = "BUSINESS_UNIT", default)]
    business_unit: String,
}

#[derive(Debug, Deserialize)]
struct ScenarioRecord {
    #[serde(rename = "SCENARIO_ID")]
    scenario_id: String,
    #[serde(rename = "SCENARIO_NAME")]
    scenario_name: String,
    /// JSON array string, e.g. `["SUP003", "SUP010"]`.
    #[serde(rename = "SOURCE_SUPPLIERS")]
    source_suppliers: String,
    #[serde(rename = "TARGET_SUPPLIER_ID")]
    target_supplier_id: String,
    #[serde(rename = "PARTS_AFFECTED")]
    parts_affected: u32,
    #[serde(rename = "PROJECTED_SAVINGS")]
    projected_savings: f64,
    #[serde(rename = "IMPLEMENTATION_COST")]
    implementation_cost: f64,
    #[serde(rename = "STATUS")]
    status: String,
}

#[derive(Debug, Deserialize)]
struct OrderRecord {
    #[serde(rename = "PO_ID")]
    po_id: String,
    #[serde(rename = "PART_GLOBAL_ID")]
    part_global_id: String,
    #[serde(rename = "SUPPLIER_ID")]
    supplier_id: String,
    #[serde(rename = "QUANTITY")]
    quantity: f64,
    #[serde(rename = "UNIT_PRICE")]
    unit_price: f64,
    #[serde(rename = "TOTAL_AMOUNT")]
    total_amount: f64,
    #[serde(rename = "IS_MAVERICK", deserialize_with = "deserialize_bool")]
    is_maverick: bool,
}

/// Accepts the boolean spellings the source exports actually contain.
fn deserialize_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Ok(true),
        "false" | "0" | "no" | "n" | "" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "invalid boolean: {other}"
        ))),
    }
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// Parse supplier master rows.
pub fn read_suppliers<R: Read>(reader: R) -> Result<Vec<Supplier>> {
    let mut out = Vec::new();
    for row in csv_reader(reader).deserialize() {
        let record: SupplierRecord = row?;
        let contract_end_date = record
            .contract_end_date
            .as_deref()
            .filter(|s| !s.is_empty())
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());
        out.push(Supplier {
            supplier_id: record.supplier_id,
            name: record.supplier_name,
            region: record.supplier_region,
            rating: record.rating,
            avg_lead_time_days: record.avg_lead_time_days,
            preferred_flag: record.preferred_flag,
            tier: SupplierTier::parse(&record.supplier_tier),
            total_spend: record.total_spend,
            contract_end_date,
            quality_certification: record
                .quality_certification
                .filter(|s| !s.is_empty()),
        });
    }
    Ok(out)
}

/// Parse part master rows, merging by `(source_system, local_id)` and
/// assigning global ids where the export lacks them.
pub fn read_parts<R: Read>(reader: R) -> Result<Vec<Part>> {
    let mut out: Vec<Part> = Vec::new();
    let mut merged: AHashMap<(String, String), usize> = AHashMap::new();
    let mut next_seq: u64 = 1;

    for row in csv_reader(reader).deserialize() {
        let record: PartRecord = row?;
        let key = (record.source_system.clone(), record.local_id.clone());
        if let Some(&idx) = merged.get(&key) {
            // Re-export of an already merged part: the latest attributes win.
            let global_id = out[idx].global_id.clone();
            out[idx] = to_part(record, global_id);
            continue;
        }

        let global_id = match &record.global_id {
            Some(id) if !id.is_empty() => id.clone(),
            _ => {
                let id = format!("G{next_seq:09}");
                next_seq += 1;
                id
            }
        };
        merged.insert(key, out.len());
        out.push(to_part(record, global_id));
    }
    Ok(out)
}

fn to_part(record: PartRecord, global_id: String) -> Part {
    Part {
        global_id,
        source: SourceRef::new(record.source_system, record.local_id),
        description: record.description,
        material: record.material,
        dimensions: record.dimensions,
        weight: record.weight,
        cost: record.unit_cost,
        benchmark_cost: record.benchmark_cost,
        category: record.category,
        compliance_status: ComplianceStatus::parse(&record.compliance_status),
        business_unit: record.business_unit,
    }
}

/// Parse consolidation scenario rows. Any ROI column in the export is
/// ignored: ROI is derived at read time, never loaded.
pub fn read_scenarios<R: Read>(reader: R) -> Result<Vec<ConsolidationScenario>> {
    let mut out = Vec::new();
    for row in csv_reader(reader).deserialize() {
        let record: ScenarioRecord = row?;
        let source_suppliers: Vec<String> = serde_json::from_str(&record.source_suppliers)
            .map_err(|e| {
                crate::Error::Serialization(format!(
                    "scenario {}: bad SOURCE_SUPPLIERS: {e}",
                    record.scenario_id
                ))
            })?;
        let scenario = ConsolidationScenario {
            scenario_id: record.scenario_id,
            name: record.scenario_name,
            source_suppliers,
            target_supplier: record.target_supplier_id,
            parts_affected: record.parts_affected,
            projected_savings: record.projected_savings,
            implementation_cost: record.implementation_cost,
            status: ScenarioStatus::parse(&record.status)?,
        };
        scenario.validate()?;
        out.push(scenario);
    }
    Ok(out)
}

/// Parse purchase order rows.
pub fn read_orders<R: Read>(reader: R) -> Result<Vec<PurchaseOrder>> {
    let mut out = Vec::new();
    for row in csv_reader(reader).deserialize() {
        let record: OrderRecord = row?;
        out.push(PurchaseOrder {
            po_id: record.po_id,
            part_global_id: record.part_global_id,
            supplier_id: record.supplier_id,
            quantity: record.quantity,
            unit_price: record.unit_price,
            total_amount: record.total_amount,
            is_maverick: record.is_maverick,
        });
    }
    Ok(out)
}

/// Counts of what a directory load brought in.
#[derive(Debug, Default, Clone, Copy)]
pub struct IngestSummary {
    pub parts: usize,
    pub suppliers: usize,
    pub scenarios: usize,
    pub orders: usize,
}

/// Load every recognized export from `dir` into the catalog.
pub fn load_dir(dir: &Path, catalog: &Catalog) -> Result<IngestSummary> {
    let mut summary = IngestSummary::default();

    match std::fs::File::open(dir.join("part_master.csv")) {
        Ok(file) => {
            let parts = read_parts(file)?;
            summary.parts = parts.len();
            for part in parts {
                catalog.upsert_part(part);
            }
        }
        Err(_) => warn!("no part_master.csv in {dir:?}, skipping parts"),
    }

    match std::fs::File::open(dir.join("supplier_master.csv")) {
        Ok(file) => {
            let suppliers = read_suppliers(file)?;
            summary.suppliers = suppliers.len();
            for supplier in suppliers {
                catalog.upsert_supplier(supplier);
            }
        }
        Err(_) => warn!("no supplier_master.csv in {dir:?}, skipping suppliers"),
    }

    match std::fs::File::open(dir.join("consolidation_scenarios.csv")) {
        Ok(file) => {
            let scenarios = read_scenarios(file)?;
            summary.scenarios = scenarios.len();
            for scenario in scenarios {
                catalog.upsert_scenario(scenario)?;
            }
        }
        Err(_) => warn!("no consolidation_scenarios.csv in {dir:?}, skipping scenarios"),
    }

    match std::fs::File::open(dir.join("purchase_orders.csv")) {
        Ok(file) => {
            let orders = read_orders(file)?;
            summary.orders = orders.len();
            catalog.push_orders(orders);
        }
        Err(_) => warn!("no purchase_orders.csv in {dir:?}, skipping purchase orders"),
    }

    info!(
        "loaded {} parts, {} suppliers, {} scenarios, {} orders from {dir:?}",
        summary.parts, summary.suppliers, summary.scenarios, summary.orders
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUPPLIER_CSV: &str = "\
SUPPLIER_ID,SUPPLIER_NAME,SUPPLIER_REGION,RATING,AVG_LEAD_TIME_DAYS,PREFERRED_FLAG,TOTAL_SPEND,SUPPLIER_TIER,CONTRACT_END_DATE,QUALITY_CERTIFICATION
SUP001,Arctic Components,NA,4.6,12,True,1850000.50,Preferred,2027-06-30,ISO 9001
SUP005,Orchid Motion,EU,3.9,28,False,620000.90,Conditional,2026-06-30,
";

    const PART_CSV: &str = "\
GLOBAL_ID,LOCAL_ID,SOURCE_SYSTEM,DESCRIPTION,MATERIAL,DIMENSIONS,WEIGHT,UNIT_COST,BENCHMARK_COST,CATEGORY,COMPLIANCE_STATUS,BUSINESS_UNIT
,V-100,plm_a,ball valve half inch,stainless,12x8x8,0.4,42.5,39.0,Valve,compliant,Industrial
,V-100,plm_a,ball valve half inch rev2,stainless,12x8x8,0.4,43.0,39.0,Valve,compliant,Industrial
,M-200,plm_b,servo motor,aluminum,40x30x30,2.1,180.0,165.0,Motor,pending,Medical
";

    const SCENARIO_CSV: &str = "\
SCENARIO_ID,SCENARIO_NAME,SOURCE_SUPPLIERS,TARGET_SUPPLIER_ID,PARTS_AFFECTED,PROJECTED_SAVINGS,IMPLEMENTATION_COST,ROI_PCT,STATUS
CONS001,NA Fastener Consolidation,\"[\"\"SUP003\"\", \"\"SUP010\"\"]\",SUP001,145,285000.00,45000.00,533.33,proposed
";

    #[test]
    fn test_read_suppliers() {
        let suppliers = read_suppliers(SUPPLIER_CSV.as_bytes()).unwrap();
        assert_eq!(suppliers.len(), 2);
        assert_eq!(suppliers[0].supplier_id, "SUP001");
        assert!(suppliers[0].preferred_flag);
        assert_eq!(suppliers[0].tier, SupplierTier::Preferred);
        assert!(suppliers[0].contract_end_date.is_some());
        assert!(!suppliers[1].preferred_flag);
        assert!(suppliers[1].quality_certification.is_none());
    }

    #[test]
    fn test_read_parts_merges_source_pairs() {
        let parts = read_parts(PART_CSV.as_bytes()).unwrap();
        // The duplicate (plm_a, V-100) export merges into one part.
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].global_id, "G000000001");
        assert_eq!(parts[0].description, "ball valve half inch rev2");
        assert_eq!(parts[1].global_id, "G000000002");
        assert_eq!(parts[1].compliance_status, ComplianceStatus::PendingReview);
    }

    #[test]
    fn test_read_scenarios_parses_supplier_array() {
        let scenarios = read_scenarios(SCENARIO_CSV.as_bytes()).unwrap();
        assert_eq!(scenarios.len(), 1);
        assert_eq!(scenarios[0].source_suppliers, vec!["SUP003", "SUP010"]);
        assert_eq!(scenarios[0].status, ScenarioStatus::Proposed);
        // The exported ROI column is ignored; the derived value rules.
        assert!((scenarios[0].roi_pct() - 533.3333333333334).abs() < 1e-6);
    }

    #[test]
    fn test_load_dir_with_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("supplier_master.csv"), SUPPLIER_CSV).unwrap();

        let catalog = Catalog::default();
        let summary = load_dir(dir.path(), &catalog).unwrap();
        assert_eq!(summary.suppliers, 2);
        assert_eq!(summary.parts, 0);
        assert_eq!(catalog.supplier_count(), 2);
    }
}
