// Integration tests for partx
use partx::prelude::*;
use partx_core::{ComplianceStatus, ConsolidationScenario, ScenarioStatus, SourceRef};
use std::sync::Arc;
use std::time::Duration;

fn sample_part(id: &str, description: &str, category: &str) -> Part {
    Part {
        global_id: id.to_string(),
        source: SourceRef::new("plm_a", id),
        description: description.to_string(),
        material: "stainless steel".to_string(),
        dimensions: "12x8x8mm".to_string(),
        weight: 0.05,
        cost: 1.25,
        benchmark_cost: 1.10,
        category: category.to_string(),
        compliance_status: ComplianceStatus::Compliant,
        business_unit: "Industrial".to_string(),
    }
}

fn sample_supplier(id: &str, rating: f64, lead: f64, preferred: bool) -> Supplier {
    Supplier {
        supplier_id: id.to_string(),
        name: format!("Supplier {id}"),
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

fn ops_with_vectors(parts: &[(&str, Vec<f32>)]) -> SourcingOps {
    let dim = parts[0].1.len();
    let catalog = Arc::new(Catalog::new(CatalogConfig { vector_dim: dim }));
    for (id, vector) in parts {
        catalog.upsert_part(sample_part(id, &format!("part {id}"), "Valve"));
        catalog
            .set_vector(id, Vector::new(vector.clone()))
            .unwrap();
    }
    SourcingOps::new(catalog, SimilarityConfig::default())
}

#[test]
fn test_preferred_supplier_risk_assessment() {
    let catalog = Arc::new(Catalog::default());
    catalog.upsert_supplier(sample_supplier("SUP001", 4.8, 10.0, true));
    let ops = SourcingOps::new(catalog, SimilarityConfig::default());

    let assessment = ops.assess_supplier_risk("SUP001").unwrap();
    assert!(assessment.composite_risk < 0.3);
    assert_eq!(
        assessment.recommendation,
        "Low risk - Recommended for strategic partnership"
    );

    // Every score stays within the documented bounds.
    for value in [
        assessment.financial_risk,
        assessment.delivery_risk,
        assessment.quality_risk,
        assessment.composite_risk,
    ] {
        assert!((0.05..=1.0).contains(&value), "{value}");
    }
    assert!(assessment.supply_continuity <= 0.99);
}

#[test]
fn test_unknown_supplier_is_not_found() {
    let ops = SourcingOps::new(Arc::new(Catalog::default()), SimilarityConfig::default());
    let err = ops.assess_supplier_risk("SUP404").unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_retooling_cost_rules() {
    let ops = SourcingOps::new(Arc::new(Catalog::default()), SimilarityConfig::default());

    // Same-region moves cost the flat base regardless of family.
    assert_eq!(
        ops.calculate_retooling_cost("NA", "NA", "valve").unwrap(),
        2_500.00
    );
    // Cross-region moves price by part family.
    assert_eq!(
        ops.calculate_retooling_cost("NA", "EU", "motor").unwrap(),
        22_000.00
    );
    // Unknown regions are rejected, not defaulted.
    assert!(ops.calculate_retooling_cost("XX", "EU", "motor").is_err());
}

#[test]
fn test_duplicate_pair_and_singleton() {
    // G1/G2 at cosine 0.95 (score 95 >= 90); G3 orthogonal to both.
    let ops = ops_with_vectors(&[
        ("G000000001", vec![1.0, 0.0]),
        ("G000000002", vec![0.95, 0.312_249_9]),
        ("G000000003", vec![0.0, 1.0]),
    ]);

    let report = ops.run_dedup().unwrap();
    assert!(report.is_duplicate("G000000001"));
    assert!(report.is_duplicate("G000000002"));
    assert!(!report.is_duplicate("G000000003"));

    let pair = report.cluster_for("G000000001").unwrap();
    assert_eq!(pair.members, vec!["G000000001", "G000000002"]);
    assert_eq!(pair.key, "DUP-G000000001");
}

#[test]
fn test_find_similar_parts_ordering() {
    let ops = ops_with_vectors(&[
        ("G000000001", vec![1.0, 0.0]),
        ("G000000002", vec![0.95, 0.312_249_9]),
        ("G000000003", vec![0.8, 0.6]),
    ]);

    let matches = ops.find_similar_parts("G000000001", 10, 0.0, None).unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].part_id, "G000000002");
    assert!(matches[0].score > matches[1].score);

    // A floor above the weaker match drops it.
    let matches = ops.find_similar_parts("G000000001", 10, 90.0, None).unwrap();
    assert_eq!(matches.len(), 1);
}

#[test]
fn test_similarity_on_unembedded_part() {
    let catalog = Arc::new(Catalog::new(CatalogConfig { vector_dim: 2 }));
    catalog.upsert_part(sample_part("G000000001", "bare part", "Valve"));
    let ops = SourcingOps::new(catalog, SimilarityConfig::default());

    let err = ops.find_similar_parts("G000000001", 5, 0.0, None).unwrap_err();
    assert!(matches!(err, Error::VectorMissing(_)));
}

#[test]
fn test_scenario_roi_recomputed() {
    let catalog = Arc::new(Catalog::default());
    catalog.upsert_supplier(sample_supplier("SUP001", 4.8, 10.0, true));
    catalog
        .upsert_scenario(ConsolidationScenario {
            scenario_id: "CONS001".to_string(),
            name: "NA Fastener Consolidation".to_string(),
            source_suppliers: vec!["SUP003".to_string(), "SUP010".to_string()],
            target_supplier: "SUP001".to_string(),
            parts_affected: 145,
            projected_savings: 285_000.0,
            implementation_cost: 45_000.0,
            status: ScenarioStatus::Proposed,
        })
        .unwrap();
    let ops = SourcingOps::new(catalog, SimilarityConfig::default());

    let eval = ops.get_consolidation_scenario("CONS001").unwrap();
    let expected = (285_000.0 - 45_000.0) / 45_000.0 * 100.0;
    assert!((eval.roi_pct - expected).abs() < 1e-9);
    assert!((eval.net_benefit - 240_000.0).abs() < 1e-9);
    assert!(!eval.target_supplier_risk.estimated);

    let err = ops.get_consolidation_scenario("CONS404").unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_recommend_suppliers_filters_and_ranks() {
    let catalog = Arc::new(Catalog::default());
    catalog.upsert_supplier(sample_supplier("SUP001", 4.8, 10.0, true));
    catalog.upsert_supplier(sample_supplier("SUP002", 4.2, 20.0, false));
    catalog.upsert_supplier(sample_supplier("SUP003", 3.0, 10.0, false)); // below min_rating
    catalog.upsert_supplier(sample_supplier("SUP004", 4.5, 45.0, false)); // too slow
    let ops = SourcingOps::new(catalog, SimilarityConfig::default());

    let ranked = ops.recommend_supplier("Valve", 4.0, 30.0).unwrap();
    let ids: Vec<&str> = ranked.iter().map(|r| r.supplier_id.as_str()).collect();
    assert_eq!(ids, vec!["SUP001", "SUP002"]);
    assert!(ranked[0].recommendation_score > ranked[1].recommendation_score);
    assert!(ranked.len() <= 5);
}

#[test]
fn test_dedup_single_flight_across_threads() {
    let ops = Arc::new(ops_with_vectors(&[
        ("G000000001", vec![1.0, 0.0]),
        ("G000000002", vec![0.95, 0.312_249_9]),
        ("G000000003", vec![0.0, 1.0]),
    ]));

    let handles: Vec<_> = (0..6)
        .map(|_| {
            let ops = Arc::clone(&ops);
            std::thread::spawn(move || ops.run_dedup().unwrap())
        })
        .collect();

    let reports: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for report in &reports[1..] {
        assert_eq!(report.clusters, reports[0].clusters);
    }
}

#[test]
fn test_exhausted_timeout_surfaces_through_dedup() {
    let ops = ops_with_vectors(&[
        ("G000000001", vec![1.0, 0.0]),
        ("G000000002", vec![0.95, 0.312_249_9]),
        ("G000000003", vec![0.0, 1.0]),
    ])
    .with_compute_timeout(Some(Duration::ZERO));

    let err = ops.run_dedup().unwrap_err();
    assert!(matches!(err, Error::ComputationTimeout { .. }));

    let err = ops
        .find_similar_parts("G000000001", 5, 0.0, None)
        .unwrap_err();
    assert!(matches!(err, Error::ComputationTimeout { .. }));
}

#[test]
fn test_embedded_catalog_end_to_end() {
    let catalog = Arc::new(Catalog::new(CatalogConfig { vector_dim: 128 }));
    catalog.upsert_part(sample_part(
        "G000000001",
        "hex bolt m8x20 zinc plated",
        "Fastener",
    ));
    catalog.upsert_part(sample_part(
        "G000000002",
        "hex bolt m8x20 zinc coated",
        "Fastener",
    ));
    catalog.upsert_part(sample_part(
        "G000000003",
        "pressure transducer 0-100 psi",
        "Sensor",
    ));
    embed_catalog(&catalog, &HashEmbedder::new(128)).unwrap();

    let ops = SourcingOps::new(catalog, SimilarityConfig::default());
    let matches = ops.find_similar_parts("G000000001", 5, 0.0, None).unwrap();
    // The near-identical bolt outranks the sensor.
    assert_eq!(matches[0].part_id, "G000000002");
}
