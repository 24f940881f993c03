// Performance benchmarks for the partx similarity scan
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use partx::prelude::*;
use partx_core::{ComplianceStatus, SourceRef};
use rand::prelude::*;
use std::sync::Arc;

const DIM: usize = 128;

fn random_vector(rng: &mut StdRng) -> Vector {
    let data: Vec<f32> = (0..DIM).map(|_| rng.random_range(-1.0f32..1.0f32)).collect();
    Vector::new(data)
}

fn seeded_catalog(size: usize) -> Arc<Catalog> {
    let mut rng = StdRng::seed_from_u64(1234);
    let catalog = Arc::new(Catalog::new(CatalogConfig { vector_dim: DIM }));
    for i in 0..size {
        let id = format!("G{:09}", i + 1);
        catalog.upsert_part(Part {
            global_id: id.clone(),
            source: SourceRef::new("plm_a", &id),
            description: format!("synthetic part {i}"),
            material: "steel".to_string(),
            dimensions: "10x10x10".to_string(),
            weight: 1.0,
            cost: 10.0,
            benchmark_cost: 9.0,
            category: "Valve".to_string(),
            compliance_status: ComplianceStatus::Unknown,
            business_unit: "Industrial".to_string(),
        });
        catalog.set_vector(&id, random_vector(&mut rng)).unwrap();
    }
    catalog
}

fn benchmark_top_k(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_top_k");

    for size in [500, 2000].iter() {
        let index = SimilarityIndex::build(&seeded_catalog(*size), SimilarityConfig::default());
        group.bench_with_input(BenchmarkId::new("exhaustive", size), size, |b, _| {
            let budget = ComputeBudget::unbounded();
            b.iter(|| {
                let matches = index
                    .find_top_k(black_box("G000000001"), 10, 0.0, None, &budget)
                    .unwrap();
                black_box(matches);
            });
        });
    }

    group.finish();
}

fn benchmark_edge_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_edges");
    group.sample_size(10);

    let index = SimilarityIndex::build(&seeded_catalog(1000), SimilarityConfig::default());
    group.bench_function("1000_parts", |b| {
        let budget = ComputeBudget::unbounded();
        b.iter(|| {
            let edges = index.build_edges(&budget).unwrap();
            black_box(edges);
        });
    });

    group.finish();
}

fn benchmark_dedup(c: &mut Criterion) {
    let mut group = c.benchmark_group("dedup");
    group.sample_size(10);

    let ops = SourcingOps::new(seeded_catalog(1000), SimilarityConfig::default());
    group.bench_function("1000_parts_cached", |b| {
        // First run computes; subsequent iterations measure the cache path.
        b.iter(|| {
            let report = ops.run_dedup().unwrap();
            black_box(report);
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_top_k, benchmark_edge_build, benchmark_dedup);
criterion_main!(benches);
