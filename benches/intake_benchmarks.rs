use chrono::Utc;
use cordo_intake::projections::{draft_view, project};
use cordo_intake::{
    Catalog, Category, InMemorySnapshotStore, OrderDraft, PersistenceGateway, PhotoRef, Service,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

fn bench_catalog(size: i64) -> Catalog {
    Catalog::from_services((0..size).map(|id| Service {
        id,
        name: format!("service {id}"),
        description: None,
        price: Decimal::new(500 + id * 25, 2),
        category: if id % 2 == 0 { Category::Men } else { Category::Women },
        requires_note: id % 7 == 0,
    }))
}

fn bench_draft(pairs: usize, catalog: &Catalog, rng: &mut StdRng) -> OrderDraft {
    let mut draft = OrderDraft::empty();
    for n in 0..pairs {
        let id = draft.add_pair();
        let category = if rng.gen_bool(0.5) {
            Category::Men
        } else {
            Category::Women
        };
        draft.set_category(id, category).unwrap();
        let offered: Vec<i64> = catalog.services_for(category).iter().map(|s| s.id).collect();
        for _ in 0..rng.gen_range(1..=4) {
            let service = offered[rng.gen_range(0..offered.len())];
            let _ = draft.toggle_service(id, service, catalog);
        }
        let _ = draft.set_photo(
            id,
            PhotoRef {
                url: format!("https://cdn.example.fr/{n}.jpg"),
                filename: format!("{n}.jpg"),
            },
        );
        let _ = draft.validate_pair(id);
    }
    draft
}

fn benchmark_projection(c: &mut Criterion) {
    let catalog = bench_catalog(60);
    let mut rng = StdRng::seed_from_u64(7);
    let mut group = c.benchmark_group("projection");

    for pairs in [1usize, 10, 50] {
        let draft = bench_draft(pairs, &catalog, &mut rng);
        group.bench_with_input(BenchmarkId::new("recap", pairs), &draft, |b, draft| {
            b.iter(|| project(black_box(draft.pairs()), &catalog));
        });
        group.bench_with_input(BenchmarkId::new("view", pairs), &draft, |b, draft| {
            b.iter(|| draft_view(black_box(draft), &catalog));
        });
    }
    group.finish();
}

fn benchmark_snapshot(c: &mut Criterion) {
    let catalog = bench_catalog(60);
    let mut rng = StdRng::seed_from_u64(11);
    let mut group = c.benchmark_group("snapshot");

    for pairs in [1usize, 10, 50] {
        let draft = bench_draft(pairs, &catalog, &mut rng);
        let gateway = PersistenceGateway::new(InMemorySnapshotStore::new());

        group.bench_with_input(BenchmarkId::new("save", pairs), &draft, |b, draft| {
            b.iter(|| gateway.save_at(black_box(draft), Utc::now()));
        });

        gateway.save(&draft);
        group.bench_function(BenchmarkId::new("load", pairs), |b| {
            b.iter(|| gateway.load(black_box(&catalog)));
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_projection, benchmark_snapshot);
criterion_main!(benches);
