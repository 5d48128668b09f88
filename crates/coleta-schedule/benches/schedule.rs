use chrono::{Days, NaiveDate};
use coleta_core::config::ScheduleConfig;
use coleta_core::model::{Category, CollectionEvent, EstablishmentId, EstablishmentRef};
use coleta_schedule::{project_with, reduce};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

const TIERS: &[(&str, usize)] = &[("small", 1_000), ("medium", 10_000), ("large", 100_000)];

/// Deterministic history: 200 establishments, 8 items each, newest first.
fn synthetic_history(count: usize) -> Vec<CollectionEvent> {
    let base = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default();
    (0..count)
        .map(|i| {
            let est = (i % 200) as i64;
            let item = i % 8;
            let category = if item == 0 {
                Category::Water
            } else {
                Category::Product
            };
            CollectionEvent {
                requisition_id: (count - i) as i64,
                establishment: Some(EstablishmentRef {
                    id: EstablishmentId(est),
                    name: format!("Estabelecimento {est}"),
                }),
                category,
                product_name: Some(format!("Produto {item}")),
                collection_date: base.checked_add_days(Days::new((count - i) as u64 % 1_500)),
                frequency_days: Some(if item == 7 { 0 } else { 30 }),
            }
        })
        .collect()
}

fn bench_schedule(c: &mut Criterion) {
    let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap_or_default();
    let config = ScheduleConfig::default();
    let mut group = c.benchmark_group("schedule");

    for &(name, count) in TIERS {
        let history = synthetic_history(count);
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("reduce", name), &history, |b, history| {
            b.iter(|| black_box(reduce(history)));
        });

        group.bench_with_input(
            BenchmarkId::new("reduce_project", name),
            &history,
            |b, history| b.iter(|| black_box(project_with(reduce(history), today, &config))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_schedule);
criterion_main!(benches);
