use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use boardlens_analytics::{
    AnalysisJob, BoardAnalysis, BoardSnapshot, DealColumns, FixedClock, Intent, MetricTag,
    coerce_deals, resolve,
};
use boardlens_core::RecordTable;
use chrono::NaiveDate;

const STAGES: &[&str] = &["Lead", "Qualified", "Proposal", "Negotiation", "Contract", "Won", "Lost", "On Hold"];
const SECTORS: &[&str] = &["Tech", "Energy", "Retail", "Health"];

fn synthetic_deals(rows: usize) -> RecordTable {
    RecordTable::from_records((0..rows).map(|i| {
        let amount = if i % 17 == 0 { "n/a".to_string() } else { (1_000 + i * 37).to_string() };
        let date = format!("2024-{:02}-{:02}", i % 12 + 1, i % 28 + 1);
        vec![
            ("Deal Name", Some(format!("deal-{i}"))),
            ("Deal Value", Some(amount)),
            ("Deal Stage", Some(STAGES[i % STAGES.len()].to_string())),
            ("Sector", (i % 11 != 0).then(|| SECTORS[i % SECTORS.len()].to_string())),
            ("Close Date", Some(date)),
        ]
    }))
}

fn synthetic_work_orders(rows: usize) -> RecordTable {
    RecordTable::from_records((0..rows).map(|i| {
        vec![
            ("Work Order", Some(format!("wo-{i}"))),
            ("Industry", Some(SECTORS[i % SECTORS.len()].to_string())),
            ("Billed Amount", Some((250 + i * 3).to_string())),
        ]
    }))
}

fn bench_full_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("board_analysis");
    let clock = FixedClock::at_date(NaiveDate::from_ymd_opt(2024, 5, 15).unwrap());
    let intent = Intent::default()
        .with_metric(MetricTag::Pipeline)
        .with_metric(MetricTag::Revenue)
        .with_sector("tech");

    for rows in [100usize, 1_000, 10_000] {
        let snapshot = BoardSnapshot::new(synthetic_deals(rows), synthetic_work_orders(rows / 2));
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &snapshot, |b, snapshot| {
            b.iter(|| {
                let job = BoardAnalysis::new(snapshot.clone(), intent.clone()).with_clock(clock);
                black_box(job.run().map(|bundle| bundle.deal_count).unwrap_or(0))
            })
        });
    }

    group.finish();
}

fn bench_resolution_and_coercion(c: &mut Criterion) {
    let deals = synthetic_deals(10_000);

    c.bench_function("resolve_amount_column", |b| {
        b.iter(|| black_box(resolve(&deals, &["amount", "value", "revenue"])))
    });

    c.bench_function("coerce_deals_10k", |b| {
        let columns = DealColumns::resolve(&deals);
        b.iter(|| black_box(coerce_deals(&deals, &columns).audit))
    });
}

criterion_group!(benches, bench_full_analysis, bench_resolution_and_coercion);
criterion_main!(benches);
