//! Full analysis pipeline performance benchmarks.
//!
//! Measures end-to-end analysis performance including parsing, profiling,
//! candidate ranking and insight generation.

use chartwise::{Chartwise, DataTable, DatasetProfiler, ProfilerConfig};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use std::io::Write;
use tempfile::NamedTempFile;

/// Generate a sales export with a date, two categories and two measures.
fn generate_sales_data(rows: usize) -> String {
    let mut data = String::new();
    data.push_str("order_date,region,channel,revenue,units\n");

    let regions = ["North", "South", "East", "West"];
    let channels = ["web", "store", "partner"];

    for row in 0..rows {
        data.push_str(&format!(
            "2024-{:02}-{:02},{},{},{:.2},{}\n",
            (row % 12) + 1,
            (row % 28) + 1,
            regions[row % regions.len()],
            channels[row % channels.len()],
            100.0 + (row % 37) as f64 * 12.5,
            1 + row % 9,
        ));
    }

    data
}

/// Generate survey responses with a rating grid and a multi-select question.
fn generate_survey_data(rows: usize) -> String {
    let mut data = String::new();
    data.push_str(
        "respondent_id,Satisfaction: Price,Satisfaction: Support,Satisfaction: Speed,Devices used\n",
    );

    let answers = ["Strongly agree", "Agree", "Neutral", "Disagree", "Strongly disagree"];
    let devices = ["\"Mobile, Desktop\"", "Desktop", "\"Mobile, Tablet\"", "Mobile"];

    for row in 0..rows {
        data.push_str(&format!(
            "{},{},{},{},{}\n",
            row + 1,
            answers[row % answers.len()],
            answers[(row / 2) % answers.len()],
            answers[(row / 3) % answers.len()],
            devices[row % devices.len()],
        ));
    }

    data
}

fn write_temp(data: &str) -> NamedTempFile {
    let mut temp = NamedTempFile::with_suffix(".csv").unwrap();
    temp.write_all(data.as_bytes()).unwrap();
    temp.flush().unwrap();
    temp
}

/// Benchmark the full pipeline from a file on disk.
fn bench_full_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_analysis");
    let engine = Chartwise::new();

    for rows in [10, 100, 1_000].iter() {
        for (name, data) in [
            ("sales_rows", generate_sales_data(*rows)),
            ("survey_rows", generate_survey_data(*rows)),
        ] {
            let temp = write_temp(&data);
            group.throughput(Throughput::Bytes(data.len() as u64));
            group.bench_with_input(BenchmarkId::new(name, rows), &temp, |b, temp| {
                b.iter(|| black_box(engine.analyze(temp.path()).unwrap()))
            });
        }
    }

    group.finish();
}

/// Benchmark profiling alone on an in-memory table.
fn bench_profiling(c: &mut Criterion) {
    let mut group = c.benchmark_group("profiling");
    let profiler = DatasetProfiler::new(ProfilerConfig::default());

    for rows in [100, 1_000, 10_000].iter() {
        let table = parse_table(&generate_sales_data(*rows));
        group.throughput(Throughput::Elements((rows * table.column_count()) as u64));
        group.bench_with_input(BenchmarkId::new("cells", rows), &table, |b, table| {
            b.iter(|| black_box(profiler.profile(table)))
        });
    }

    group.finish();
}

/// Benchmark everything after parsing on an in-memory table.
fn bench_in_memory_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("in_memory_analysis");
    let engine = Chartwise::new();

    for rows in [100, 1_000].iter() {
        let table = parse_table(&generate_survey_data(*rows));
        group.bench_with_input(BenchmarkId::new("survey_rows", rows), &table, |b, table| {
            b.iter(|| black_box(engine.analyze_table("bench.csv", table).unwrap()))
        });
    }

    group.finish();
}

fn parse_table(data: &str) -> DataTable {
    chartwise::Parser::new().parse_bytes(data.as_bytes()).unwrap()
}

criterion_group!(benches, bench_full_analysis, bench_profiling, bench_in_memory_analysis);

// Large tables run separately due to longer execution time
fn bench_large_table(c: &mut Criterion) {
    let table = parse_table(&generate_sales_data(100_000));
    let engine = Chartwise::new();
    c.bench_function("large_table_100k_rows", |b| {
        b.iter(|| black_box(engine.analyze_table("large.csv", &table).unwrap()))
    });
}

criterion_group!(
    name = large_table_benches;
    config = Criterion::default()
        .sample_size(10)
        .measurement_time(std::time::Duration::from_secs(30));
    targets = bench_large_table
);

criterion_main!(benches, large_table_benches);
