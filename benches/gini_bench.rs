use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use gini_cli::inequality::{self, Direction, SortedIncomeSeries};
use gini_cli::{parsing, sample};
use std::hint::black_box;
use std::io::Write as IoWrite;
use tempfile::NamedTempFile;

fn generate_test_file(n: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for i in 1..=n {
        writeln!(file, "{}", i).unwrap();
    }
    file.flush().unwrap();
    file
}

fn incomes(n: usize) -> Vec<f64> {
    // Descending so every run pays for a full sort
    (1..=n).rev().map(|i| i as f64).collect()
}

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");

    for size in [1_000, 10_000, 100_000, 1_000_000] {
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("read_file_mmap", size), &size, |b, &size| {
            let temp_file = generate_test_file(size);
            b.iter(|| {
                let file = temp_file.reopen().unwrap();
                let data = parsing::read_file_mmap(&file).unwrap();
                black_box(data)
            });
        });
    }

    group.finish();
}

fn bench_gini(c: &mut Criterion) {
    let mut group = c.benchmark_group("gini");

    for size in [1_000, 10_000, 100_000, 1_000_000] {
        let data = incomes(size);

        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(
            BenchmarkId::new("compute_gini_and_curve", size),
            &data,
            |b, data| {
                b.iter(|| black_box(inequality::compute_gini_and_curve(black_box(data))));
            },
        );

        let series = SortedIncomeSeries::new(data.clone()).unwrap();

        group.bench_with_input(BenchmarkId::new("gini_presorted", size), &series, |b, series| {
            b.iter(|| black_box(series.gini()));
        });

        group.bench_with_input(
            BenchmarkId::new("group_share_top_20", size),
            &series,
            |b, series| {
                b.iter(|| black_box(series.group_share(black_box(20.0), Direction::Top)));
            },
        );
    }

    group.finish();
}

fn bench_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_pipeline");

    for size in [1_000, 10_000, 100_000, 1_000_000] {
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("parse_and_gini", size), &size, |b, &size| {
            let temp_file = generate_test_file(size);
            b.iter(|| {
                let file = temp_file.reopen().unwrap();
                let data = parsing::read_file_mmap(&file).unwrap();
                let series = SortedIncomeSeries::new(data).unwrap();
                black_box(series.gini())
            });
        });
    }

    group.bench_function("sample_and_gini", |b| {
        b.iter(|| {
            let data = sample::generate(black_box(sample::DEFAULT_SEED));
            black_box(inequality::compute_gini_and_curve(&data))
        });
    });

    group.finish();
}

criterion_group!(benches, bench_parsing, bench_gini, bench_full_pipeline);
criterion_main!(benches);
