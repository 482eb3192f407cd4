use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hurdat_processor::models::RawLine;
use hurdat_processor::processors::{FieldDecoder, MetricsCalculator, MonthlyAggregator, ParallelProcessor};
use hurdat_processor::readers::{ArchiveReader, BlockTagger, HeaderExtractor};
use hurdat_processor::utils::decode_coordinate;

const STATUSES: [&str; 5] = ["TD", "TS", "HU", "HU", "EX"];

// Synthetic archive: `storms` storms of `observations` six-hourly rows each
fn create_test_archive(storms: usize, observations: usize) -> String {
    let mut out = String::new();
    for storm in 0..storms {
        let year = 1980 + (storm % 43);
        out.push_str(&format!("AL{:02}{}, STORM{}, {},\n", storm % 30 + 1, year, storm, observations));
        for i in 0..observations {
            let day = 1 + (i / 4) % 28;
            let month = 6 + (i / 112) % 6;
            let wind = 25 + (i * 7) % 130;
            out.push_str(&format!(
                "{}{:02}{:02}, {:02}00,  , {}, {:.1}N, {:.1}W, {:>3}, {:>4}, {:>4}, {:>4}, {:>4}, {:>4}, -999, -999, -999, -999, -999, -999, -999, -999,\n",
                year,
                month,
                day,
                (i % 4) * 6,
                STATUSES[i % STATUSES.len()],
                10.0 + i as f64 * 0.2,
                40.0 + i as f64 * 0.3,
                wind,
                1010 - wind / 2,
                wind,
                wind - 10,
                wind - 20,
                wind - 5,
            ));
        }
    }
    out
}

fn read_lines(content: &str) -> Vec<RawLine> {
    ArchiveReader::new()
        .read_str(content)
        .expect("synthetic archive parses")
}

fn benchmark_coordinate_decoding(c: &mut Criterion) {
    let values = ["28.5N", "079.0W", "12.3S", "179.9E", "0.0N"];
    c.bench_function("decode_coordinate", |b| {
        b.iter(|| {
            for value in &values {
                black_box(decode_coordinate(black_box(value)));
            }
        })
    });
}

fn benchmark_stages(c: &mut Criterion) {
    let content = create_test_archive(200, 40);
    let lines = read_lines(&content);
    let descriptors = HeaderExtractor::new().extract(&lines).expect("headers");
    let tagged = BlockTagger::new()
        .tag(lines.clone(), &descriptors)
        .expect("tagging");
    let batch = FieldDecoder::new().decode_all(&tagged).expect("decoding");
    let enriched = MetricsCalculator::new().enrich(batch.observations.clone());

    let mut group = c.benchmark_group("stages");
    group.bench_function("read", |b| b.iter(|| read_lines(black_box(&content))));
    group.bench_function("extract_headers", |b| {
        b.iter(|| HeaderExtractor::new().extract(black_box(&lines)))
    });
    group.bench_function("tag_blocks", |b| {
        b.iter(|| BlockTagger::new().tag(lines.clone(), black_box(&descriptors)))
    });
    group.bench_function("decode", |b| {
        b.iter(|| FieldDecoder::new().decode_all(black_box(&tagged)))
    });
    group.bench_function("metrics", |b| {
        b.iter(|| MetricsCalculator::new().enrich(batch.observations.clone()))
    });
    group.bench_function("aggregate", |b| {
        b.iter(|| MonthlyAggregator::new().aggregate(black_box(&enriched)))
    });
    group.finish();
}

fn benchmark_pipeline_workers(c: &mut Criterion) {
    let content = create_test_archive(400, 50);
    let mut group = c.benchmark_group("pipeline");

    for workers in [1, 2, 4, 8] {
        group.bench_with_input(BenchmarkId::new("workers", workers), &workers, |b, &workers| {
            b.iter(|| {
                ParallelProcessor::new(workers)
                    .process_lines(read_lines(&content), None)
                    .expect("pipeline")
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_coordinate_decoding,
    benchmark_stages,
    benchmark_pipeline_workers
);
criterion_main!(benches);
