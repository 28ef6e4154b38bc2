//! Benchmark for mana cost parsing and printing

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mtg_cards::core::{Color, ColorSet, ManaCost};

const SAMPLE_COSTS: &[(&str, &str)] = &[
    ("empty", ""),
    ("zero", "{0}"),
    ("bolt", "{R}"),
    ("wrath", "{2}{W}{W}"),
    ("hybrid", "{2/W}{2/U}{2/B}{2/R}{2/G}"),
    ("phyrexian", "{X}{G/P}{G/P}"),
    ("kitchen_sink", "{12}{W}{U}{B}{R}{G}{W/U}{B/G}{R/P}{X}{C}{S}"),
];

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("mana_cost_parse");
    for (name, text) in SAMPLE_COSTS {
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), text, |b, text| {
            b.iter(|| ManaCost::parse(black_box(text)))
        });
    }
    group.finish();
}

fn bench_format(c: &mut Criterion) {
    let costs: Vec<(&str, ManaCost)> = SAMPLE_COSTS
        .iter()
        .filter_map(|(name, text)| ManaCost::parse(text).ok().map(|cost| (*name, cost)))
        .collect();

    let mut group = c.benchmark_group("mana_cost_format");
    for (name, cost) in &costs {
        group.bench_with_input(BenchmarkId::from_parameter(name), cost, |b, cost| {
            b.iter(|| black_box(cost).to_string())
        });
    }
    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let cost = ManaCost::parse("{12}{W}{U}{B}{R}{G}{W/U}{B/G}{R/P}{X}{C}{S}").unwrap();
    let palette = ColorSet::pair(Color::White, Color::Blue);

    c.bench_function("mana_cost_payable_with", |b| {
        b.iter(|| black_box(&cost).payable_with(black_box(palette)))
    });
    c.bench_function("mana_cost_count_color", |b| {
        b.iter(|| {
            Color::ALL
                .iter()
                .map(|&color| black_box(&cost).count_color(color))
                .sum::<u32>()
        })
    });
}

criterion_group!(benches, bench_parse, bench_format, bench_queries);
criterion_main!(benches);
