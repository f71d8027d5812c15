use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use playroom_core::battleship::place_fleet;
use playroom_core::sudoku::{self, generate_puzzle};
use playroom_core::word_search::{Category, generate_grid};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::hint::black_box;

fn sudoku_tiers(c: &mut Criterion) {
    let mut group = c.benchmark_group("sudoku_generate");
    for difficulty in [
        sudoku::Difficulty::Easy,
        sudoku::Difficulty::Medium,
        sudoku::Difficulty::Hard,
    ] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{difficulty:?}")),
            &difficulty,
            |b, &difficulty| {
                let mut rng = SmallRng::seed_from_u64(0x5eed);
                b.iter(|| black_box(generate_puzzle(difficulty, &mut rng)));
            },
        );
    }
    group.finish();
}

fn word_search_tiers(c: &mut Criterion) {
    let mut group = c.benchmark_group("word_search_generate");
    for category in Category::ALL {
        group.bench_with_input(
            BenchmarkId::from_parameter(category.name()),
            &category,
            |b, &category| {
                let mut rng = SmallRng::seed_from_u64(0x5eed);
                b.iter(|| black_box(generate_grid(category, &mut rng)));
            },
        );
    }
    group.finish();
}

fn fleet_placement(c: &mut Criterion) {
    c.bench_function("battleship_place_fleet", |b| {
        let mut rng = SmallRng::seed_from_u64(0x5eed);
        b.iter(|| black_box(place_fleet(&mut rng)));
    });
}

criterion_group!(benches, sudoku_tiers, word_search_tiers, fleet_placement);
criterion_main!(benches);
