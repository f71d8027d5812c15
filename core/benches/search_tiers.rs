use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use playroom_core::connect_four::{ConnectFour, ai_move};
use std::hint::black_box;

/// Two-player games replayed from a column list, from the opening to a crowded middle game.
const OPENINGS: &[(&str, &[usize])] = &[
    ("empty", &[]),
    ("opening", &[3, 3, 2, 4]),
    ("middle", &[3, 3, 2, 4, 4, 2, 5, 1, 1, 5, 0, 6]),
];

fn connect_four_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("connect_four_ai_move");
    for &(name, moves) in OPENINGS {
        let mut game = ConnectFour::new(false);
        for &col in moves {
            game.play(col).expect("opening must be playable");
        }
        let grid = game.grid().clone();
        group.bench_with_input(BenchmarkId::from_parameter(name), &grid, |b, grid| {
            b.iter(|| black_box(ai_move(grid)));
        });
    }
    group.finish();
}

criterion_group!(benches, connect_four_search);
criterion_main!(benches);
