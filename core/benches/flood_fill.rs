use std::hint::black_box;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use sapper_core::*;

/// A large board with a single mine in the far corner, so one reveal floods almost everything.
fn open_board() -> GameManager {
    let layout = MineLayout::from_mine_coords((200, 200), &[(199, 199)]).expect("mine is in range");
    let mut manager = GameManager::new();
    manager
        .start_with_layout(layout, &mut DiscardEvents)
        .expect("layout is valid");
    manager
}

fn flood_open_board(c: &mut Criterion) {
    c.bench_function("flood 200x200", |b| {
        b.iter_batched(
            open_board,
            |mut manager| {
                let mut events = Vec::with_capacity(40_000);
                manager.reveal_cell(black_box((0, 0)), &mut events);
                events
            },
            BatchSize::LargeInput,
        )
    });
}

fn play_expert(c: &mut Criterion) {
    c.bench_function("reveal every safe cell, expert", |b| {
        b.iter_batched(
            || {
                let mut manager = GameManager::new();
                manager
                    .start_seeded(Difficulty::Expert.config(), 7, &mut DiscardEvents)
                    .expect("preset is valid");
                manager
            },
            |mut manager| {
                let board = manager.board().clone();
                for coords in board.iter_coords().filter(|&pos| !board.has_mine(pos)) {
                    manager.reveal_cell(coords, &mut DiscardEvents);
                }
                manager.state()
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, flood_open_board, play_expert);
criterion_main!(benches);
