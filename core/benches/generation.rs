use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use sapper_core::*;

fn generate_presets(c: &mut Criterion) {
    for preset in Difficulty::ALL {
        let config = preset.config();
        c.bench_function(&format!("generate {preset:?}"), |b| {
            b.iter(|| RandomMineGenerator::new(black_box(7)).generate(config))
        });
    }
}

/// Each strategy on the density it is picked for, so no fallback kicks in.
fn generate_by_placement(c: &mut Criterion) {
    let cases = [
        (Placement::Rejection, GameConfig::new_unchecked((30, 30), 100)),
        (Placement::Shuffle, GameConfig::new_unchecked((30, 30), 850)),
    ];
    for (placement, config) in cases {
        c.bench_function(
            &format!("generate {placement:?} {} mines", config.mines),
            |b| b.iter(|| RandomMineGenerator::with_placement(black_box(7), placement).generate(config)),
        );
    }
}

criterion_group!(benches, generate_presets, generate_by_placement);
criterion_main!(benches);
