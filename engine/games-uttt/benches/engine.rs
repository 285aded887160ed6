use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use games_uttt::{compute_random_move, random_legal_move, GameState, Move};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn midgame() -> GameState {
    GameState::from_moves(&[
        Move::new(1, 1, 0, 0),
        Move::new(0, 0, 1, 1),
        Move::new(1, 1, 2, 2),
        Move::new(2, 2, 1, 1),
        Move::new(1, 1, 0, 2),
        Move::new(0, 2, 2, 0),
    ])
    .unwrap()
}

fn bench_apply_move(c: &mut Criterion) {
    let mut group = c.benchmark_group("uttt_apply_move");
    group.bench_function("opening", |b| {
        let state = GameState::new();
        b.iter(|| state.apply_move(Move::new(1, 1, 1, 1)).unwrap());
    });
    group.bench_function("midgame", |b| {
        let state = midgame();
        let mv = state.legal_moves()[0];
        b.iter(|| state.apply_move(mv).unwrap());
    });
    group.finish();
}

fn bench_legal_moves(c: &mut Criterion) {
    let mut group = c.benchmark_group("uttt_legal_moves");
    group.bench_function("opening", |b| {
        let state = GameState::new();
        b.iter(|| state.legal_moves());
    });
    group.bench_function("midgame", |b| {
        let state = midgame();
        b.iter(|| state.legal_moves());
    });
    group.finish();
}

fn bench_random_playout(c: &mut Criterion) {
    let mut group = c.benchmark_group("uttt_random_playout");
    group.bench_function("legal_moves_choose", |b| {
        b.iter_batched(
            || ChaCha20Rng::seed_from_u64(42),
            |mut rng| {
                let mut state = GameState::new();
                while !state.game_over {
                    let mv = random_legal_move(&state, &mut rng).unwrap();
                    state = state.apply_move(mv).unwrap();
                }
                state
            },
            BatchSize::SmallInput,
        );
    });
    group.bench_function("rejection_sampling", |b| {
        b.iter_batched(
            || ChaCha20Rng::seed_from_u64(42),
            |mut rng| {
                let mut state = GameState::new();
                while !state.game_over {
                    state = compute_random_move(&state, &mut rng).unwrap().state;
                }
                state
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_apply_move,
    bench_legal_moves,
    bench_random_playout
);
criterion_main!(benches);
