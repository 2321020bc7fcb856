use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use hegemon::board::{Graph, Owner, TerritoryId};
use hegemon::eval::{probability_to_take, utility, UtilityConfig};
use hegemon::resolve::AttackSnapshot;
use hegemon::search::{plan_attack_transfers, plan_deployments, SearchConfig};

/// A 6x6 grid split into six row groups. The left third is ours, the right
/// third the opponent's, the middle neutral.
fn grid() -> Graph {
    const SIDE: u32 = 6;
    let mut g = Graph::new();
    for row in 0..SIDE {
        g.add_group(row + 1, 2 + row as i32 % 3).unwrap();
    }
    let id = |row: u32, col: u32| row * SIDE + col + 1;
    for row in 0..SIDE {
        for col in 0..SIDE {
            g.add_territory(id(row, col), row + 1).unwrap();
        }
    }
    for row in 0..SIDE {
        for col in 0..SIDE {
            if col + 1 < SIDE {
                g.add_edge(id(row, col), id(row, col + 1)).unwrap();
            }
            if row + 1 < SIDE {
                g.add_edge(id(row, col), id(row + 1, col)).unwrap();
            }
        }
    }
    for row in 0..SIDE {
        for col in 0..SIDE {
            let (owner, armies) = match col {
                0 | 1 => (Owner::player("player1"), 4 + (row + col) as i32),
                4 | 5 => (Owner::player("player2"), 3 + row as i32),
                _ => (Owner::Neutral, 2),
            };
            g.set_territory(id(row, col), owner, armies).unwrap();
        }
    }
    g
}

fn bench_probability_to_take(c: &mut Criterion) {
    c.bench_function("probability_to_take_sweep", |b| {
        b.iter(|| {
            let mut sum = 0.0;
            for a in 1..40 {
                for d in 1..40 {
                    sum += probability_to_take(black_box(a), black_box(d));
                }
            }
            sum
        })
    });
}

fn bench_utility(c: &mut Criterion) {
    let g = grid();
    let me = Owner::player("player1");
    let opp = Owner::player("player2");
    let basic = UtilityConfig::default();
    let at_risk = SearchConfig::default().utility;
    c.bench_function("utility_basic", |b| {
        b.iter(|| utility(black_box(&g), &me, &opp, &basic))
    });
    c.bench_function("utility_at_risk", |b| {
        b.iter(|| utility(black_box(&g), &me, &opp, &at_risk))
    });
}

fn bench_simulate_undo(c: &mut Criterion) {
    let mut g = grid();
    let me = Owner::player("player1");
    let from: TerritoryId = 14;
    let to_ids: Vec<TerritoryId> = vec![14, 15];
    let amounts = [1, 4];
    let snapshot = AttackSnapshot::capture(&g, from, &to_ids).unwrap();
    c.bench_function("simulate_then_restore", |b| {
        b.iter(|| {
            g.simulate_attacks(from, black_box(&amounts), &to_ids, &me).unwrap();
            snapshot.restore(&mut g, &amounts).unwrap();
        })
    });
}

fn bench_graph_clone(c: &mut Criterion) {
    let g = grid();
    c.bench_function("graph_clone", |b| b.iter(|| black_box(&g).clone()));
}

fn bench_deploy_20ms(c: &mut Criterion) {
    let g = grid();
    let me = Owner::player("player1");
    let opp = Owner::player("player2");
    let config = SearchConfig::default();
    let mut group = c.benchmark_group("deploy");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(5));
    group.bench_function("grid_20ms", |b| {
        let mut rng = SmallRng::seed_from_u64(1);
        b.iter(|| {
            plan_deployments(&g, &me, &opp, 12, Duration::from_millis(20), &config, &mut rng).unwrap()
        })
    });
    group.finish();
}

fn bench_attack_phase_20ms(c: &mut Criterion) {
    let g = grid();
    let me = Owner::player("player1");
    let opp = Owner::player("player2");
    let config = SearchConfig::default();
    let mut group = c.benchmark_group("attack");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(5));
    group.bench_function("grid_20ms", |b| {
        let mut rng = SmallRng::seed_from_u64(1);
        b.iter(|| plan_attack_transfers(&g, &me, &opp, Duration::from_millis(20), &config, &mut rng))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_probability_to_take,
    bench_utility,
    bench_simulate_undo,
    bench_graph_clone,
    bench_deploy_20ms,
    bench_attack_phase_20ms,
);
criterion_main!(benches);
