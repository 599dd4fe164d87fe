use evacuation_minimax::game_tree::{GameTreeAgent, GameTreeOptions, Stance};
use evacuation_rs::{Environment, World};

use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn load(json: &str) -> World {
    let env = Environment::from_json(json).unwrap();

    World::from_environment(&env).unwrap()
}

fn bench_stance(c: &mut Criterion, stance: Stance, pruning: bool) {
    let mut world = load(include_str!("../../evacuation-rs/fixtures/crossroads.json"));
    let me = world.vertex("0").unwrap();
    let partner = world.vertex("4").unwrap();
    world.set_agent_location(0, me);
    world.set_agent_location(1, partner);

    let agent = GameTreeAgent::with_stance(
        "bench",
        0,
        me,
        stance,
        GameTreeOptions {
            max_depth: 6,
            pruning,
        },
    );

    let name = if pruning {
        format!("{stance} crossroads depth 6")
    } else {
        format!("{stance} crossroads depth 6 no pruning")
    };

    c.bench_function(&name, |b| {
        b.iter(|| {
            let world = black_box(&world);
            agent.search(world)
        })
    });
}

pub fn criterion_benchmark(c: &mut Criterion) {
    bench_stance(c, Stance::Adversarial, true);
    bench_stance(c, Stance::Adversarial, false);
    bench_stance(c, Stance::SemiCooperative, true);
    bench_stance(c, Stance::FullyCooperative, true);
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
