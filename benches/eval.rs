use criterion::{black_box, criterion_group, criterion_main, Criterion};
use edge_placement::{initial_candidate, Constraint, PlacementModel, StaticAssumptions};
use rand::SeedableRng;
use rand_chacha::ChaChaRng;

pub fn evaluation_benchmark(c: &mut Criterion) {
    let (dims, assumptions) = StaticAssumptions::reference();
    let model = PlacementModel::new(dims, assumptions);
    let mut rng = ChaChaRng::seed_from_u64(1);
    let candidate = initial_candidate(dims, model.assumptions(), &mut rng)
        .expect("reference instance has a feasible guess");
    let vector = model.encode(&candidate);

    c.bench_function("objective reference", |b| {
        b.iter(|| model.objective_value(black_box(vector.view())).unwrap())
    });
    c.bench_function("constraints reference", |b| {
        b.iter(|| {
            let decoded = model.decode(black_box(vector.view())).unwrap();
            Constraint::ALL
                .iter()
                .map(|&kind| model.constraint(kind, &decoded))
                .sum::<f64>()
        })
    });
}

criterion_group!(benches, evaluation_benchmark);
criterion_main!(benches);
