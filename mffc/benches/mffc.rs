use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use mffc::refs::mffc_size_with;
use mffc::{mffc, Aig, GraphAig, MffcConfig, Traversal};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn network(ands: usize) -> Aig {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut aig = Aig::new();
    let mut edges = (0..32).map(|_| aig.push_input()).collect::<Vec<_>>();
    for _ in 0..ands {
        let window = edges.len().min(64);
        let fanin0 = edges[edges.len() - 1 - rng.gen_range(0..window)];
        let fanin1 = edges[rng.gen_range(0..edges.len())];
        let fanin1 = if rng.gen_bool(0.5) { !fanin1 } else { fanin1 };
        edges.push(aig.push_and(fanin0, fanin1));
    }
    for edge in edges.iter().rev().take(16) {
        aig.push_output(*edge);
    }
    aig
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let mut aig = network(20_000);
    let ands = aig.iter_ands().collect::<Vec<_>>();

    for (name, traversal) in [("recursive", Traversal::Recursive), ("iterative", Traversal::Iterative)] {
        let config = MffcConfig::new().with_traversal(traversal);
        c.bench_function(&format!("mffc_size/{}", name), |b| {
            b.iter(|| ands.iter().map(|&node| mffc_size_with(&mut aig, black_box(node), &config)).sum::<usize>())
        });
        c.bench_function(&format!("cone_and_support/{}", name), |b| {
            b.iter(|| ands.iter().map(|&node| mffc(&mut aig, black_box(node), &config).support.len()).sum::<usize>())
        });
    }

    c.bench_function("sweep", |b| {
        b.iter_batched(|| GraphAig::from(&aig), |mut graph| graph.sweep(), BatchSize::LargeInput)
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
