criterion::criterion_main!(benches);
criterion::criterion_group! {
    name = benches;
    config = criterion::Criterion::default()
        .without_plots()
        .noise_threshold(3.0)
        .significance_level(0.01)
        .sample_size(10)
        .measurement_time(std::time::Duration::from_secs(1));
    targets =
        expanding_full_tree,
        encoding_full_tree,
        streaming_full_tree,
        opening_lazy_tree,
        pruning_full_tree,
}

fn config() -> FullTree {
    FullTree {
        big_blind: 100.,
        players: 2,
        betting: vec![vec![0.5, 1.], vec![1.]],
        max_actions: 4,
        terminal: Street::Turn,
        min_bet: false,
        limp: true,
    }
}

fn expanding_full_tree(c: &mut criterion::Criterion) {
    #[cfg(feature = "server")]
    robotree::log().expect("initialize logger");
    let config = config();
    c.bench_function("expand a heads-up Turn tree", |b| {
        b.iter(|| config.build(&Holdem).expect("build"))
    });
}

fn encoding_full_tree(c: &mut criterion::Criterion) {
    let tree = config().build(&Holdem).expect("build");
    c.bench_function("encode a heads-up Turn tree", |b| {
        b.iter(|| tree.encode().expect("encode"))
    });
}

fn streaming_full_tree(c: &mut criterion::Criterion) {
    let tree = config().build(&Holdem).expect("build");
    let mut bytes = Vec::with_capacity(tree.size() as usize);
    c.bench_function("stream a heads-up Turn tree", |b| {
        b.iter(|| {
            bytes.clear();
            tree.write(&mut bytes).expect("write")
        })
    });
}

fn opening_lazy_tree(c: &mut criterion::Criterion) {
    let bytes = config().build(&Holdem).expect("build").encode().expect("encode");
    c.bench_function("open and expand a persisted Turn tree", |b| {
        b.iter(|| {
            let tree = Root::open(std::io::Cursor::new(bytes.clone())).expect("open");
            expand_full(&tree, &Holdem).expect("expand");
            tree
        })
    });
}

fn pruning_full_tree(c: &mut criterion::Criterion) {
    c.bench_function("prune a heads-up Turn tree", |b| {
        b.iter_batched(
            || {
                let tree = config().build(&Holdem).expect("build");
                let opener = decision_point(&tree).expect("opener");
                let player = opener.as_player().expect("player");
                let n = player.len();
                player
                    .with(tree.root().expect("root"), 0, |p| p.summed = (0..n).map(|i| i as f64).collect())
                    .expect("policy");
                tree
            },
            |tree| discard_below_epsilon(&tree, 0.05, 0).expect("prune"),
            criterion::BatchSize::SmallInput,
        )
    });
}

use robotree::table::Holdem;
use robotree::table::Street;
use robotree::tree::FullTree;
use robotree::tree::Root;
use robotree::tree::decision_point;
use robotree::tree::discard_below_epsilon;
use robotree::tree::expand_full;
