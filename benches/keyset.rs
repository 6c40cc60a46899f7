#![allow(
    missing_docs,
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    clippy::similar_names
)]
use std::collections::{BTreeSet, HashSet};

use criterion::{Criterion, criterion_group, criterion_main};
use keyset::{ChainingHashSet, ProbeStrategy, ProbingHashSet, RedBlackTree};
use proptest::{
    collection::vec,
    prelude::{Strategy, any},
    strategy::ValueTree,
    test_runner::TestRunner,
};

const ITEMS_AMOUNT: usize = 1000;
// prime, so linear probing and double hashing reach every slot
const TABLE_SIZE: usize = 1999;
const SAMPLE_SIZE: usize = 10;

fn random_keys() -> Vec<i64> {
    let mut runner = TestRunner::default();
    vec(any::<i64>(), ITEMS_AMOUNT).new_tree(&mut runner).unwrap().current()
}

// Fills a fresh table, counting the keys it rejected
fn fill(strategy: ProbeStrategy, keys: &[i64]) -> (ProbingHashSet, usize) {
    let mut table = ProbingHashSet::new(TABLE_SIZE).unwrap();
    let failures = keys.iter().filter(|&&key| table.insert_with(key, strategy).is_err()).count();
    (table, failures)
}

fn probing_benches(c: &mut Criterion) {
    let keys = random_keys();

    let mut group = c.benchmark_group("Open addressing insert at 50% load");
    group.sample_size(SAMPLE_SIZE);
    for (name, strategy) in [
        ("linear", ProbeStrategy::Linear),
        ("quadratic", ProbeStrategy::quadratic()),
        ("double hashing", ProbeStrategy::DoubleHashing),
    ] {
        let (_, failures) = fill(strategy, &keys);
        println!("{name}: {failures} of {ITEMS_AMOUNT} keys rejected");
        group.bench_function(name, |b| b.iter(|| fill(strategy, &keys)));
    }
    group.finish();
}

fn chaining_benches(c: &mut Criterion) {
    let keys = random_keys();

    let mut group = c.benchmark_group("Chaining vs std HashSet");
    group.sample_size(SAMPLE_SIZE);
    let mut chained = ChainingHashSet::new(TABLE_SIZE).unwrap();
    let mut rust_set = HashSet::new();
    group.bench_function("chaining insert", |b| {
        b.iter(|| {
            for &key in &keys {
                chained.insert(key);
            }
        });
    });
    group.bench_function("rust std insert", |b| {
        b.iter(|| {
            for &key in &keys {
                rust_set.insert(key);
            }
        });
    });
    group.bench_function("chaining find", |b| {
        b.iter(|| keys.iter().filter(|&&key| chained.find(key)).count());
    });
    group.bench_function("rust std find", |b| {
        b.iter(|| keys.iter().filter(|&&key| rust_set.contains(&key)).count());
    });
    group.finish();
}

fn tree_benches(c: &mut Criterion) {
    let keys = random_keys();

    let mut group = c.benchmark_group("Red-black tree vs std BTreeSet");
    group.sample_size(SAMPLE_SIZE);
    group.bench_function("red-black insert and delete", |b| {
        b.iter(|| {
            let mut tree = RedBlackTree::new();
            tree.extend(keys.iter().copied());
            for &key in &keys {
                tree.delete(key);
            }
            tree
        });
    });
    group.bench_function("rust std insert and remove", |b| {
        b.iter(|| {
            let mut set = BTreeSet::new();
            set.extend(keys.iter().copied());
            for key in &keys {
                set.remove(key);
            }
            set
        });
    });

    let mut tree = RedBlackTree::new();
    tree.extend(keys.iter().copied());
    group.bench_function("red-black find", |b| {
        b.iter(|| keys.iter().filter(|&&key| tree.contains(key)).count());
    });
    group.finish();
}

criterion_group!(benches, probing_benches, chaining_benches, tree_benches);

criterion_main!(benches);
