use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use sightright::store::phrase_store::PhraseStore;

fn make_store(count: usize) -> PhraseStore {
    let mut store = PhraseStore::open_in_memory().unwrap();
    for i in 0..count {
        store.add_phrase(&format!("phrase {i}"), "bench").unwrap();
    }
    // Every fourth phrase disabled, as after some pruning
    for phrase in store.list_all_phrases().unwrap().into_iter().step_by(4) {
        store.disable_phrase(phrase.id).unwrap();
    }
    store
}

fn bench_sample(c: &mut Criterion) {
    let mut store = make_store(5_000);
    let mut rng = SmallRng::seed_from_u64(42);

    c.bench_function("sample_enabled_phrases (30 of ~3750)", |b| {
        b.iter(|| {
            store
                .sample_enabled_phrases_with(black_box(30), &mut rng)
                .unwrap()
        })
    });
}

fn bench_add(c: &mut Criterion) {
    c.bench_function("add_phrase into 1000-phrase bank", |b| {
        b.iter_batched(
            || make_store(1_000),
            |mut store| store.add_phrase(black_box("new phrase"), "bench").unwrap(),
            criterion::BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, bench_sample, bench_add);
criterion_main!(benches);
