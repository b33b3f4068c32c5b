// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


use criterion::{criterion_group, criterion_main, Criterion};
use fever_core::{Handle, HandleDataStore, PersistentHandleDataStore};
use std::hint::black_box;

fn bench_stores(c: &mut Criterion) {
    let mut group = c.benchmark_group("Handle Stores");

    group.bench_function("HandleDataStore add/remove churn (4096)", |b| {
        let mut store = HandleDataStore::with_capacity(4096);
        b.iter(|| {
            let handles: Vec<Handle> = (0..4096u32).map(|i| store.add(i)).collect();
            for handle in handles {
                black_box(store.remove(handle));
            }
        });
    });

    group.bench_function("HandleDataStore get (4096 live)", |b| {
        let mut store = HandleDataStore::new();
        let handles: Vec<Handle> = (0..4096u32).map(|i| store.add(i)).collect();
        b.iter(|| {
            let mut sum = 0u64;
            for handle in &handles {
                if let Some(value) = store.get(*handle) {
                    sum += u64::from(*value);
                }
            }
            black_box(sum);
        });
    });

    group.bench_function("PersistentHandleDataStore add/remove (256)", |b| {
        let mut store = PersistentHandleDataStore::new(256);
        b.iter(|| {
            let handles: Vec<Handle> = (0..256u32)
                .filter_map(|i| store.add(i).copied())
                .collect();
            for handle in handles.into_iter().rev() {
                black_box(store.remove(handle));
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_stores);
criterion_main!(benches);
