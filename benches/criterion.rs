// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use ecmascript_elements::{Array, Value};
use std::hint::black_box;

const COUNT: i64 = 10_000;

fn append(c: &mut Criterion) {
    c.bench_function("append ints", |b| {
        b.iter(|| {
            let mut array = Array::new();
            for index in 0..COUNT {
                array.set(index, index as i32, true).unwrap();
            }
            black_box(array)
        })
    });
    c.bench_function("append doubles", |b| {
        b.iter(|| {
            let mut array = Array::new();
            for index in 0..COUNT {
                array.set(index, index as f64 + 0.5, true).unwrap();
            }
            black_box(array)
        })
    });
}

fn prepend(c: &mut Criterion) {
    c.bench_function("prepend ints", |b| {
        b.iter(|| {
            let mut array = Array::new();
            for index in (0..1_000).rev() {
                array.set(index, index as i32, true).unwrap();
            }
            black_box(array)
        })
    });
    c.bench_function("shift and push", |b| {
        b.iter_batched(
            || {
                let values: Vec<Value> = (0..1_000).map(Value::Integer).collect();
                Array::from_values(&values)
            },
            |mut array| {
                for index in 0..COUNT {
                    array.shift_range(1).unwrap();
                    array.set(array.len() as i64, index as i32, true).unwrap();
                }
                black_box(array)
            },
            BatchSize::SmallInput,
        )
    });
}

fn holes(c: &mut Criterion) {
    c.bench_function("strided writes", |b| {
        b.iter(|| {
            let mut array = Array::new();
            for index in (0..COUNT).step_by(3) {
                array.set(index, 1, true).unwrap();
            }
            black_box(array)
        })
    });
    c.bench_function("delete every other element", |b| {
        b.iter_batched(
            || {
                let values: Vec<Value> = (0..COUNT as i32).map(Value::Integer).collect();
                Array::from_values(&values)
            },
            |mut array| {
                for index in (0..COUNT).step_by(2) {
                    array.delete(index, true).unwrap();
                }
                black_box(array)
            },
            BatchSize::SmallInput,
        )
    });
}

fn transitions(c: &mut Criterion) {
    c.bench_function("widen int to object", |b| {
        b.iter_batched(
            || {
                let values: Vec<Value> = (0..COUNT as i32).map(Value::Integer).collect();
                Array::from_values(&values)
            },
            |mut array| {
                array.set(0, 0.5, true).unwrap();
                array.set(1, "x", true).unwrap();
                black_box(array)
            },
            BatchSize::SmallInput,
        )
    });
    c.bench_function("sparse writes", |b| {
        b.iter(|| {
            let mut array = Array::new();
            for index in 0..1_000 {
                array.set(index * 100_000, index as i32, true).unwrap();
            }
            black_box(array)
        })
    });
}

criterion_group!(benches, append, prepend, holes, transitions);
criterion_main!(benches);
