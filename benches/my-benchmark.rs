use criterion::{black_box, criterion_group, criterion_main, Criterion};
use loclin::assembly::{kron, kron_eye};
use loclin::compute_dx;
use ndarray::{Array1, Array2};

fn jacobian(n: usize) -> Array2<f64> {
    Array2::from_shape_fn((n, n), |(i, j)| {
        if i == j {
            -1.0
        } else {
            0.1 / (1.0 + (i as f64 - j as f64).abs())
        }
    })
}

pub fn compute_dx_benchmark(c: &mut Criterion) {
    let f = Array1::linspace(-1.0, 1.0, 32);
    let dfdx = jacobian(32);
    c.bench_function("Local linearization increment for 32 states", |b| {
        b.iter(|| compute_dx(black_box(&f), black_box(&dfdx), 0.1, false))
    });
    c.bench_function("Regularized local linearization increment for 32 states", |b| {
        b.iter(|| compute_dx(black_box(&f), black_box(&dfdx), -2.0, true))
    });
}

pub fn kron_eye_benchmark(c: &mut Criterion) {
    let a = jacobian(8);
    let eye = Array2::<f64>::eye(64);
    c.bench_function("Kronecker product of 64x64 identity with 8x8 matrix", |b| {
        b.iter(|| kron(black_box(&eye), black_box(&a)))
    });
    c.bench_function("Diagonal-only Kronecker product of 64x64 identity with 8x8 matrix", |b| {
        b.iter(|| kron_eye(black_box(&a), 64, None))
    });
}

criterion_group!(linearization, compute_dx_benchmark);
criterion_group!(assembly, kron_eye_benchmark);
criterion_main!(linearization, assembly);
