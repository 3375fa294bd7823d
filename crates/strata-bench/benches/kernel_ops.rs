//! Criterion micro-benchmarks for the refine, coarsen and differencing kernels.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use strata_bench::smooth_array;
use strata_core::{ArrayData, Dim, IndexBox, IntVector, MAX_DIM};
use strata_kernels::{
    advect_derivative, conservative_linear_refine, ctof_interp, cubic_coarsen, ftoc_div, quadratic_refine,
    weighted_average_coarsen,
};

fn bench_refine(c: &mut Criterion) {
    let dim = Dim::Two;
    let ratio = IntVector::splat(dim, 2);
    let coarse = smooth_array(dim, -2, 65);
    let fine_box = IndexBox::new(dim, IntVector::ZERO, IntVector::splat(dim, 127));
    let mut fine = ArrayData::new(fine_box, 1);

    c.bench_function("refine_conservative_linear_128x128", |b| {
        b.iter(|| conservative_linear_refine(&mut fine, black_box(&coarse), &fine_box, ratio));
    });
    c.bench_function("refine_quadratic_128x128", |b| {
        b.iter(|| quadratic_refine(&mut fine, black_box(&coarse), &fine_box, ratio));
    });
}

fn bench_coarsen(c: &mut Criterion) {
    let dim = Dim::Two;
    let coarse_box = IndexBox::new(dim, IntVector::ZERO, IntVector::splat(dim, 31));
    let mut coarse = ArrayData::new(coarse_box, 1);
    let fine = smooth_array(dim, 0, 127);

    c.bench_function("coarsen_average_r4_32x32", |b| {
        let ratio = IntVector::splat(dim, 4);
        b.iter(|| weighted_average_coarsen(&mut coarse, black_box(&fine), &coarse_box, ratio));
    });
    c.bench_function("coarsen_cubic_r4_32x32", |b| {
        let ratio = IntVector::splat(dim, 4);
        b.iter(|| cubic_coarsen(&mut coarse, black_box(&fine), &coarse_box, ratio));
    });
}

fn bench_differencing(c: &mut Criterion) {
    let dim = Dim::Three;
    let cells = IndexBox::new(dim, IntVector::ZERO, IntVector::splat(dim, 31));
    let q = smooth_array(dim, -1, 32);
    let u: Vec<ArrayData> = dim
        .axes()
        .map(|a| {
            let mut arr = ArrayData::new(cells.face_box(a), 1);
            arr.fill(1.0);
            arr
        })
        .collect();
    let mut faces: Vec<ArrayData> = dim.axes().map(|a| ArrayData::new(cells.face_box(a), 1)).collect();
    let mut out = ArrayData::new(cells, 1);
    let dx = [1.0 / 32.0; MAX_DIM];

    c.bench_function("ctof_interp_32^3", |b| {
        b.iter(|| ctof_interp(&mut faces, 0, black_box(&q), 0, &cells));
    });
    c.bench_function("ftoc_div_32^3", |b| {
        b.iter(|| ftoc_div(&mut out, 0, -1.0, black_box(&faces), 0, &cells, &dx));
    });
    c.bench_function("advect_derivative_32^3", |b| {
        b.iter(|| advect_derivative(&mut out, 0, -1.0, &dx, &u, black_box(&faces), 0, &cells));
    });
}

criterion_group!(benches, bench_refine, bench_coarsen, bench_differencing);
criterion_main!(benches);
