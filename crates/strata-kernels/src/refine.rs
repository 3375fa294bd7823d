//! Cell-centered prolongation kernels.
//!
//! Fine cell `i` lies in coarse cell `ic = floor(i / r)` at offset
//! `x = ((i - ic*r) + 0.5) / r - 0.5`, measured in coarse cell widths
//! from the coarse center. Stencils are applied as tensor products of
//! one-dimensional stencils and only read coarse cells inside the
//! coarse array's data box; when a neighbour is missing along an axis
//! that axis drops to a lower-order stencil.

use smallvec::SmallVec;
use strata_core::{ArrayData, IndexBox, IntVector, MAX_DIM};

type AxisStencil = SmallVec<[(i32, f64); 3]>;

/// Quadratic Lagrange weights for the coarse cells at `-1, 0, +1`
/// evaluated at offset `x`.
pub fn quadratic_weights(x: f64) -> [f64; 3] {
    [0.5 * x * (x - 1.0), 1.0 - x * x, 0.5 * x * (x + 1.0)]
}

fn offset(i: i32, ic: i32, r: i32) -> f64 {
    (f64::from(i - ic * r) + 0.5) / f64::from(r) - 0.5
}

/// One-dimensional interpolation stencil at offset `x` given which
/// neighbours exist.
///
/// Both neighbours: quadratic. Otherwise linear through the neighbour
/// on the side of `x`, else linear extrapolation through the opposite
/// neighbour, else constant.
fn interpolation_stencil(x: f64, has_lo: bool, has_hi: bool) -> AxisStencil {
    let mut s = AxisStencil::new();
    if x == 0.0 {
        s.push((0, 1.0));
        return s;
    }
    if has_lo && has_hi {
        let w = quadratic_weights(x);
        s.extend([(-1, w[0]), (0, w[1]), (1, w[2])]);
        return s;
    }
    let side = if x > 0.0 { 1 } else { -1 };
    let near = if side > 0 { has_hi } else { has_lo };
    let far = if side > 0 { has_lo } else { has_hi };
    let ax = x.abs();
    if near {
        s.extend([(0, 1.0 - ax), (side, ax)]);
    } else if far {
        s.extend([(0, 1.0 + ax), (-side, -ax)]);
    } else {
        s.push((0, 1.0));
    }
    s
}

fn axis_range(data: &ArrayData, axis: usize) -> (i32, i32) {
    (data.data_box().lower()[axis], data.data_box().upper()[axis])
}

/// Evaluate the tensor product of per-axis stencils around `center`.
fn apply_tensor(coarse: &ArrayData, d: usize, center: IntVector, stencils: &[AxisStencil]) -> f64 {
    let mut total = 0.0;
    let mut idx = [0usize; MAX_DIM];
    let n = stencils.len();
    loop {
        let mut p = center;
        let mut w = 1.0;
        for a in 0..n {
            let (off, wa) = stencils[a][idx[a]];
            p[a] += off;
            w *= wa;
        }
        total += w * coarse.value(p, d);
        let mut a = 0;
        while a < n {
            idx[a] += 1;
            if idx[a] < stencils[a].len() {
                break;
            }
            idx[a] = 0;
            a += 1;
        }
        if a == n {
            return total;
        }
    }
}

/// Fine cells of `fine_box` that `fine` stores and whose enclosing
/// coarse cell `coarse` stores.
fn refinable(fine: &ArrayData, coarse: &ArrayData, fine_box: &IndexBox, ratio: IntVector) -> IndexBox {
    let region = fine_box.intersect(fine.data_box());
    region.intersect(&coarse.data_box().refine(ratio))
}

/// Quadratic interpolation of all components from `coarse` into the
/// cells of `fine_box`.
pub fn quadratic_refine(fine: &mut ArrayData, coarse: &ArrayData, fine_box: &IndexBox, ratio: IntVector) {
    let dim = fine_box.dim();
    let depth = fine.depth().min(coarse.depth());
    let region = refinable(fine, coarse, fine_box, ratio);
    for p in region.iter() {
        let ic = p.floor_div(ratio, dim);
        let stencils: SmallVec<[AxisStencil; MAX_DIM]> = dim
            .axes()
            .map(|a| {
                let (lo, hi) = axis_range(coarse, a);
                let x = offset(p[a], ic[a], ratio[a]);
                interpolation_stencil(x, ic[a] > lo, ic[a] < hi)
            })
            .collect();
        for d in 0..depth {
            let v = apply_tensor(coarse, d, ic, &stencils);
            fine.set_value(p, d, v);
        }
    }
}

fn mc_limited(dl: f64, dr: f64) -> f64 {
    if dl * dr <= 0.0 {
        return 0.0;
    }
    let dc = 0.5 * (dl + dr);
    dc.signum() * dc.abs().min(2.0 * dl.abs()).min(2.0 * dr.abs())
}

/// Conservative linear interpolation: the coarse value plus
/// monotonized-central limited slopes. Exact for linear data; the mean
/// over the fine cells of each coarse cell equals the coarse value.
///
/// Where one neighbour is missing the one-sided difference is used
/// unlimited; with neither the slope is zero.
pub fn conservative_linear_refine(
    fine: &mut ArrayData,
    coarse: &ArrayData,
    fine_box: &IndexBox,
    ratio: IntVector,
) {
    let dim = fine_box.dim();
    let depth = fine.depth().min(coarse.depth());
    let region = refinable(fine, coarse, fine_box, ratio);
    for p in region.iter() {
        let ic = p.floor_div(ratio, dim);
        for d in 0..depth {
            let q0 = coarse.value(ic, d);
            let mut v = q0;
            for a in dim.axes() {
                let e = IntVector::unit(a);
                let lo = coarse.try_value(ic - e, d).map(|q| q0 - q);
                let hi = coarse.try_value(ic + e, d).map(|q| q - q0);
                let slope = match (lo, hi) {
                    (Some(dl), Some(dr)) => mc_limited(dl, dr),
                    (Some(dl), None) => dl,
                    (None, Some(dr)) => dr,
                    (None, None) => 0.0,
                };
                v += slope * offset(p[a], ic[a], ratio[a]);
            }
            fine.set_value(p, d, v);
        }
    }
}

/// Piecewise-constant injection of the enclosing coarse value.
pub fn constant_refine(fine: &mut ArrayData, coarse: &ArrayData, fine_box: &IndexBox, ratio: IntVector) {
    let dim = fine_box.dim();
    let depth = fine.depth().min(coarse.depth());
    let region = refinable(fine, coarse, fine_box, ratio);
    for p in region.iter() {
        let ic = p.floor_div(ratio, dim);
        for d in 0..depth {
            fine.set_value(p, d, coarse.value(ic, d));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use strata_core::Dim;

    fn coarse_box() -> IndexBox {
        IndexBox::from_shape(Dim::Two, IntVector::new(-1, -1, 0), IntVector::new(6, 6, 0))
    }

    fn fill(bx: &IndexBox, f: impl Fn(f64, f64) -> f64) -> ArrayData {
        let mut arr = ArrayData::new(*bx, 1);
        for p in bx.iter() {
            arr.set_value(p, 0, f(f64::from(p[0]) + 0.5, f64::from(p[1]) + 0.5));
        }
        arr
    }

    #[test]
    fn quadratic_weights_reproduce_quadratics() {
        for &x in &[-0.375, -0.125, 0.125, 0.375] {
            let w = quadratic_weights(x);
            assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-14);
            let val = w[0] * 1.0 + w[1] * 0.0 + w[2] * 1.0;
            assert!((val - x * x).abs() < 1e-14);
        }
    }

    #[test]
    fn quadratic_refine_is_exact_for_biquadratic_data() {
        let r = IntVector::splat(Dim::Two, 4);
        let f = |x: f64, y: f64| 1.0 + 2.0 * x - y + 0.5 * x * x - 0.25 * x * y * y + y * y;
        let coarse = fill(&coarse_box(), f);
        let fine_box = IndexBox::from_shape(Dim::Two, IntVector::ZERO, IntVector::new(16, 16, 0));
        let mut fine = ArrayData::new(fine_box, 1);
        quadratic_refine(&mut fine, &coarse, &fine_box, r);
        for p in fine_box.iter() {
            let x = (f64::from(p[0]) + 0.5) / 4.0;
            let y = (f64::from(p[1]) + 0.5) / 4.0;
            assert!((fine.value(p, 0) - f(x, y)).abs() < 1e-10, "at {p}");
        }
    }

    #[test]
    fn quadratic_refine_degrades_to_linear_at_data_edge() {
        let r = IntVector::splat(Dim::Two, 2);
        let cb = IndexBox::from_shape(Dim::Two, IntVector::ZERO, IntVector::new(3, 3, 0));
        let coarse = fill(&cb, |x, y| 3.0 * x - 2.0 * y);
        let fine_box = cb.refine(r);
        let mut fine = ArrayData::new(fine_box, 1);
        quadratic_refine(&mut fine, &coarse, &fine_box, r);
        for p in fine_box.iter() {
            let x = (f64::from(p[0]) + 0.5) / 2.0;
            let y = (f64::from(p[1]) + 0.5) / 2.0;
            assert!((fine.value(p, 0) - (3.0 * x - 2.0 * y)).abs() < 1e-12);
        }
    }

    #[test]
    fn single_coarse_cell_gives_constant() {
        let r = IntVector::splat(Dim::Two, 2);
        let cb = IndexBox::from_shape(Dim::Two, IntVector::new(2, 2, 0), IntVector::new(1, 1, 0));
        let mut coarse = ArrayData::new(cb, 1);
        coarse.fill(7.0);
        let fine_box = cb.refine(r);
        let mut fine = ArrayData::new(fine_box, 1);
        quadratic_refine(&mut fine, &coarse, &fine_box, r);
        assert!(fine.as_slice().iter().all(|&v| v == 7.0));
    }

    #[test]
    fn conservative_linear_preserves_coarse_means() {
        let r = IntVector::splat(Dim::Two, 2);
        let cb = coarse_box();
        let coarse = fill(&cb, |x, y| (x * 1.3).sin() + y * y);
        let interior = IndexBox::from_shape(Dim::Two, IntVector::ZERO, IntVector::new(5, 5, 0));
        let fine_box = interior.refine(r);
        let mut fine = ArrayData::new(fine_box, 1);
        conservative_linear_refine(&mut fine, &coarse, &fine_box, r);
        for ic in interior.iter() {
            let cell = IndexBox::new(Dim::Two, ic, ic).refine(r);
            let mean: f64 = cell.iter().map(|p| fine.value(p, 0)).sum::<f64>() / 4.0;
            assert!((mean - coarse.value(ic, 0)).abs() < 1e-12);
        }
    }

    #[test]
    fn conservative_linear_is_exact_for_linear_data() {
        let r = IntVector::splat(Dim::Two, 2);
        let cb = coarse_box();
        let coarse = fill(&cb, |x, y| 0.5 * x + 4.0 * y - 1.0);
        let fine_box = cb.refine(r);
        let mut fine = ArrayData::new(fine_box, 1);
        conservative_linear_refine(&mut fine, &coarse, &fine_box, r);
        for p in fine_box.iter() {
            let x = (f64::from(p[0]) + 0.5) / 2.0;
            let y = (f64::from(p[1]) + 0.5) / 2.0;
            assert!((fine.value(p, 0) - (0.5 * x + 4.0 * y - 1.0)).abs() < 1e-12);
        }
    }

    #[test]
    fn constant_refine_injects() {
        let r = IntVector::new(2, 3, 0);
        let cb = IndexBox::from_shape(Dim::Two, IntVector::ZERO, IntVector::new(2, 2, 0));
        let coarse = fill(&cb, |x, y| x + 10.0 * y);
        let fine_box = cb.refine(r);
        let mut fine = ArrayData::new(fine_box, 1);
        constant_refine(&mut fine, &coarse, &fine_box, r);
        assert_eq!(fine.value(IntVector::new(3, 5, 0), 0), 1.5 + 15.0);
    }

    proptest! {
        #[test]
        fn refine_never_reads_outside_the_coarse_data(
            lx in -4i32..4, ly in -4i32..4, wx in 2i32..5, wy in 2i32..5,
            fx in -12i32..12, fy in -12i32..12, gx in 1i32..10, gy in 1i32..10,
            ratio in 1i32..5,
        ) {
            let r = IntVector::splat(Dim::Two, ratio);
            let cb = IndexBox::from_shape(Dim::Two, IntVector::new(lx, ly, 0), IntVector::new(wx, wy, 0));
            let coarse = fill(&cb, |x, y| x - y);
            let fine_box = IndexBox::from_shape(Dim::Two, IntVector::new(fx, fy, 0), IntVector::new(gx, gy, 0));
            let exact = |p: IntVector| {
                let x = (f64::from(p[0]) + 0.5) / f64::from(ratio);
                let y = (f64::from(p[1]) + 0.5) / f64::from(ratio);
                x - y
            };
            let covered = fine_box.intersect(&cb.refine(r));

            let mut fine = ArrayData::new(fine_box, 1);
            quadratic_refine(&mut fine, &coarse, &fine_box, r);
            for p in covered.iter() {
                prop_assert!((fine.value(p, 0) - exact(p)).abs() < 1e-9);
            }

            let mut fine = ArrayData::new(fine_box, 1);
            conservative_linear_refine(&mut fine, &coarse, &fine_box, r);
            for p in covered.iter() {
                prop_assert!((fine.value(p, 0) - exact(p)).abs() < 1e-9);
            }
        }
    }
}
