//! Restriction kernels.

use strata_core::{ArrayData, IndexBox, IntVector};

/// Per-axis weights of the four-point cubic restriction.
pub const CUBIC_WEIGHTS: [f64; 4] = [-1.0 / 16.0, 9.0 / 16.0, 9.0 / 16.0, -1.0 / 16.0];

/// Mean of the `r^dim` fine cells under each coarse cell of `coarse_box`.
///
/// Uniform spacing makes the volume weights equal.
pub fn weighted_average_coarsen(
    coarse: &mut ArrayData,
    fine: &ArrayData,
    coarse_box: &IndexBox,
    ratio: IntVector,
) {
    let dim = coarse_box.dim();
    let depth = coarse.depth().min(fine.depth());
    let region = coarse_box.intersect(coarse.data_box());
    let block = IndexBox::new(dim, IntVector::ZERO, IntVector::splat(dim, 1)).refine(ratio);
    let scale = 1.0 / block.num_cells() as f64;
    for ic in region.iter() {
        let base = ic.scale(ratio, dim);
        for d in 0..depth {
            let sum: f64 = block.iter().map(|k| fine.value(base + k, d)).sum();
            coarse.set_value(ic, d, sum * scale);
        }
    }
}

/// Four-point cubic restriction for even ratios of at least four.
///
/// Along each axis the coarse value uses fine cells `c-2 ..= c+1` with
/// `c = r*ic + r/2`, which straddle the coarse cell center, weighted by
/// [`CUBIC_WEIGHTS`]. Axes combine as a tensor product. All cells read
/// lie inside the coarse cell.
pub fn cubic_coarsen(coarse: &mut ArrayData, fine: &ArrayData, coarse_box: &IndexBox, ratio: IntVector) {
    let dim = coarse_box.dim();
    let n = dim.count();
    let depth = coarse.depth().min(fine.depth());
    let region = coarse_box.intersect(coarse.data_box());
    let taps = IndexBox::new(dim, IntVector::ZERO, IntVector::splat(dim, 3));
    for ic in region.iter() {
        let mut first = IntVector::ZERO;
        for a in 0..n {
            first[a] = ratio[a] * ic[a] + ratio[a] / 2 - 2;
        }
        for d in 0..depth {
            let mut sum = 0.0;
            for k in taps.iter() {
                let mut w = 1.0;
                for a in 0..n {
                    w *= CUBIC_WEIGHTS[k[a] as usize];
                }
                sum += w * fine.value(first + k, d);
            }
            coarse.set_value(ic, d, sum);
        }
    }
}

/// Face restriction: each coarse face takes the mean of the fine faces
/// that tile it.
///
/// Coarse face `i` normal to `a` coincides with fine face `r*i`; the
/// mean runs over the `r_b` fine indices of every transverse axis `b`.
pub fn face_average_coarsen(
    coarse: &mut [ArrayData],
    fine: &[ArrayData],
    coarse_box: &IndexBox,
    ratio: IntVector,
) {
    let dim = coarse_box.dim();
    for a in dim.axes() {
        let mut span = IntVector::splat(dim, 0);
        for b in dim.axes() {
            if b != a {
                span[b] = ratio[b] - 1;
            }
        }
        let block = IndexBox::new(dim, IntVector::ZERO, span);
        let scale = 1.0 / block.num_cells() as f64;
        let depth = coarse[a].depth().min(fine[a].depth());
        let region = coarse_box.face_box(a).intersect(coarse[a].data_box());
        for i in region.iter() {
            let base = i.scale(ratio, dim);
            for d in 0..depth {
                let sum: f64 = block.iter().map(|k| fine[a].value(base + k, d)).sum();
                coarse[a].set_value(i, d, sum * scale);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::Dim;

    fn fill(bx: &IndexBox, r: f64, f: impl Fn(f64, f64, f64) -> f64) -> ArrayData {
        let mut arr = ArrayData::new(*bx, 1);
        for p in bx.iter() {
            let x = (f64::from(p[0]) + 0.5) / r;
            let y = (f64::from(p[1]) + 0.5) / r;
            let z = (f64::from(p[2]) + 0.5) / r;
            arr.set_value(p, 0, f(x, y, z));
        }
        arr
    }

    #[test]
    fn cubic_coarsen_is_exact_for_cubic_point_values() {
        let dim = Dim::Two;
        let r = IntVector::splat(dim, 4);
        let coarse_box = IndexBox::from_shape(dim, IntVector::new(-1, 2, 0), IntVector::new(3, 2, 0));
        let f = |x: f64, y: f64, _: f64| x * x * x - 2.0 * x * y * y + y * y * y + 1.0;
        let fine = fill(&coarse_box.refine(r), 4.0, f);
        let mut coarse = ArrayData::new(coarse_box, 1);
        cubic_coarsen(&mut coarse, &fine, &coarse_box, r);
        for ic in coarse_box.iter() {
            let x = f64::from(ic[0]) + 0.5;
            let y = f64::from(ic[1]) + 0.5;
            assert!((coarse.value(ic, 0) - f(x, y, 0.0)).abs() < 1e-10);
        }
    }

    #[test]
    fn cubic_coarsen_stays_inside_the_coarse_cell_in_3d() {
        let dim = Dim::Three;
        let r = IntVector::splat(dim, 6);
        let coarse_box = IndexBox::from_shape(dim, IntVector::ZERO, IntVector::splat(dim, 2));
        let fine = fill(&coarse_box.refine(r), 6.0, |x, y, z| x + y * z);
        let mut coarse = ArrayData::new(coarse_box, 1);
        cubic_coarsen(&mut coarse, &fine, &coarse_box, r);
        for ic in coarse_box.iter() {
            let c = |a: usize| f64::from(ic[a]) + 0.5;
            assert!((coarse.value(ic, 0) - (c(0) + c(1) * c(2))).abs() < 1e-10);
        }
    }

    #[test]
    fn weighted_average_is_the_block_mean() {
        let dim = Dim::Two;
        let r = IntVector::new(2, 4, 0);
        let coarse_box = IndexBox::from_shape(dim, IntVector::ZERO, IntVector::new(2, 1, 0));
        let mut fine = ArrayData::new(coarse_box.refine(r), 1);
        for (n, p) in coarse_box.refine(r).iter().enumerate() {
            fine.set_value(p, 0, n as f64);
        }
        let mut coarse = ArrayData::new(coarse_box, 1);
        weighted_average_coarsen(&mut coarse, &fine, &coarse_box, r);
        // fine rows are 4 wide; block (0,0) holds indices {0,1,4,5,8,9,12,13}
        assert_eq!(coarse.value(IntVector::ZERO, 0), 6.5);
        assert_eq!(coarse.value(IntVector::new(1, 0, 0), 0), 8.5);
    }

    #[test]
    fn face_average_matches_fine_faces_exactly() {
        let dim = Dim::Two;
        let r = IntVector::splat(dim, 2);
        let coarse_box = IndexBox::from_shape(dim, IntVector::new(1, 1, 0), IntVector::new(2, 3, 0));
        let fine_box = coarse_box.refine(r);
        let fine: Vec<ArrayData> = dim
            .axes()
            .map(|a| {
                let mut arr = ArrayData::new(fine_box.face_box(a), 1);
                for p in fine_box.face_box(a).iter() {
                    arr.set_value(p, 0, (f64::from(p[0]) * 0.37).cos() + f64::from(p[1] * (a as i32 + 1)));
                }
                arr
            })
            .collect();
        let mut coarse: Vec<ArrayData> = dim
            .axes()
            .map(|a| ArrayData::new(coarse_box.face_box(a), 1))
            .collect();
        face_average_coarsen(&mut coarse, &fine, &coarse_box, r);
        let i = IntVector::new(3, 2, 0);
        let expect = 0.5 * (fine[0].value(IntVector::new(6, 4, 0), 0) + fine[0].value(IntVector::new(6, 5, 0), 0));
        assert_eq!(coarse[0].value(i, 0), expect);
        let expect = 0.5 * (fine[1].value(IntVector::new(2, 8, 0), 0) + fine[1].value(IntVector::new(3, 8, 0), 0));
        assert_eq!(coarse[1].value(IntVector::new(1, 4, 0), 0), expect);
    }
}
