//! Polynomial extrapolation into cells outside a valid region.

use strata_core::{ArrayData, IndexBox, IntVector};

/// Extrapolate component `d` of `data` into every cell of `fill_box`
/// that lies outside `valid`, using a polynomial of degree `order`
/// (0, 1 or 2) through the valid cells nearest the boundary.
///
/// Axes are swept in order and each cell is handled in the sweep of the
/// highest axis on which it lies outside `valid`, so edge and corner
/// cells extrapolate from values filled by earlier sweeps. The degree
/// drops when `valid` is too narrow to supply enough points.
pub fn extrapolate(data: &mut ArrayData, d: usize, fill_box: &IndexBox, valid: &IndexBox, order: usize) {
    let dim = fill_box.dim();
    let region = fill_box.intersect(data.data_box());
    if valid.is_empty() {
        return;
    }
    for a in dim.axes() {
        let (lo, hi) = (valid.lower()[a], valid.upper()[a]);
        let usable = order.min((hi - lo) as usize);
        for p in region.iter() {
            if p[a] >= lo && p[a] <= hi {
                continue;
            }
            let inside_later = (a + 1..dim.count())
                .all(|b| p[b] >= valid.lower()[b] && p[b] <= valid.upper()[b]);
            if !inside_later {
                continue;
            }
            let (edge, inward) = if p[a] < lo { (lo, 1) } else { (hi, -1) };
            let k = f64::from((p[a] - edge).abs());
            let mut src = p;
            src[a] = edge;
            let step = IntVector::unit(a) * inward;
            let q0 = data.value(src, d);
            let v = match usable {
                0 => q0,
                1 => {
                    let q1 = data.value(src + step, d);
                    (1.0 + k) * q0 - k * q1
                }
                _ => {
                    let q1 = data.value(src + step, d);
                    let q2 = data.value(src + step * 2, d);
                    0.5 * (k + 1.0) * (k + 2.0) * q0 - k * (k + 2.0) * q1 + 0.5 * k * (k + 1.0) * q2
                }
            };
            data.set_value(p, d, v);
        }
    }
}
