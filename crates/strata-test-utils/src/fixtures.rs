//! Hierarchy builders and slot fillers.

use strata_core::{Dim, IndexBox, IntVector, SlotId, MAX_DIM};
use strata_mesh::{GridGeometry, PatchHierarchy, SlotInfo};

/// Unit square (2-D) or cube (3-D) with `n` cells per axis.
pub fn unit_geometry(dim: Dim, n: i32) -> GridGeometry {
    let domain = IndexBox::from_shape(dim, IntVector::ZERO, IntVector::splat(dim, n));
    GridGeometry::new(domain, [0.0; MAX_DIM], [1.0; MAX_DIM]).expect("unit geometry is valid")
}

/// Cell box `[lo, hi]` with the same bounds on every active axis.
pub fn cube(dim: Dim, lo: i32, hi: i32) -> IndexBox {
    IndexBox::new(dim, IntVector::splat(dim, lo), IntVector::splat(dim, hi))
}

/// One level covering the whole domain with a single patch.
pub fn uniform_hierarchy(geometry: GridGeometry) -> PatchHierarchy {
    let domain = *geometry.domain();
    let mut h = PatchHierarchy::new(geometry);
    h.add_level(&[domain], IntVector::splat(domain.dim(), 1))
        .expect("level 0 covers the domain");
    h
}

/// Level 0 split into `coarse_boxes` plus one finer level made of
/// `fine_boxes` refined by `ratio`.
pub fn two_level_hierarchy(
    geometry: GridGeometry,
    coarse_boxes: &[IndexBox],
    ratio: i32,
    fine_boxes: &[IndexBox],
) -> PatchHierarchy {
    let dim = geometry.dim();
    let mut h = PatchHierarchy::new(geometry);
    h.add_level(coarse_boxes, IntVector::splat(dim, 1))
        .expect("level 0 covers the domain");
    h.add_level(fine_boxes, IntVector::splat(dim, ratio))
        .expect("level 1 is nested");
    h
}

/// Allocate `info` on every level of `h`.
pub fn allocate(h: &mut PatchHierarchy, info: &SlotInfo) {
    for ln in 0..h.num_levels() {
        h.level_mut(ln)
            .expect("level exists")
            .allocate_patch_data(info);
    }
}

/// Set every stored cell value of `slot`, ghosts included, to
/// `f(x, d)` where `x` is the cell center.
pub fn fill_cell_slot(h: &mut PatchHierarchy, slot: SlotId, f: impl Fn([f64; MAX_DIM], usize) -> f64) {
    for ln in 0..h.num_levels() {
        let level = h.level_mut(ln).expect("level exists");
        for patch in level.patches_mut() {
            let Some(ghost_box) = patch.cell(slot).map(|c| *c.ghost_box()) else {
                continue;
            };
            let values: Vec<_> = ghost_box.iter().map(|p| (p, patch.cell_center(p))).collect();
            let data = patch.cell_mut(slot).expect("checked above");
            let depth = data.depth();
            for (p, x) in values {
                for d in 0..depth {
                    data.array_mut().set_value(p, d, f(x, d));
                }
            }
        }
    }
}

/// Set every stored face value of `slot` to `f(axis, x, d)` where `x`
/// is the face center.
pub fn fill_face_slot(
    h: &mut PatchHierarchy,
    slot: SlotId,
    f: impl Fn(usize, [f64; MAX_DIM], usize) -> f64,
) {
    for ln in 0..h.num_levels() {
        let level = h.level_mut(ln).expect("level exists");
        for patch in level.patches_mut() {
            let Some(boxes) = patch
                .face(slot)
                .map(|fd| fd.arrays().iter().map(|a| *a.data_box()).collect::<Vec<_>>())
            else {
                continue;
            };
            for (axis, bx) in boxes.into_iter().enumerate() {
                let values: Vec<_> = bx.iter().map(|p| (p, patch.face_center(axis, p))).collect();
                let data = patch.face_mut(slot).expect("checked above");
                let depth = data.depth();
                for (p, x) in values {
                    for d in 0..depth {
                        data.axis_mut(axis).set_value(p, d, f(axis, x, d));
                    }
                }
            }
        }
    }
}

/// Visit every interior cell of `slot` on level `ln` as
/// `(patch_box, p, x, value)` for component `d`.
pub fn for_each_cell(
    h: &PatchHierarchy,
    ln: usize,
    slot: SlotId,
    d: usize,
    mut f: impl FnMut(&IndexBox, IntVector, [f64; MAX_DIM], f64),
) {
    let level = h.level(ln).expect("level exists");
    for patch in level.patches() {
        let data = patch.cell(slot).expect("slot is allocated");
        for p in patch.index_box().iter() {
            f(patch.index_box(), p, patch.cell_center(p), data.array().value(p, d));
        }
    }
}

/// Largest `|value - expected(x)|` over interior cells of level `ln`
/// that satisfy `keep`.
pub fn max_error(
    h: &PatchHierarchy,
    ln: usize,
    slot: SlotId,
    d: usize,
    keep: impl Fn(IntVector) -> bool,
    expected: impl Fn([f64; MAX_DIM]) -> f64,
) -> f64 {
    let mut worst = 0.0_f64;
    for_each_cell(h, ln, slot, d, |_, p, x, v| {
        if keep(p) {
            worst = worst.max((v - expected(x)).abs());
        }
    });
    worst
}
