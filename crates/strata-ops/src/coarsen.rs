//! Restriction operators.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Once;

use strata_core::{Centering, Dim, IndexBox, IntVector, PreconditionViolation, SlotId};
use strata_kernels::{cubic_coarsen, face_average_coarsen, weighted_average_coarsen};
use strata_mesh::{CellData, Patch};
use strata_transfer::{CoarsenOperator, TransferError};

use crate::access;

static CUBIC_FALLBACK: Once = Once::new();
static CUBIC_FALLBACK_REPORTS: AtomicUsize = AtomicUsize::new(0);

/// Number of times the cubic coarsening fallback warning has been
/// emitted in this process. At most one.
pub fn cubic_fallback_reports() -> usize {
    CUBIC_FALLBACK_REPORTS.load(Ordering::Relaxed)
}

fn report_cubic_fallback(ratio: IntVector) {
    CUBIC_FALLBACK.call_once(|| {
        CUBIC_FALLBACK_REPORTS.fetch_add(1, Ordering::Relaxed);
        log::warn!(
            "cubic coarsening requires a refinement ratio of 4 or larger (got {ratio}); \
             reverting to weighted averaging"
        );
    });
}

/// Coarse cells of `coarse_box` whose fine cells all lie in `fine`'s interior.
fn covered(coarse_box: &IndexBox, fine: &CellData, ratio: IntVector) -> IndexBox {
    coarse_box.intersect(&fine.interior().coarsen(ratio))
}

fn cell_pair<'a>(
    coarse: &'a mut Patch,
    fine: &'a Patch,
    dst: SlotId,
    src: SlotId,
) -> Result<(&'a mut CellData, &'a CellData), TransferError> {
    let src_data = access::cell(fine, src)?;
    let dst_data = access::cell_mut(coarse, dst)?;
    Ok((dst_data, src_data))
}

/// Volume-weighted average of cell data.
#[derive(Clone, Copy, Debug, Default)]
pub struct CellConservativeCoarsen;

impl CoarsenOperator for CellConservativeCoarsen {
    fn name(&self) -> &str {
        "CONSERVATIVE_COARSEN"
    }

    fn centering(&self) -> Centering {
        Centering::Cell
    }

    fn priority(&self) -> i32 {
        0
    }

    fn stencil_width(&self, dim: Dim) -> IntVector {
        IntVector::splat(dim, 0)
    }

    fn coarsen(
        &self,
        coarse: &mut Patch,
        fine: &Patch,
        dst: SlotId,
        src: SlotId,
        coarse_box: &IndexBox,
        ratio: IntVector,
    ) -> Result<(), TransferError> {
        let (dst_data, src_data) = cell_pair(coarse, fine, dst, src)?;
        access::same_depth(dst_data.depth(), src_data.depth())?;
        let region = covered(coarse_box, src_data, ratio);
        weighted_average_coarsen(dst_data.array_mut(), src_data.array(), &region, ratio);
        Ok(())
    }
}

/// Area-weighted average of the fine faces tiling each coarse face.
///
/// This keeps the coarse flux through a coarse-fine interface equal to
/// the total fine flux through it.
#[derive(Clone, Copy, Debug, Default)]
pub struct FaceConservativeCoarsen;

impl CoarsenOperator for FaceConservativeCoarsen {
    fn name(&self) -> &str {
        "CONSERVATIVE_COARSEN"
    }

    fn centering(&self) -> Centering {
        Centering::Face
    }

    fn priority(&self) -> i32 {
        0
    }

    fn stencil_width(&self, dim: Dim) -> IntVector {
        IntVector::splat(dim, 0)
    }

    fn coarsen(
        &self,
        coarse: &mut Patch,
        fine: &Patch,
        dst: SlotId,
        src: SlotId,
        coarse_box: &IndexBox,
        ratio: IntVector,
    ) -> Result<(), TransferError> {
        let src_data = access::face(fine, src)?;
        let dst_data = access::face_mut(coarse, dst)?;
        access::same_depth(dst_data.depth(), src_data.depth())?;
        let region = coarse_box.intersect(&src_data.interior().coarsen(ratio));
        face_average_coarsen(dst_data.arrays_mut(), src_data.arrays(), &region, ratio);
        Ok(())
    }
}

/// Fourth-order restriction of cell data.
///
/// Requires uniform ghost widths on both patches and equal depths.
/// Ratios below four cannot fit the four-point stencil inside a coarse
/// cell; those fall back to [`CellConservativeCoarsen`] and the fallback
/// is logged once per process. At four and above the ratio must be even.
#[derive(Clone, Copy, Debug, Default)]
pub struct CubicCoarsen;

impl CubicCoarsen {
    fn check(&self, coarse: &CellData, fine: &CellData) -> Result<(), PreconditionViolation> {
        if !fine.has_uniform_ghost_width() {
            return Err(PreconditionViolation::NonUniformGhostWidth {
                what: "fine cell data".to_string(),
                ghosts: fine.ghosts(),
            });
        }
        if !coarse.has_uniform_ghost_width() {
            return Err(PreconditionViolation::NonUniformGhostWidth {
                what: "coarse cell data".to_string(),
                ghosts: coarse.ghosts(),
            });
        }
        if coarse.depth() != fine.depth() {
            return Err(PreconditionViolation::DepthMismatch {
                dst: coarse.depth(),
                src: fine.depth(),
            });
        }
        Ok(())
    }

    fn check_even(&self, dim: Dim, ratio: IntVector) -> Result<(), PreconditionViolation> {
        if dim.axes().any(|a| ratio[a] % 2 != 0) {
            return Err(PreconditionViolation::OddRatio {
                operator: self.name().to_string(),
                ratio,
            });
        }
        Ok(())
    }
}

impl CoarsenOperator for CubicCoarsen {
    fn name(&self) -> &str {
        "CUBIC_COARSEN"
    }

    fn centering(&self) -> Centering {
        Centering::Cell
    }

    fn priority(&self) -> i32 {
        0
    }

    fn stencil_width(&self, dim: Dim) -> IntVector {
        CellConservativeCoarsen.stencil_width(dim)
    }

    fn coarsen(
        &self,
        coarse: &mut Patch,
        fine: &Patch,
        dst: SlotId,
        src: SlotId,
        coarse_box: &IndexBox,
        ratio: IntVector,
    ) -> Result<(), TransferError> {
        let dim = coarse_box.dim();
        let (dst_data, src_data) = cell_pair(coarse, fine, dst, src)?;
        self.check(dst_data, src_data)?;
        let region = covered(coarse_box, src_data, ratio);
        if ratio.min_over(dim) < 4 {
            report_cubic_fallback(ratio);
            weighted_average_coarsen(dst_data.array_mut(), src_data.array(), &region, ratio);
        } else {
            self.check_even(dim, ratio)?;
            cubic_coarsen(dst_data.array_mut(), src_data.array(), &region, ratio);
        }
        Ok(())
    }
}
