//! Cell-centered prolongation operators.

use strata_core::{ArrayData, Centering, Dim, IndexBox, IntVector, SlotId};
use strata_kernels::{conservative_linear_refine, constant_refine, quadratic_refine};
use strata_mesh::Patch;
use strata_transfer::{RefineOperator, TransferError};

use crate::access;

type RefineKernel = fn(&mut ArrayData, &ArrayData, &IndexBox, IntVector);

fn run(
    kernel: RefineKernel,
    fine: &mut Patch,
    coarse: &Patch,
    dst: SlotId,
    src: SlotId,
    fine_box: &IndexBox,
    ratio: IntVector,
) -> Result<(), TransferError> {
    let src_data = access::cell(coarse, src)?;
    let dst_data = access::cell_mut(fine, dst)?;
    access::same_depth(dst_data.depth(), src_data.depth())?;
    kernel(dst_data.array_mut(), src_data.array(), fine_box, ratio);
    Ok(())
}

/// Conservative linear interpolation with limited slopes.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConservativeLinearRefine;

impl RefineOperator for ConservativeLinearRefine {
    fn name(&self) -> &str {
        "CONSERVATIVE_LINEAR_REFINE"
    }

    fn centering(&self) -> Centering {
        Centering::Cell
    }

    fn priority(&self) -> i32 {
        0
    }

    fn stencil_width(&self, dim: Dim) -> IntVector {
        IntVector::splat(dim, 1)
    }

    fn refine(
        &self,
        fine: &mut Patch,
        coarse: &Patch,
        dst: SlotId,
        src: SlotId,
        fine_box: &IndexBox,
        ratio: IntVector,
    ) -> Result<(), TransferError> {
        run(conservative_linear_refine, fine, coarse, dst, src, fine_box, ratio)
    }
}

/// Tensor-product quadratic interpolation.
///
/// Exact for quadratic data wherever both coarse neighbours exist;
/// degrades to linear then constant near the edge of coarse storage.
#[derive(Clone, Copy, Debug, Default)]
pub struct QuadraticRefine;

impl RefineOperator for QuadraticRefine {
    fn name(&self) -> &str {
        "QUADRATIC_REFINE"
    }

    fn centering(&self) -> Centering {
        Centering::Cell
    }

    fn priority(&self) -> i32 {
        0
    }

    fn stencil_width(&self, dim: Dim) -> IntVector {
        IntVector::splat(dim, 1)
    }

    fn refine(
        &self,
        fine: &mut Patch,
        coarse: &Patch,
        dst: SlotId,
        src: SlotId,
        fine_box: &IndexBox,
        ratio: IntVector,
    ) -> Result<(), TransferError> {
        run(quadratic_refine, fine, coarse, dst, src, fine_box, ratio)
    }
}

/// Piecewise-constant injection.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConstantRefine;

impl RefineOperator for ConstantRefine {
    fn name(&self) -> &str {
        "CONSTANT_REFINE"
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

    fn refine(
        &self,
        fine: &mut Patch,
        coarse: &Patch,
        dst: SlotId,
        src: SlotId,
        fine_box: &IndexBox,
        ratio: IntVector,
    ) -> Result<(), TransferError> {
        run(constant_refine, fine, coarse, dst, src, fine_box, ratio)
    }
}
