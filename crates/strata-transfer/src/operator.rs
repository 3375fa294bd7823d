//! Inter-level operator capabilities.

use strata_core::{Centering, Dim, FieldDef, IndexBox, IntVector, SlotId};
use strata_mesh::Patch;

use crate::error::TransferError;

/// Prolongation of one field from a coarse patch onto a fine patch.
///
/// Implementations are stateless apart from configuration and may be
/// shared between schedules.
pub trait RefineOperator: Send + Sync {
    /// Symbolic name used for lookup.
    fn name(&self) -> &str;

    /// Centering of the data the operator handles.
    fn centering(&self) -> Centering;

    /// Lower priorities run first; higher ones may overwrite them.
    fn priority(&self) -> i32;

    /// Coarse cells needed around the cells that cover the fine region.
    fn stencil_width(&self, dim: Dim) -> IntVector;

    /// True iff this operator handles `field` under `name`.
    fn matches(&self, field: &FieldDef, name: &str) -> bool {
        field.centering == self.centering() && name == self.name()
    }

    /// Fill `dst` on `fine` inside `fine_box` from `src` on `coarse`.
    ///
    /// Writes nothing outside `fine_box` and reads nothing outside the
    /// coarse data's storage.
    fn refine(
        &self,
        fine: &mut Patch,
        coarse: &Patch,
        dst: SlotId,
        src: SlotId,
        fine_box: &IndexBox,
        ratio: IntVector,
    ) -> Result<(), TransferError>;
}

/// Restriction of one field from a fine patch onto a coarse patch.
pub trait CoarsenOperator: Send + Sync {
    /// Symbolic name used for lookup.
    fn name(&self) -> &str;

    /// Centering of the data the operator handles.
    fn centering(&self) -> Centering;

    /// Lower priorities run first; higher ones may overwrite them.
    fn priority(&self) -> i32;

    /// Fine cells needed beyond those covered by the coarse region.
    fn stencil_width(&self, dim: Dim) -> IntVector;

    /// True iff this operator handles `field` under `name`.
    fn matches(&self, field: &FieldDef, name: &str) -> bool {
        field.centering == self.centering() && name == self.name()
    }

    /// Fill `dst` on `coarse` inside `coarse_box` from `src` on `fine`.
    fn coarsen(
        &self,
        coarse: &mut Patch,
        fine: &Patch,
        dst: SlotId,
        src: SlotId,
        coarse_box: &IndexBox,
        ratio: IntVector,
    ) -> Result<(), TransferError>;
}
