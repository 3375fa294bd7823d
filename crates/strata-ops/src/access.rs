//! Patch data lookups shared by the operators.

use strata_core::{Centering, PreconditionViolation, SlotId};
use strata_mesh::{CellData, FaceData, MeshError, PatchData, Patch};
use strata_transfer::TransferError;

fn missing(level: usize, patch: usize, slot: SlotId, what: &'static str) -> TransferError {
    MeshError::MissingData {
        level,
        patch,
        slot,
        what,
    }
    .into()
}

fn wrong_centering(slot: SlotId, expected: Centering, found: Centering) -> TransferError {
    PreconditionViolation::CenteringMismatch {
        what: format!("slot {slot}"),
        expected,
        found,
    }
    .into()
}

fn lookup<'a>(patch: &'a Patch, slot: SlotId, what: &'static str) -> Result<&'a PatchData, TransferError> {
    patch
        .data(slot)
        .ok_or_else(|| missing(patch.level_number(), patch.index(), slot, what))
}

fn lookup_mut<'a>(
    patch: &'a mut Patch,
    slot: SlotId,
    what: &'static str,
) -> Result<&'a mut PatchData, TransferError> {
    let (level, index) = (patch.level_number(), patch.index());
    patch
        .data_mut(slot)
        .ok_or_else(|| missing(level, index, slot, what))
}

pub(crate) fn cell(patch: &Patch, slot: SlotId) -> Result<&CellData, TransferError> {
    let data = lookup(patch, slot, "cell")?;
    let found = data.centering();
    data.as_cell()
        .ok_or_else(|| wrong_centering(slot, Centering::Cell, found))
}

pub(crate) fn face(patch: &Patch, slot: SlotId) -> Result<&FaceData, TransferError> {
    let data = lookup(patch, slot, "face")?;
    let found = data.centering();
    data.as_face()
        .ok_or_else(|| wrong_centering(slot, Centering::Face, found))
}

pub(crate) fn cell_mut(patch: &mut Patch, slot: SlotId) -> Result<&mut CellData, TransferError> {
    let data = lookup_mut(patch, slot, "cell")?;
    let found = data.centering();
    data.as_cell_mut()
        .ok_or_else(|| wrong_centering(slot, Centering::Cell, found))
}

pub(crate) fn face_mut(patch: &mut Patch, slot: SlotId) -> Result<&mut FaceData, TransferError> {
    let data = lookup_mut(patch, slot, "face")?;
    let found = data.centering();
    data.as_face_mut()
        .ok_or_else(|| wrong_centering(slot, Centering::Face, found))
}

pub(crate) fn same_depth(dst: usize, src: usize) -> Result<(), TransferError> {
    if dst == src {
        Ok(())
    } else {
        Err(PreconditionViolation::DepthMismatch { dst, src }.into())
    }
}
