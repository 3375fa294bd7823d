//! Patch levels.

use strata_core::{IndexBox, IntVector, PreconditionViolation, SlotId, MAX_DIM};

use crate::error::MeshError;
use crate::patch::{Patch, PatchData};
use crate::registry::SlotInfo;

/// Two patches of one level borrowed for a transfer between them.
pub enum PatchPair<'a> {
    /// Source and destination are the same patch.
    Same(&'a mut Patch),
    /// Distinct destination and source patches.
    Distinct(&'a mut Patch, &'a Patch),
}

/// All patches at one refinement level.
#[derive(Clone, Debug)]
pub struct PatchLevel {
    number: usize,
    ratio_to_coarser: IntVector,
    ratio_to_level_zero: IntVector,
    domain: IndexBox,
    dx: [f64; MAX_DIM],
    patches: Vec<Patch>,
    allocated: Vec<bool>,
}

impl PatchLevel {
    pub(crate) fn new(
        number: usize,
        ratio_to_coarser: IntVector,
        ratio_to_level_zero: IntVector,
        domain: IndexBox,
        dx: [f64; MAX_DIM],
        patches: Vec<Patch>,
    ) -> Self {
        Self {
            number,
            ratio_to_coarser,
            ratio_to_level_zero,
            domain,
            dx,
            patches,
            allocated: Vec::new(),
        }
    }

    /// Level number, 0 coarsest.
    pub fn number(&self) -> usize {
        self.number
    }

    /// Refinement ratio relative to the next coarser level.
    pub fn ratio_to_coarser(&self) -> IntVector {
        self.ratio_to_coarser
    }

    /// Refinement ratio relative to level 0.
    pub fn ratio_to_level_zero(&self) -> IntVector {
        self.ratio_to_level_zero
    }

    /// Physical domain in this level's index space.
    pub fn domain(&self) -> &IndexBox {
        &self.domain
    }

    /// Cell spacing.
    pub fn dx(&self) -> [f64; MAX_DIM] {
        self.dx
    }

    /// Patches in this level.
    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    /// Mutable patches.
    pub fn patches_mut(&mut self) -> &mut [Patch] {
        &mut self.patches
    }

    /// Number of patches.
    pub fn num_patches(&self) -> usize {
        self.patches.len()
    }

    /// Patch boxes in patch order.
    pub fn boxes(&self) -> impl Iterator<Item = &IndexBox> + '_ {
        self.patches.iter().map(Patch::index_box)
    }

    /// Allocate `slot` on every patch of the level.
    pub fn allocate_patch_data(&mut self, info: &SlotInfo) {
        for patch in &mut self.patches {
            patch.allocate(info.slot, &info.def, info.ghosts);
        }
        let idx = info.slot.index();
        if self.allocated.len() <= idx {
            self.allocated.resize(idx + 1, false);
        }
        self.allocated[idx] = true;
        log::debug!(
            "level {}: allocated slot {} ({})",
            self.number,
            info.slot,
            info.def.name
        );
    }

    /// Release `slot` on every patch of the level.
    pub fn deallocate_patch_data(&mut self, slot: SlotId) {
        for patch in &mut self.patches {
            patch.deallocate(slot);
        }
        if let Some(flag) = self.allocated.get_mut(slot.index()) {
            *flag = false;
        }
    }

    /// True when `slot` is allocated on this level.
    pub fn check_allocated(&self, slot: SlotId) -> bool {
        self.allocated.get(slot.index()).copied().unwrap_or(false)
    }

    /// Error unless `slot` is allocated on this level.
    pub fn require_allocated(&self, slot: SlotId) -> Result<(), MeshError> {
        if self.check_allocated(slot) {
            Ok(())
        } else {
            Err(PreconditionViolation::NotAllocated {
                slot,
                level: self.number,
            }
            .into())
        }
    }

    /// Slot data on one patch, with a descriptive error when absent.
    pub fn patch_data(&self, patch: usize, slot: SlotId) -> Result<&PatchData, MeshError> {
        self.patches
            .get(patch)
            .and_then(|p| p.data(slot))
            .ok_or(MeshError::MissingData {
                level: self.number,
                patch,
                slot,
                what: "allocated",
            })
    }

    /// Borrow a destination patch mutably and a source patch immutably.
    pub fn patch_pair_mut(&mut self, dst: usize, src: usize) -> PatchPair<'_> {
        if dst == src {
            return PatchPair::Same(&mut self.patches[dst]);
        }
        if dst < src {
            let (head, tail) = self.patches.split_at_mut(src);
            PatchPair::Distinct(&mut head[dst], &tail[0])
        } else {
            let (head, tail) = self.patches.split_at_mut(dst);
            PatchPair::Distinct(&mut tail[0], &head[src])
        }
    }
}
