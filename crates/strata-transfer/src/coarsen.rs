//! Coarsen algorithms and schedules.

use std::sync::Arc;

use strata_core::{Centering, IndexBox, IntVector, SlotId};
use strata_mesh::PatchHierarchy;

use crate::error::TransferError;
use crate::operator::CoarsenOperator;

#[derive(Clone)]
struct CoarsenItem {
    dst: SlotId,
    src: SlotId,
    op: Arc<dyn CoarsenOperator>,
}

/// Collection of coarsen items from which schedules are built.
#[derive(Clone, Default)]
pub struct CoarsenAlgorithm {
    items: Vec<CoarsenItem>,
}

impl CoarsenAlgorithm {
    /// An algorithm with no items.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict `src` on the fine level into `dst` on the coarse level.
    pub fn register_coarsen(&mut self, dst: SlotId, src: SlotId, op: Arc<dyn CoarsenOperator>) {
        self.items.push(CoarsenItem { dst, src, op });
    }

    /// Number of registered items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Plan restriction from level `fine_ln` onto level `fine_ln - 1`.
    ///
    /// Face-centered items also pick up coarse faces on the boundary of
    /// a coarse patch that coincide with fine faces, so neighbouring
    /// coarse patches agree on shared faces.
    pub fn create_schedule(
        &self,
        hierarchy: &PatchHierarchy,
        fine_ln: usize,
    ) -> Result<CoarsenSchedule, TransferError> {
        let fine = hierarchy.level(fine_ln)?;
        let coarse_ln = fine_ln.checked_sub(1).ok_or(strata_mesh::MeshError::LevelOutOfRange {
            level: fine_ln,
            num_levels: hierarchy.num_levels(),
        })?;
        let coarse = hierarchy.level(coarse_ln)?;
        let ratio = fine.ratio_to_coarser();
        let dim = hierarchy.geometry().dim();

        let mut items = self.items.clone();
        items.sort_by_key(|item| item.op.priority());
        let items = items
            .into_iter()
            .map(|item| {
                let reach = match item.op.centering() {
                    Centering::Cell => IntVector::ZERO,
                    Centering::Face => IntVector::splat(dim, 1),
                };
                let mut transactions = Vec::new();
                for c in coarse.patches() {
                    let near = c.index_box().grow(reach);
                    for f in fine.patches() {
                        let coarse_box = near.intersect(&f.index_box().coarsen(ratio));
                        if !coarse_box.is_empty() {
                            transactions.push(CoarsenTransaction {
                                coarse_patch: c.index(),
                                fine_patch: f.index(),
                                coarse_box,
                            });
                        }
                    }
                }
                ScheduledCoarsen { item, transactions }
            })
            .collect();
        log::debug!("coarsen schedule for levels {fine_ln} -> {coarse_ln}");
        Ok(CoarsenSchedule {
            fine_level: fine_ln,
            ratio,
            items,
        })
    }
}

struct CoarsenTransaction {
    coarse_patch: usize,
    fine_patch: usize,
    coarse_box: IndexBox,
}

struct ScheduledCoarsen {
    item: CoarsenItem,
    transactions: Vec<CoarsenTransaction>,
}

/// Precomputed plan restricting one level onto the next coarser one.
pub struct CoarsenSchedule {
    fine_level: usize,
    ratio: IntVector,
    items: Vec<ScheduledCoarsen>,
}

impl CoarsenSchedule {
    /// The finer of the two levels.
    pub fn fine_level_number(&self) -> usize {
        self.fine_level
    }

    /// Execute the plan.
    pub fn coarsen_data(&self, hierarchy: &mut PatchHierarchy) -> Result<(), TransferError> {
        let (coarse, fine) = hierarchy.coarse_fine_mut(self.fine_level)?;
        for scheduled in &self.items {
            let item = &scheduled.item;
            for t in &scheduled.transactions {
                let fine_patch = &fine.patches()[t.fine_patch];
                let coarse_patch = &mut coarse.patches_mut()[t.coarse_patch];
                item.op.coarsen(
                    coarse_patch,
                    fine_patch,
                    item.dst,
                    item.src,
                    &t.coarse_box,
                    self.ratio,
                )?;
            }
        }
        Ok(())
    }
}
