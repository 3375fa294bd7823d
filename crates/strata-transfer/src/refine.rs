//! Refine algorithms and schedules.

use std::sync::Arc;

use strata_core::{BoxList, Dim, IndexBox, IntVector, PreconditionViolation, SlotId};
use strata_mesh::{MeshError, Patch, PatchData, PatchHierarchy, PatchLevel, PatchPair, SlotInfo};

use crate::boundary::PhysicalBoundaryStrategy;
use crate::error::TransferError;
use crate::operator::RefineOperator;

/// One registered refine: fill `dst` from `src`, staging coarse data in
/// `scratch` and interpolating with `op`.
#[derive(Clone)]
struct RefineItem {
    dst: SlotId,
    src: SlotId,
    scratch: SlotInfo,
    op: Arc<dyn RefineOperator>,
}

/// Collection of refine items from which schedules are built.
#[derive(Clone, Default)]
pub struct RefineAlgorithm {
    items: Vec<RefineItem>,
}

impl RefineAlgorithm {
    /// An algorithm with no items.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill `dst` from `src` on the same level, and from `src` on
    /// coarser levels through `op` where the level has no data.
    ///
    /// `scratch` describes the field and ghost width of the filled data;
    /// its ghost width decides how far outside each patch is filled.
    pub fn register_refine(
        &mut self,
        dst: SlotId,
        src: SlotId,
        scratch: SlotInfo,
        op: Arc<dyn RefineOperator>,
    ) {
        self.items.push(RefineItem {
            dst,
            src,
            scratch,
            op,
        });
    }

    /// Number of registered items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn sorted_items(&self) -> Vec<RefineItem> {
        let mut items = self.items.clone();
        items.sort_by_key(|item| item.op.priority());
        items
    }

    /// Build the fill plan for level `ln` of `hierarchy`.
    ///
    /// Levels below `ln` supply data where level `ln` has none. With a
    /// boundary strategy, temporary coarse data extends past the
    /// physical domain and the strategy fills it; without one, coarse
    /// stencils see only cells inside the domain.
    pub fn create_schedule(
        &self,
        hierarchy: &PatchHierarchy,
        ln: usize,
        strategy: Option<Arc<dyn PhysicalBoundaryStrategy>>,
    ) -> Result<RefineSchedule, TransferError> {
        let level = hierarchy.level(ln)?;
        let planner = Planner {
            hierarchy,
            has_strategy: strategy.is_some(),
        };
        let mut items = Vec::with_capacity(self.items.len());
        for item in self.sorted_items() {
            let stencil = item.op.stencil_width(hierarchy.geometry().dim());
            let mut fills = Vec::with_capacity(level.num_patches());
            for patch in level.patches() {
                let target = patch.index_box().grow(item.scratch.ghosts);
                fills.push(PatchFill {
                    patch: patch.index(),
                    plan: planner.plan(ln, target, stencil)?,
                });
            }
            items.push(ScheduledItem { item, stencil, fills });
        }
        log::debug!(
            "refine schedule for level {ln}: {} items, {} patches",
            items.len(),
            level.num_patches()
        );
        Ok(RefineSchedule {
            level: ln,
            dim: hierarchy.geometry().dim(),
            items,
            strategy,
        })
    }

    /// Re-target `schedule` at this algorithm's slots and operators.
    ///
    /// The schedule's geometry is kept, so the algorithm must have the
    /// same number of items with the same stencil widths and ghost
    /// widths, taken in priority order.
    pub fn reset_schedule(&self, schedule: &mut RefineSchedule) -> Result<(), TransferError> {
        let items = self.sorted_items();
        if items.len() != schedule.items.len() {
            return Err(TransferError::IncompatibleReset {
                reason: format!(
                    "schedule has {} items, algorithm has {}",
                    schedule.items.len(),
                    items.len()
                ),
            });
        }
        for (scheduled, item) in schedule.items.iter().zip(&items) {
            let stencil = item.op.stencil_width(schedule.dim);
            if stencil != scheduled.stencil || item.scratch.ghosts != scheduled.item.scratch.ghosts {
                return Err(TransferError::IncompatibleReset {
                    reason: format!(
                        "operator `{}` does not match the stencil or ghost width of `{}`",
                        item.op.name(),
                        scheduled.item.op.name()
                    ),
                });
            }
        }
        for (scheduled, item) in schedule.items.iter_mut().zip(items) {
            scheduled.item = item;
        }
        Ok(())
    }
}

struct CopyTransaction {
    src_patch: usize,
    region: IndexBox,
    shift: IntVector,
}

struct RefineTransaction {
    fine_region: IndexBox,
    ratio: IntVector,
    coarse: FillPlan,
}

/// How to fill one region of one level: copies from the level's own
/// patches (including periodic images), refines from a recursively
/// filled coarser region, and whether part of it lies outside the
/// physical domain.
struct FillPlan {
    level: usize,
    target: IndexBox,
    valid: IndexBox,
    copies: Vec<CopyTransaction>,
    refines: Vec<RefineTransaction>,
}

impl FillPlan {
    fn touches_boundary(&self) -> bool {
        self.valid != self.target
    }
}

struct PatchFill {
    patch: usize,
    plan: FillPlan,
}

struct ScheduledItem {
    item: RefineItem,
    stencil: IntVector,
    fills: Vec<PatchFill>,
}

struct Planner<'a> {
    hierarchy: &'a PatchHierarchy,
    has_strategy: bool,
}

impl Planner<'_> {
    fn plan(&self, ln: usize, target: IndexBox, stencil: IntVector) -> Result<FillPlan, TransferError> {
        let geometry = self.hierarchy.geometry();
        let level = self.hierarchy.level(ln)?;
        let valid = geometry.clip_to_domain(&target, level.domain());

        let mut copies = Vec::new();
        let mut uncovered = BoxList::from(valid);
        for shift in geometry.periodic_shifts(level.domain()) {
            for patch in level.patches() {
                let region = valid.intersect(&patch.index_box().shift(shift));
                if region.is_empty() {
                    continue;
                }
                uncovered.remove(&region);
                copies.push(CopyTransaction {
                    src_patch: patch.index(),
                    region,
                    shift,
                });
            }
        }

        let mut refines = Vec::new();
        if ln > 0 && !uncovered.is_empty() {
            let ratio = level.ratio_to_coarser();
            let coarser = self.hierarchy.level(ln - 1)?;
            for fine_region in uncovered.iter() {
                let mut coarse_box = fine_region.coarsen(ratio).grow(stencil);
                if !self.has_strategy {
                    coarse_box = geometry.clip_to_domain(&coarse_box, coarser.domain());
                }
                refines.push(RefineTransaction {
                    fine_region: *fine_region,
                    ratio,
                    coarse: self.plan(ln - 1, coarse_box, stencil)?,
                });
            }
        } else if !uncovered.is_empty() {
            log::debug!(
                "level {ln}: {} cells of {target} have no source data",
                uncovered.num_cells()
            );
        }

        Ok(FillPlan {
            level: ln,
            target,
            valid,
            copies,
            refines,
        })
    }
}

/// Precomputed plan for filling one level from one [`RefineAlgorithm`].
pub struct RefineSchedule {
    level: usize,
    dim: Dim,
    items: Vec<ScheduledItem>,
    strategy: Option<Arc<dyn PhysicalBoundaryStrategy>>,
}

impl RefineSchedule {
    /// Level the schedule fills.
    pub fn level_number(&self) -> usize {
        self.level
    }

    /// Execute the plan. `time` is passed to the boundary strategy.
    ///
    /// Items run in ascending priority. For each destination patch the
    /// same-level copies run first, then coarse-level refines, then the
    /// boundary strategy.
    pub fn fill_data(&self, hierarchy: &mut PatchHierarchy, time: f64) -> Result<(), TransferError> {
        for scheduled in &self.items {
            for fill in &scheduled.fills {
                let coarse: Vec<_> = fill
                    .plan
                    .refines
                    .iter()
                    .map(|r| self.fill_temporary(hierarchy, &scheduled.item, &r.coarse, time))
                    .collect::<Result<_, _>>()?;

                let item = &scheduled.item;
                let level = hierarchy.level_mut(self.level)?;
                for copy in &fill.plan.copies {
                    copy_on_level(level, fill.patch, copy, item.dst, item.src)?;
                }
                let patch = &mut level.patches_mut()[fill.patch];
                for (r, coarse_patch) in fill.plan.refines.iter().zip(&coarse) {
                    item.op.refine(
                        patch,
                        coarse_patch,
                        item.dst,
                        item.scratch.slot,
                        &r.fine_region,
                        r.ratio,
                    )?;
                }
                if let Some(strategy) = &self.strategy {
                    if fill.plan.touches_boundary() {
                        strategy.set_physical_boundary_conditions(
                            patch,
                            &fill.plan.target,
                            &fill.plan.valid,
                            time,
                        )?;
                    }
                }
            }
        }
        Ok(())
    }

    fn fill_temporary(
        &self,
        hierarchy: &PatchHierarchy,
        item: &RefineItem,
        plan: &FillPlan,
        time: f64,
    ) -> Result<Patch, TransferError> {
        let scratch = item.scratch.slot;
        let mut temp = hierarchy.temporary_patch(plan.level, plan.target)?;
        temp.allocate(scratch, &item.scratch.def, IntVector::ZERO);

        let level = hierarchy.level(plan.level)?;
        for copy in &plan.copies {
            let src = level.patch_data(copy.src_patch, item.src)?;
            if let Some(dst) = temp.data_mut(scratch) {
                copy_data(dst, src, &copy.region, copy.shift)?;
            }
        }
        for r in &plan.refines {
            let coarse = self.fill_temporary(hierarchy, item, &r.coarse, time)?;
            item.op
                .refine(&mut temp, &coarse, scratch, scratch, &r.fine_region, r.ratio)?;
        }
        if let Some(strategy) = &self.strategy {
            if plan.touches_boundary() {
                strategy.set_physical_boundary_conditions(&mut temp, &plan.target, &plan.valid, time)?;
            }
        }
        Ok(temp)
    }
}

fn copy_on_level(
    level: &mut PatchLevel,
    dst_patch: usize,
    copy: &CopyTransaction,
    dst: SlotId,
    src: SlotId,
) -> Result<(), TransferError> {
    let level_number = level.number();
    let missing = |patch: usize, slot: SlotId| MeshError::MissingData {
        level: level_number,
        patch,
        slot,
        what: "allocated",
    };
    match level.patch_pair_mut(dst_patch, copy.src_patch) {
        PatchPair::Distinct(to, from) => {
            let src_data = from.data(src).ok_or_else(|| missing(copy.src_patch, src))?;
            let dst_data = to.data_mut(dst).ok_or_else(|| missing(dst_patch, dst))?;
            copy_data(dst_data, src_data, &copy.region, copy.shift)?;
        }
        PatchPair::Same(patch) if dst == src => {
            if copy.shift != IntVector::ZERO {
                let data = patch.data_mut(dst).ok_or_else(|| missing(dst_patch, dst))?;
                copy_within(data, &copy.region, copy.shift);
            }
        }
        PatchPair::Same(patch) => {
            let (dst_data, others) = patch
                .split_slot_mut(dst)
                .ok_or_else(|| missing(dst_patch, dst))?;
            let src_data = others.get(src).ok_or_else(|| missing(dst_patch, src))?;
            copy_data(dst_data, src_data, &copy.region, copy.shift)?;
        }
    }
    Ok(())
}

/// Copy the cells of `region` (and, for face data, the faces bounding
/// them) reading `src` at `p - shift`.
fn copy_data(
    dst: &mut PatchData,
    src: &PatchData,
    region: &IndexBox,
    shift: IntVector,
) -> Result<(), PreconditionViolation> {
    match (dst, src) {
        (PatchData::Cell(d), PatchData::Cell(s)) => {
            d.array_mut().copy_from(s.array(), region, shift);
        }
        (PatchData::Face(d), PatchData::Face(s)) => {
            for a in region.dim().axes() {
                d.axis_mut(a).copy_from(s.axis(a), &region.face_box(a), shift);
            }
        }
        (d, s) => {
            return Err(PreconditionViolation::CenteringMismatch {
                what: "refine source".into(),
                expected: d.centering(),
                found: s.centering(),
            })
        }
    }
    Ok(())
}

fn copy_within(data: &mut PatchData, region: &IndexBox, shift: IntVector) {
    match data {
        PatchData::Cell(c) => c.array_mut().copy_within(region, shift),
        PatchData::Face(f) => {
            for a in region.dim().axes() {
                f.axis_mut(a).copy_within(&region.face_box(a), shift);
            }
        }
    }
}
