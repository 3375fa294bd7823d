//! The patch hierarchy.

use strata_core::{BoxList, IndexBox, IntVector, MAX_DIM};

use crate::error::MeshError;
use crate::geometry::GridGeometry;
use crate::level::PatchLevel;
use crate::patch::Patch;

/// Ordered levels of patches, level 0 coarsest.
///
/// Levels are added coarsest first. Each new level is validated when
/// added: its ratio must be at least one on every axis, its boxes must
/// not overlap, must be aligned to the ratio, and must be properly
/// nested in the next coarser level. Level 0 must tile the domain.
#[derive(Clone, Debug)]
pub struct PatchHierarchy {
    geometry: GridGeometry,
    levels: Vec<PatchLevel>,
}

impl PatchHierarchy {
    /// An empty hierarchy over `geometry`.
    pub fn new(geometry: GridGeometry) -> Self {
        Self {
            geometry,
            levels: Vec::new(),
        }
    }

    /// Grid geometry.
    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// Number of levels.
    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    /// Number of the finest level, or `None` if the hierarchy is empty.
    pub fn finest_level_number(&self) -> Option<usize> {
        self.levels.len().checked_sub(1)
    }

    /// All levels.
    pub fn levels(&self) -> &[PatchLevel] {
        &self.levels
    }

    /// Level `ln`.
    pub fn level(&self, ln: usize) -> Result<&PatchLevel, MeshError> {
        let num_levels = self.levels.len();
        self.levels
            .get(ln)
            .ok_or(MeshError::LevelOutOfRange { level: ln, num_levels })
    }

    /// Mutable level `ln`.
    pub fn level_mut(&mut self, ln: usize) -> Result<&mut PatchLevel, MeshError> {
        let num_levels = self.levels.len();
        self.levels
            .get_mut(ln)
            .ok_or(MeshError::LevelOutOfRange { level: ln, num_levels })
    }

    /// Borrow level `fine_ln - 1` and level `fine_ln` mutably at once.
    pub fn coarse_fine_mut(
        &mut self,
        fine_ln: usize,
    ) -> Result<(&mut PatchLevel, &mut PatchLevel), MeshError> {
        let num_levels = self.levels.len();
        if fine_ln == 0 || fine_ln >= num_levels {
            return Err(MeshError::LevelOutOfRange {
                level: fine_ln,
                num_levels,
            });
        }
        let (head, tail) = self.levels.split_at_mut(fine_ln);
        Ok((&mut head[fine_ln - 1], &mut tail[0]))
    }

    /// Append a level made of `boxes`, refined by `ratio` from the
    /// current finest level. For level 0 the ratio must be one.
    ///
    /// Returns the new level number.
    pub fn add_level(&mut self, boxes: &[IndexBox], ratio: IntVector) -> Result<usize, MeshError> {
        let ln = self.levels.len();
        let dim = self.geometry.dim();
        if !ratio.all_at_least(dim, 1) || (ln == 0 && ratio != IntVector::splat(dim, 1)) {
            return Err(MeshError::InvalidRatio { level: ln, ratio });
        }
        let ratio_to_level_zero = match self.levels.last() {
            Some(coarser) => coarser.ratio_to_level_zero().scale(ratio, dim),
            None => ratio,
        };
        let domain = self.geometry.level_domain(ratio_to_level_zero);

        for (i, bx) in boxes.iter().enumerate() {
            if bx.is_empty() || bx.dim() != dim {
                return Err(invalid(ln, bx, "is empty or has the wrong dimension"));
            }
            if !domain.contains_box(bx) {
                return Err(invalid(ln, bx, "extends outside the physical domain"));
            }
            if boxes[..i].iter().any(|other| other.intersects(bx)) {
                return Err(invalid(ln, bx, "overlaps another patch on the level"));
            }
        }

        match self.levels.last() {
            None => {
                let covered: usize = boxes.iter().map(IndexBox::num_cells).sum();
                if covered != domain.num_cells() {
                    return Err(MeshError::DomainNotCovered { domain });
                }
            }
            Some(coarser) => {
                for bx in boxes {
                    let coarse = bx.coarsen(ratio);
                    if coarse.refine(ratio) != *bx {
                        return Err(invalid(ln, bx, "is not aligned to the refinement ratio"));
                    }
                    let mut uncovered = BoxList::from(coarse);
                    for cb in coarser.boxes() {
                        uncovered.remove(cb);
                    }
                    if !uncovered.is_empty() {
                        return Err(invalid(ln, bx, "is not nested in the coarser level"));
                    }
                }
            }
        }

        let dx = self.geometry.dx(ratio_to_level_zero);
        let patches = boxes
            .iter()
            .enumerate()
            .map(|(i, bx)| Patch::new(ln, i, *bx, dx, self.corner(bx, &domain, &dx)))
            .collect();
        self.levels.push(PatchLevel::new(
            ln,
            ratio,
            ratio_to_level_zero,
            domain,
            dx,
            patches,
        ));
        log::debug!("added level {ln} with {} patches, ratio {ratio}", boxes.len());
        Ok(ln)
    }
}

impl PatchHierarchy {
    fn corner(&self, bx: &IndexBox, domain: &IndexBox, dx: &[f64; MAX_DIM]) -> [f64; MAX_DIM] {
        let x_lo = self.geometry.x_lower();
        let mut x_lower = [0.0; MAX_DIM];
        for a in self.geometry.dim().axes() {
            let cells = f64::from(bx.lower()[a] - domain.lower()[a]);
            x_lower[a] = x_lo[a] + cells * dx[a];
        }
        x_lower
    }

    /// A free-standing patch over `bx` in the index space of level `ln`,
    /// with no data allocated. Used as scratch space for transfers; it
    /// is not part of the level and its [`Patch::index`] is `usize::MAX`.
    pub fn temporary_patch(&self, ln: usize, bx: IndexBox) -> Result<Patch, MeshError> {
        let level = self.level(ln)?;
        let dx = level.dx();
        Ok(Patch::new(
            ln,
            usize::MAX,
            bx,
            dx,
            self.corner(&bx, level.domain(), &dx),
        ))
    }
}

fn invalid(level: usize, bx: &IndexBox, reason: &'static str) -> MeshError {
    MeshError::InvalidPatchBox {
        level,
        patch_box: *bx,
        reason,
    }
}
