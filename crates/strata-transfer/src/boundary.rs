//! Physical boundary strategies used during ghost fill.

use std::fmt;
use std::str::FromStr;

use strata_core::{ConfigError, IndexBox, SlotId};
use strata_mesh::Patch;

use crate::error::TransferError;

/// Sets data in cells that lie outside the physical domain.
///
/// Called by [`RefineSchedule::fill_data`](crate::RefineSchedule::fill_data)
/// after interior and coarse-fine values are in place, for level patches
/// and for the temporary coarse patches built during recursive fills.
pub trait PhysicalBoundaryStrategy: Send + Sync {
    /// Fill the cells of `fill_box` outside `valid` on `patch`.
    ///
    /// `valid` is `fill_box` clipped to the domain on non-periodic axes.
    fn set_physical_boundary_conditions(
        &self,
        patch: &mut Patch,
        fill_box: &IndexBox,
        valid: &IndexBox,
        time: f64,
    ) -> Result<(), TransferError>;
}

/// Polynomial order used to extrapolate interior values outward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExtrapolationType {
    /// No extrapolation; physical ghost cells come from boundary conditions.
    None,
    /// Copy the nearest interior value.
    Constant,
    /// Linear through the two nearest interior values.
    Linear,
    /// Quadratic through the three nearest interior values.
    Quadratic,
}

impl ExtrapolationType {
    /// Polynomial degree, or `None` for [`ExtrapolationType::None`].
    pub fn order(self) -> Option<usize> {
        match self {
            Self::None => None,
            Self::Constant => Some(0),
            Self::Linear => Some(1),
            Self::Quadratic => Some(2),
        }
    }
}

impl FromStr for ExtrapolationType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NONE" => Ok(Self::None),
            "CONSTANT" => Ok(Self::Constant),
            "LINEAR" => Ok(Self::Linear),
            "QUADRATIC" => Ok(Self::Quadratic),
            other => Err(ConfigError::UnsupportedExtrapolationType {
                found: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ExtrapolationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "NONE",
            Self::Constant => "CONSTANT",
            Self::Linear => "LINEAR",
            Self::Quadratic => "QUADRATIC",
        };
        f.write_str(s)
    }
}

/// Extrapolates cell-centered data outward at physical boundaries.
#[derive(Clone, Debug)]
pub struct CartExtrapPhysBdryOp {
    slots: Vec<SlotId>,
    kind: ExtrapolationType,
}

impl CartExtrapPhysBdryOp {
    /// Strategy extrapolating every component of each slot in `slots`.
    pub fn new(slots: Vec<SlotId>, kind: ExtrapolationType) -> Self {
        Self { slots, kind }
    }

    /// Extrapolation type.
    pub fn kind(&self) -> ExtrapolationType {
        self.kind
    }
}

impl PhysicalBoundaryStrategy for CartExtrapPhysBdryOp {
    fn set_physical_boundary_conditions(
        &self,
        patch: &mut Patch,
        fill_box: &IndexBox,
        valid: &IndexBox,
        _time: f64,
    ) -> Result<(), TransferError> {
        let Some(order) = self.kind.order() else {
            return Ok(());
        };
        for &slot in &self.slots {
            if let Some(cell) = patch.cell_mut(slot) {
                let depth = cell.depth();
                let valid = valid.intersect(cell.ghost_box());
                for d in 0..depth {
                    strata_kernels::extrapolate(cell.array_mut(), d, fill_box, &valid, order);
                }
            }
        }
        Ok(())
    }
}
