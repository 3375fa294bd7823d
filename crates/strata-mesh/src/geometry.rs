//! Cartesian grid geometry.

use smallvec::SmallVec;
use strata_core::{Dim, IndexBox, IntVector, MAX_DIM};

use crate::error::MeshError;

/// Physical extent, coarse index domain and periodicity of a hierarchy.
#[derive(Clone, Debug, PartialEq)]
pub struct GridGeometry {
    domain: IndexBox,
    x_lo: [f64; MAX_DIM],
    x_up: [f64; MAX_DIM],
    periodic: [bool; MAX_DIM],
}

impl GridGeometry {
    /// Geometry mapping the level-0 index box `domain` onto `[x_lo, x_up]`.
    pub fn new(
        domain: IndexBox,
        x_lo: [f64; MAX_DIM],
        x_up: [f64; MAX_DIM],
    ) -> Result<Self, MeshError> {
        if domain.is_empty() {
            return Err(MeshError::InvalidGeometry {
                reason: "domain box is empty".into(),
            });
        }
        for a in domain.dim().axes() {
            if !(x_up[a] > x_lo[a]) {
                return Err(MeshError::InvalidGeometry {
                    reason: format!("upper coordinate on axis {a} must exceed lower"),
                });
            }
        }
        Ok(Self {
            domain,
            x_lo,
            x_up,
            periodic: [false; MAX_DIM],
        })
    }

    /// Mark `axis` periodic.
    pub fn with_periodic(mut self, axis: usize) -> Self {
        self.periodic[axis] = true;
        self
    }

    /// Spatial dimension.
    pub fn dim(&self) -> Dim {
        self.domain.dim()
    }

    /// Level-0 index domain.
    pub fn domain(&self) -> &IndexBox {
        &self.domain
    }

    /// Physical lower corner.
    pub fn x_lower(&self) -> [f64; MAX_DIM] {
        self.x_lo
    }

    /// Physical upper corner.
    pub fn x_upper(&self) -> [f64; MAX_DIM] {
        self.x_up
    }

    /// True when `axis` wraps around.
    pub fn is_periodic(&self, axis: usize) -> bool {
        self.periodic[axis]
    }

    /// Cell spacing on a level refined by `ratio` from level 0.
    pub fn dx(&self, ratio: IntVector) -> [f64; MAX_DIM] {
        let mut dx = [1.0; MAX_DIM];
        for a in self.dim().axes() {
            let n = self.domain.extent(a) as f64 * f64::from(ratio[a]);
            dx[a] = (self.x_up[a] - self.x_lo[a]) / n;
        }
        dx
    }

    /// Index domain of a level refined by `ratio` from level 0.
    pub fn level_domain(&self, ratio: IntVector) -> IndexBox {
        self.domain.refine(ratio)
    }

    /// Restrict `region` to a level's physical domain on non-periodic
    /// axes. Periodic axes are left unbounded.
    pub fn clip_to_domain(&self, region: &IndexBox, level_domain: &IndexBox) -> IndexBox {
        let mut lo = region.lower();
        let mut hi = region.upper();
        for a in self.dim().axes() {
            if !self.periodic[a] {
                lo[a] = lo[a].max(level_domain.lower()[a]);
                hi[a] = hi[a].min(level_domain.upper()[a]);
            }
        }
        IndexBox::new(self.dim(), lo, hi)
    }

    /// Periodic image shifts for a level domain, the zero shift first.
    pub fn periodic_shifts(&self, level_domain: &IndexBox) -> SmallVec<[IntVector; 27]> {
        let mut shifts: SmallVec<[IntVector; 27]> = SmallVec::new();
        shifts.push(IntVector::ZERO);
        for a in self.dim().axes() {
            if !self.periodic[a] {
                continue;
            }
            let period = level_domain.extent(a) as i32;
            let existing: SmallVec<[IntVector; 27]> = shifts.clone();
            for s in existing {
                for sign in [-1, 1] {
                    let mut shifted = s;
                    shifted[a] += sign * period;
                    shifts.push(shifted);
                }
            }
        }
        shifts
    }
}
