//! Robin boundary conditions at inflow boundaries.
//!
//! A strategy supplies `a`, `b`, `g` in `a*q + b*dq/dn = g` at each
//! boundary face, where `n` is the outward normal. The condition sets
//! the first ghost cell so that the face average `(q_i + q_g)/2` and the
//! one-sided normal difference `(q_g - q_i)/h` satisfy it.

use std::sync::Arc;

use strata_core::{IndexBox, IntVector, SlotId, MAX_DIM};
use strata_mesh::{MeshError, Patch};

use crate::error::ConvectiveError;

/// Coefficients of one Robin condition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RobinCoefs {
    /// Weight on the value.
    pub a: f64,
    /// Weight on the outward normal derivative.
    pub b: f64,
    /// Right-hand side.
    pub g: f64,
}

impl RobinCoefs {
    /// `q = g`.
    pub fn dirichlet(g: f64) -> Self {
        Self { a: 1.0, b: 0.0, g }
    }

    /// `dq/dn = g`.
    pub fn neumann(g: f64) -> Self {
        Self { a: 0.0, b: 1.0, g }
    }
}

/// Location of a boundary face handed to a [`RobinBcCoefStrategy`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundaryFace {
    /// Physical face center.
    pub x: [f64; MAX_DIM],
    /// Normal axis.
    pub axis: usize,
    /// True on the upper side of the domain.
    pub upper: bool,
}

/// Source of Robin coefficients for one field component.
pub trait RobinBcCoefStrategy: Send + Sync {
    /// Coefficients at `face` and `time`.
    fn coefficients(&self, face: &BoundaryFace, time: f64) -> RobinCoefs;
}

impl<F> RobinBcCoefStrategy for F
where
    F: Fn(&BoundaryFace, f64) -> RobinCoefs + Send + Sync,
{
    fn coefficients(&self, face: &BoundaryFace, time: f64) -> RobinCoefs {
        self(face, time)
    }
}

/// The same coefficients on every face at every time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantRobinBc(pub RobinCoefs);

impl ConstantRobinBc {
    /// Constant Dirichlet value.
    pub fn dirichlet(g: f64) -> Self {
        Self(RobinCoefs::dirichlet(g))
    }

    /// Constant normal derivative.
    pub fn neumann(g: f64) -> Self {
        Self(RobinCoefs::neumann(g))
    }
}

impl RobinBcCoefStrategy for ConstantRobinBc {
    fn coefficients(&self, _face: &BoundaryFace, _time: f64) -> RobinCoefs {
        self.0
    }
}

/// Per-component strategies; `None` means homogeneous Neumann.
pub type BcCoefs = Vec<Option<Arc<dyn RobinBcCoefStrategy>>>;

/// Ghost value satisfying `coefs` given interior value `q_i` and
/// normal spacing `h`. Degenerate coefficients leave the ghost as is.
fn ghost_value(coefs: RobinCoefs, q_i: f64, h: f64, current: f64) -> f64 {
    let denom = 0.5 * coefs.a + coefs.b / h;
    if denom == 0.0 {
        return current;
    }
    (coefs.g - 0.5 * coefs.a * q_i + coefs.b * q_i / h) / denom
}

/// Physical boundary treatment applied to each level patch after the
/// ghost fill.
pub(crate) struct InflowBoundary<'a> {
    pub coefs: &'a [Option<Arc<dyn RobinBcCoefStrategy>>],
    /// Only faces with `u·n < 0` are set.
    pub inflow_only: bool,
    /// Force `g = 0`.
    pub homogeneous: bool,
    pub time: f64,
}

impl InflowBoundary<'_> {
    /// Set the first ghost layer of `q` on the sides of `patch` that lie
    /// on a non-periodic boundary of `domain`.
    pub fn apply(
        &self,
        patch: &mut Patch,
        q: SlotId,
        u: SlotId,
        domain: &IndexBox,
        periodic: [bool; MAX_DIM],
    ) -> Result<(), ConvectiveError> {
        let bx = *patch.index_box();
        let dim = bx.dim();
        let dx = patch.dx();
        let (level, index) = (patch.level_number(), patch.index());
        let missing = |slot, what| MeshError::MissingData {
            level,
            patch: index,
            slot,
            what,
        };

        // Face centers are computed up front; the slot borrow below is exclusive.
        let mut sides = Vec::new();
        for axis in dim.axes() {
            if periodic[axis] {
                continue;
            }
            for upper in [false, true] {
                let on_boundary = if upper {
                    bx.upper()[axis] == domain.upper()[axis]
                } else {
                    bx.lower()[axis] == domain.lower()[axis]
                };
                if !on_boundary {
                    continue;
                }
                let mut lo = bx.lower();
                let mut hi = bx.upper();
                let plane = if upper { bx.upper()[axis] + 1 } else { bx.lower()[axis] };
                lo[axis] = plane;
                hi[axis] = plane;
                let faces: Vec<_> = IndexBox::new(dim, lo, hi)
                    .iter()
                    .map(|p| (p, patch.face_center(axis, p)))
                    .collect();
                sides.push((axis, upper, faces));
            }
        }

        let (q_data, others) = patch.split_slot_mut(q).ok_or_else(|| missing(q, "scratch"))?;
        let q_data = q_data.as_cell_mut().ok_or_else(|| missing(q, "cell scratch"))?;
        let u_data = others.face(u).ok_or_else(|| missing(u, "advection velocity"))?;
        let depth = q_data.depth();

        for (axis, upper, faces) in sides {
            let e = IntVector::unit(axis);
            let sign = if upper { 1.0 } else { -1.0 };
            for (p, x) in faces {
                let un = sign * u_data.axis(axis).value(p, 0);
                if self.inflow_only && un >= 0.0 {
                    continue;
                }
                let (interior, ghost) = if upper { (p - e, p) } else { (p, p - e) };
                let face = BoundaryFace { x, axis, upper };
                for d in 0..depth {
                    let mut coefs = match self.coefs.get(d).and_then(Option::as_ref) {
                        Some(strategy) => strategy.coefficients(&face, self.time),
                        None => RobinCoefs::neumann(0.0),
                    };
                    if self.homogeneous {
                        coefs.g = 0.0;
                    }
                    let array = q_data.array_mut();
                    let q_i = array.value(interior, d);
                    let current = array.value(ghost, d);
                    array.set_value(ghost, d, ghost_value(coefs, q_i, dx[axis], current));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::{Dim, FieldDef};

    const Q: SlotId = SlotId(0);
    const U: SlotId = SlotId(1);

    fn patch(u_x: f64) -> (Patch, IndexBox) {
        let dim = Dim::Two;
        let bx = IndexBox::from_shape(dim, IntVector::ZERO, IntVector::new(4, 4, 0));
        let mut patch = Patch::new(0, 0, bx, [0.25, 0.25, 0.0], [0.0; 3]);
        patch.allocate(Q, &FieldDef::cell("q", 1), IntVector::splat(dim, 1));
        patch.allocate(U, &FieldDef::face("u", 1), IntVector::ZERO);
        patch.cell_mut(Q).unwrap().array_mut().fill(2.0);
        patch.face_mut(U).unwrap().axis_mut(0).fill(u_x);
        (patch, bx)
    }

    fn ghost(patch: &Patch, p: IntVector) -> f64 {
        patch.cell(Q).unwrap().array().value(p, 0)
    }

    #[test]
    fn dirichlet_inflow_reflects_about_the_boundary_value() {
        let (mut p, domain) = patch(1.0);
        let coefs: BcCoefs = vec![Some(Arc::new(ConstantRobinBc::dirichlet(5.0)))];
        let bc = InflowBoundary {
            coefs: &coefs,
            inflow_only: true,
            homogeneous: false,
            time: 0.0,
        };
        bc.apply(&mut p, Q, U, &domain, [false; MAX_DIM]).unwrap();
        // Lower x side is inflow: (2 + q_g)/2 = 5.
        assert_eq!(ghost(&p, IntVector::new(-1, 2, 0)), 8.0);
        // Upper x side is outflow; y sides have u·n = 0.
        assert_eq!(ghost(&p, IntVector::new(4, 2, 0)), 2.0);
        assert_eq!(ghost(&p, IntVector::new(2, -1, 0)), 2.0);
    }

    #[test]
    fn without_extrapolation_every_side_is_set() {
        let (mut p, domain) = patch(1.0);
        let coefs: BcCoefs = vec![Some(Arc::new(ConstantRobinBc::dirichlet(5.0)))];
        let bc = InflowBoundary {
            coefs: &coefs,
            inflow_only: false,
            homogeneous: true,
            time: 0.0,
        };
        bc.apply(&mut p, Q, U, &domain, [false, true, false]).unwrap();
        // Homogeneous: (2 + q_g)/2 = 0.
        assert_eq!(ghost(&p, IntVector::new(4, 2, 0)), -2.0);
        assert_eq!(ghost(&p, IntVector::new(-1, 2, 0)), -2.0);
        // y is periodic and left alone.
        assert_eq!(ghost(&p, IntVector::new(2, 4, 0)), 2.0);
    }

    #[test]
    fn default_is_homogeneous_neumann() {
        let (mut p, domain) = patch(-1.0);
        p.cell_mut(Q).unwrap().array_mut().set_value(IntVector::new(3, 1, 0), 0, 7.0);
        let coefs: BcCoefs = vec![None];
        let bc = InflowBoundary {
            coefs: &coefs,
            inflow_only: true,
            homogeneous: false,
            time: 0.0,
        };
        bc.apply(&mut p, Q, U, &domain, [false; MAX_DIM]).unwrap();
        assert_eq!(ghost(&p, IntVector::new(4, 1, 0)), 7.0);
    }

    #[test]
    fn closures_are_strategies() {
        let robin = |face: &BoundaryFace, time: f64| RobinCoefs {
            a: 1.0,
            b: 0.0,
            g: face.x[1] + time,
        };
        let face = BoundaryFace {
            x: [0.0, 0.5, 0.0],
            axis: 0,
            upper: false,
        };
        assert_eq!(robin.coefficients(&face, 1.0).g, 1.5);
        assert_eq!(ghost_value(RobinCoefs::dirichlet(1.0), 3.0, 0.1, 0.0), -1.0);
        assert_eq!(ghost_value(RobinCoefs { a: 0.0, b: 0.0, g: 1.0 }, 3.0, 0.1, 4.0), 4.0);
    }
}
