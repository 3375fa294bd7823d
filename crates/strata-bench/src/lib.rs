//! Benchmark profiles for the Strata operators.
//!
//! - [`reference_profile`]: two levels, 32^2 coarse cells, refined centre
//! - [`stress_profile`]: two levels, 32^3 coarse cells, refined centre
//! - [`smooth_array`]: a filled cell array for kernel benchmarks

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use strata_advect::{ConvectiveConfig, ConvectiveOperator, HierarchyVector};
use strata_core::{ArrayData, Dim, FieldDef, IndexBox, IntVector};
use strata_mesh::{share, FieldRegistry, SharedHierarchy, SlotInfo};
use strata_test_utils::fixtures::{allocate, cube, fill_cell_slot, fill_face_slot, two_level_hierarchy, unit_geometry};

/// A hierarchy with a scalar, an output slot and a velocity, ready to
/// hand to a [`ConvectiveOperator`].
pub struct AdvectionWorld {
    /// Slot registry shared with the operator.
    pub registry: FieldRegistry,
    /// The hierarchy holding all slots.
    pub hierarchy: SharedHierarchy,
    /// Transported scalar.
    pub q: SlotInfo,
    /// Operator output.
    pub n: SlotInfo,
    /// Face velocity.
    pub u: SlotInfo,
}

impl AdvectionWorld {
    /// Build a two-level world with `n` coarse cells per axis and the
    /// middle half refined by two.
    pub fn new(dim: Dim, n: i32) -> Self {
        let lo = n / 4;
        let fine = cube(dim, 2 * lo, 2 * (n - lo) - 1);
        let mut h = two_level_hierarchy(unit_geometry(dim, n), &[cube(dim, 0, n - 1)], 2, &[fine]);

        let mut registry = FieldRegistry::new();
        let q = registry.register(FieldDef::cell("Q", 1), "current", IntVector::ZERO).unwrap();
        let out = registry.register(FieldDef::cell("N", 1), "current", IntVector::ZERO).unwrap();
        let u = registry.register(FieldDef::face("U", 1), "current", IntVector::ZERO).unwrap();
        for info in [&q, &out, &u] {
            allocate(&mut h, info);
        }
        fill_cell_slot(&mut h, q.slot, |x, _| (6.0 * x[0]).sin() * (4.0 * x[1]).cos() + x[2]);
        fill_face_slot(&mut h, u.slot, |a, x, _| match a {
            0 => 1.0 + x[1] - x[2],
            1 => 0.5 - x[0] + x[2],
            _ => x[0] - x[1],
        });

        Self {
            registry,
            hierarchy: share(h),
            q,
            n: out,
            u,
        }
    }

    /// Build an initialized operator over every level of the world.
    pub fn operator(&mut self, config: ConvectiveConfig) -> ConvectiveOperator {
        let dim = self.hierarchy.read().unwrap().geometry().dim();
        let finest = self.hierarchy.read().unwrap().num_levels() - 1;
        let mut op = ConvectiveOperator::new(
            "bench",
            self.q.def.clone(),
            dim,
            config,
            &mut self.registry,
            &strata_ops::default_registry(),
        )
        .unwrap();
        op.set_advection_velocity(self.u.slot);
        let input = HierarchyVector::new(self.hierarchy.clone(), 0, finest).with_component(self.q.clone());
        let output = HierarchyVector::new(self.hierarchy.clone(), 0, finest).with_component(self.n.clone());
        op.initialize_operator_state(&input, &output).unwrap();
        op
    }
}

/// Reference profile: 2-D, 32x32 coarse cells.
pub fn reference_profile() -> AdvectionWorld {
    AdvectionWorld::new(Dim::Two, 32)
}

/// Stress profile: 3-D, 32^3 coarse cells.
pub fn stress_profile() -> AdvectionWorld {
    AdvectionWorld::new(Dim::Three, 32)
}

/// Cell array over `[lo, hi]` per axis filled with a smooth function.
pub fn smooth_array(dim: Dim, lo: i32, hi: i32) -> ArrayData {
    let bx = IndexBox::new(dim, IntVector::splat(dim, lo), IntVector::splat(dim, hi));
    let mut a = ArrayData::new(bx, 1);
    for p in bx.iter() {
        let v = (0.3 * p[0] as f64).sin() + 0.1 * p[1] as f64 - 0.05 * p[2] as f64;
        a.set_value(p, 0, v);
    }
    a
}
