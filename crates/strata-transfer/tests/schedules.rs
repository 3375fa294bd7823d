//! Refine and coarsen schedules over small hierarchies.

use std::sync::Arc;

use strata_core::{Dim, FieldDef, IndexBox, IntVector};
use strata_mesh::{FieldRegistry, PatchHierarchy, SlotInfo};
use strata_test_utils::fixtures::{allocate, cube, fill_cell_slot, uniform_hierarchy, two_level_hierarchy, unit_geometry};
use strata_test_utils::{MockCoarsen, MockRefine};
use strata_transfer::{
    CartExtrapPhysBdryOp, CoarsenAlgorithm, ExtrapolationType, RefineAlgorithm, TransferError,
};

const DIM: Dim = Dim::Two;

struct Slots {
    src: SlotInfo,
    scratch: SlotInfo,
}

fn slots(registry: &mut FieldRegistry) -> Slots {
    let src = registry
        .register(FieldDef::cell("q", 1), "current", IntVector::ZERO)
        .unwrap();
    let scratch = registry
        .register(FieldDef::cell("q", 1), "scratch", IntVector::splat(DIM, 2))
        .unwrap();
    Slots { src, scratch }
}

fn value(h: &PatchHierarchy, ln: usize, slot: &SlotInfo, p: IntVector) -> f64 {
    h.level(ln)
        .unwrap()
        .patches()
        .iter()
        .find_map(|patch| {
            let data = patch.cell(slot.slot)?;
            data.ghost_box()
                .contains(p)
                .then(|| data.array().value(p, 0))
        })
        .unwrap()
}

fn value_on(h: &PatchHierarchy, ln: usize, patch: usize, slot: &SlotInfo, p: IntVector) -> f64 {
    h.level(ln).unwrap().patches()[patch]
        .cell(slot.slot)
        .unwrap()
        .array()
        .value(p, 0)
}

#[test]
fn ghosts_between_patches_come_from_neighbours() {
    let mut registry = FieldRegistry::new();
    let s = slots(&mut registry);
    let boxes = [
        IndexBox::new(DIM, IntVector::new(0, 0, 0), IntVector::new(3, 7, 0)),
        IndexBox::new(DIM, IntVector::new(4, 0, 0), IntVector::new(7, 7, 0)),
    ];
    let mut h = PatchHierarchy::new(unit_geometry(DIM, 8));
    h.add_level(&boxes, IntVector::splat(DIM, 1)).unwrap();
    allocate(&mut h, &s.src);
    allocate(&mut h, &s.scratch);
    fill_cell_slot(&mut h, s.src.slot, |x, _| x[0] + 2.0 * x[1]);

    let mut alg = RefineAlgorithm::new();
    alg.register_refine(s.scratch.slot, s.src.slot, s.scratch.clone(), Arc::new(MockRefine::new("M", 0, -1.0)));
    let schedule = alg.create_schedule(&h, 0, None).unwrap();
    schedule.fill_data(&mut h, 0.0).unwrap();

    // Ghost cells 4 and 5 of patch 0 lie in patch 1.
    let h8 = 1.0 / 8.0;
    for i in [4, 5] {
        let p = IntVector::new(i, 3, 0);
        let expect = (f64::from(i) + 0.5) * h8 + 2.0 * 3.5 * h8;
        assert!((value_on(&h, 0, 0, &s.scratch, p) - expect).abs() < 1e-14);
    }
    // Nothing fills cells outside the domain without a strategy.
    assert_eq!(value_on(&h, 0, 0, &s.scratch, IntVector::new(-1, 3, 0)), 0.0);
}

#[test]
fn periodic_ghosts_wrap_around() {
    let mut registry = FieldRegistry::new();
    let s = slots(&mut registry);
    let mut h = uniform_hierarchy(unit_geometry(DIM, 8).with_periodic(0));
    allocate(&mut h, &s.src);
    allocate(&mut h, &s.scratch);
    fill_cell_slot(&mut h, s.src.slot, |x, _| x[0]);

    let mut alg = RefineAlgorithm::new();
    alg.register_refine(s.scratch.slot, s.src.slot, s.scratch.clone(), Arc::new(MockRefine::new("M", 0, -1.0)));
    alg.create_schedule(&h, 0, None)
        .unwrap()
        .fill_data(&mut h, 0.0)
        .unwrap();

    let h8 = 1.0 / 8.0;
    assert!((value(&h, 0, &s.scratch, IntVector::new(-1, 2, 0)) - 7.5 * h8).abs() < 1e-14);
    assert!((value(&h, 0, &s.scratch, IntVector::new(9, 2, 0)) - 1.5 * h8).abs() < 1e-14);
}

#[test]
fn strategy_fills_physical_boundary_ghosts() {
    let mut registry = FieldRegistry::new();
    let s = slots(&mut registry);
    let mut h = uniform_hierarchy(unit_geometry(DIM, 8));
    allocate(&mut h, &s.src);
    allocate(&mut h, &s.scratch);
    fill_cell_slot(&mut h, s.src.slot, |x, _| 3.0 * x[0] - x[1]);

    let mut alg = RefineAlgorithm::new();
    alg.register_refine(s.scratch.slot, s.src.slot, s.scratch.clone(), Arc::new(MockRefine::new("M", 0, -1.0)));
    let strategy = Arc::new(CartExtrapPhysBdryOp::new(
        vec![s.scratch.slot],
        ExtrapolationType::Linear,
    ));
    alg.create_schedule(&h, 0, Some(strategy))
        .unwrap()
        .fill_data(&mut h, 0.0)
        .unwrap();

    let h8 = 1.0 / 8.0;
    for p in [IntVector::new(-1, 4, 0), IntVector::new(-2, -2, 0), IntVector::new(9, 8, 0)] {
        let x = (f64::from(p[0]) + 0.5) * h8;
        let y = (f64::from(p[1]) + 0.5) * h8;
        assert!((value(&h, 0, &s.scratch, p) - (3.0 * x - y)).abs() < 1e-12, "{p}");
    }
}

fn refined(registry: &mut FieldRegistry) -> (PatchHierarchy, Slots) {
    let s = slots(registry);
    let mut h = two_level_hierarchy(unit_geometry(DIM, 8), &[cube(DIM, 0, 7)], 2, &[cube(DIM, 4, 11)]);
    allocate(&mut h, &s.src);
    allocate(&mut h, &s.scratch);
    fill_cell_slot(&mut h, s.src.slot, |_, _| 5.0);
    (h, s)
}

#[test]
fn higher_priority_operator_overwrites() {
    let mut registry = FieldRegistry::new();
    let (mut h, s) = refined(&mut registry);
    let mut alg = RefineAlgorithm::new();
    alg.register_refine(s.scratch.slot, s.src.slot, s.scratch.clone(), Arc::new(MockRefine::new("HIGH", 1, 2.0)));
    alg.register_refine(s.scratch.slot, s.src.slot, s.scratch.clone(), Arc::new(MockRefine::new("LOW", 0, 1.0)));
    alg.create_schedule(&h, 1, None)
        .unwrap()
        .fill_data(&mut h, 0.0)
        .unwrap();

    // Coarse-fine ghost cells are refined; interior cells are copied.
    assert_eq!(value(&h, 1, &s.scratch, IntVector::new(3, 6, 0)), 2.0);
    assert_eq!(value(&h, 1, &s.scratch, IntVector::new(12, 13, 0)), 2.0);
    assert_eq!(value(&h, 1, &s.scratch, IntVector::new(6, 6, 0)), 5.0);
}

#[test]
fn equal_priorities_run_in_registration_order() {
    let mut registry = FieldRegistry::new();
    let (mut h, s) = refined(&mut registry);
    let mut alg = RefineAlgorithm::new();
    alg.register_refine(s.scratch.slot, s.src.slot, s.scratch.clone(), Arc::new(MockRefine::new("A", 0, 1.0)));
    alg.register_refine(s.scratch.slot, s.src.slot, s.scratch.clone(), Arc::new(MockRefine::new("B", 0, 3.0)));
    alg.create_schedule(&h, 1, None)
        .unwrap()
        .fill_data(&mut h, 0.0)
        .unwrap();
    assert_eq!(value(&h, 1, &s.scratch, IntVector::new(3, 6, 0)), 3.0);
}

#[test]
fn reset_schedule_switches_source_slot() {
    let mut registry = FieldRegistry::new();
    let (mut h, s) = refined(&mut registry);
    let other = registry
        .register(FieldDef::cell("q", 1), "other", IntVector::ZERO)
        .unwrap();
    allocate(&mut h, &other);
    fill_cell_slot(&mut h, other.slot, |_, _| 9.0);

    let op = Arc::new(MockRefine::new("M", 0, 1.0));
    let mut base = RefineAlgorithm::new();
    base.register_refine(s.scratch.slot, s.src.slot, s.scratch.clone(), op.clone());
    let mut schedule = base.create_schedule(&h, 1, None).unwrap();

    let mut swapped = RefineAlgorithm::new();
    swapped.register_refine(s.scratch.slot, other.slot, s.scratch.clone(), op);
    swapped.reset_schedule(&mut schedule).unwrap();
    schedule.fill_data(&mut h, 0.0).unwrap();
    assert_eq!(value(&h, 1, &s.scratch, IntVector::new(6, 6, 0)), 9.0);

    base.reset_schedule(&mut schedule).unwrap();
    schedule.fill_data(&mut h, 0.0).unwrap();
    assert_eq!(value(&h, 1, &s.scratch, IntVector::new(6, 6, 0)), 5.0);
}

#[test]
fn reset_with_a_different_shape_is_rejected() {
    let mut registry = FieldRegistry::new();
    let (h, s) = refined(&mut registry);
    let mut base = RefineAlgorithm::new();
    base.register_refine(s.scratch.slot, s.src.slot, s.scratch.clone(), Arc::new(MockRefine::new("M", 0, 1.0)));
    let mut schedule = base.create_schedule(&h, 1, None).unwrap();

    let mut wide = MockRefine::new("W", 0, 1.0);
    wide.stencil = 2;
    let mut other = RefineAlgorithm::new();
    other.register_refine(s.scratch.slot, s.src.slot, s.scratch.clone(), Arc::new(wide));
    assert!(matches!(
        other.reset_schedule(&mut schedule),
        Err(TransferError::IncompatibleReset { .. })
    ));

    let empty = RefineAlgorithm::new();
    assert!(matches!(
        empty.reset_schedule(&mut schedule),
        Err(TransferError::IncompatibleReset { .. })
    ));
}

#[test]
fn coarsen_touches_only_covered_cells() {
    let mut registry = FieldRegistry::new();
    let (mut h, s) = refined(&mut registry);
    let mut alg = CoarsenAlgorithm::new();
    alg.register_coarsen(s.src.slot, s.src.slot, Arc::new(MockCoarsen::new("M", 0, -4.0)));
    let schedule = alg.create_schedule(&h, 1).unwrap();
    assert_eq!(schedule.fine_level_number(), 1);
    schedule.coarsen_data(&mut h).unwrap();

    assert_eq!(value(&h, 0, &s.src, IntVector::new(2, 2, 0)), -4.0);
    assert_eq!(value(&h, 0, &s.src, IntVector::new(5, 5, 0)), -4.0);
    assert_eq!(value(&h, 0, &s.src, IntVector::new(1, 2, 0)), 5.0);
    assert_eq!(value(&h, 0, &s.src, IntVector::new(6, 6, 0)), 5.0);
}

#[test]
fn coarsen_from_level_zero_is_an_error() {
    let mut registry = FieldRegistry::new();
    let (h, s) = refined(&mut registry);
    let mut alg = CoarsenAlgorithm::new();
    alg.register_coarsen(s.src.slot, s.src.slot, Arc::new(MockCoarsen::new("M", 0, 0.0)));
    assert!(alg.create_schedule(&h, 0).is_err());
}
