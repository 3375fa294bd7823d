//! Strata: block-structured AMR transfer operators and a convective
//! flux operator.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Strata sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use strata::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // An 8x8 unit square with a single patch.
//! let domain = IndexBox::new(Dim::Two, IntVector::ZERO, IntVector::splat(Dim::Two, 7));
//! let mut hierarchy = PatchHierarchy::new(GridGeometry::new(domain, [0.0; MAX_DIM], [1.0; MAX_DIM])?);
//! hierarchy.add_level(&[domain], IntVector::splat(Dim::Two, 1))?;
//!
//! let mut fields = FieldRegistry::new();
//! let q = fields.register(FieldDef::cell("Q", 1), "current", IntVector::ZERO)?;
//! let n = fields.register(FieldDef::cell("N", 1), "current", IntVector::ZERO)?;
//! let u = fields.register(FieldDef::face("U", 1), "current", IntVector::ZERO)?;
//!
//! let level = hierarchy.level_mut(0)?;
//! for info in [&q, &n, &u] {
//!     level.allocate_patch_data(info);
//! }
//! for patch in level.patches_mut() {
//!     if let Some(cells) = patch.cell_mut(q.slot) {
//!         cells.array_mut().fill(2.0);
//!     }
//!     if let Some(faces) = patch.face_mut(u.slot) {
//!         faces.arrays_mut().iter_mut().for_each(|a| a.fill(1.0));
//!     }
//! }
//! let hierarchy = share(hierarchy);
//!
//! let mut op = ConvectiveOperator::new(
//!     "transport",
//!     q.def.clone(),
//!     Dim::Two,
//!     ConvectiveConfig::default(),
//!     &mut fields,
//!     &default_registry(),
//! )?;
//! op.set_advection_velocity(u.slot);
//! let input = HierarchyVector::new(Arc::clone(&hierarchy), 0, 0).with_component(q.clone());
//! let output = HierarchyVector::new(Arc::clone(&hierarchy), 0, 0).with_component(n.clone());
//! op.initialize_operator_state(&input, &output)?;
//! op.apply_convective_operator(q.slot, n.slot)?;
//!
//! // A uniform scalar in a uniform stream is not transported.
//! let h = hierarchy.read().unwrap();
//! let out = h.level(0)?.patches()[0].cell(n.slot).unwrap();
//! assert!(out.array().as_slice().iter().all(|v| v.abs() < 1e-12));
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `strata-core` | Index space, dense arrays, field definitions, IDs |
//! | [`mesh`] | `strata-mesh` | Patches, levels, hierarchies, the field registry |
//! | [`kernels`] | `strata-kernels` | Stencil kernels |
//! | [`transfer`] | `strata-transfer` | Operator traits, algorithms and schedules |
//! | [`ops`] | `strata-ops` | Concrete refine and coarsen operators |
//! | [`advect`] | `strata-advect` | The convective operator |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types (`strata-core`).
///
/// Integer index space ([`types::IntVector`], [`types::IndexBox`]),
/// dense storage ([`types::ArrayData`]), field definitions and IDs.
pub use strata_core as types;

/// Patch hierarchy and field registry (`strata-mesh`).
pub use strata_mesh as mesh;

/// Stencil kernels (`strata-kernels`).
///
/// Pure functions over [`types::ArrayData`]; the operators in [`ops`]
/// and [`advect`] are built on them.
pub use strata_kernels as kernels;

/// Transfer machinery (`strata-transfer`).
///
/// [`transfer::RefineSchedule`] fills ghost and new-level data,
/// [`transfer::CoarsenSchedule`] synchronizes coarse data from finer
/// levels.
pub use strata_transfer as transfer;

/// Refine and coarsen operators (`strata-ops`).
pub use strata_ops as ops;

/// Convective operator (`strata-advect`).
pub use strata_advect as advect;

/// Common imports for typical Strata usage.
///
/// ```rust
/// use strata::prelude::*;
/// ```
pub mod prelude {
    // Index space and fields
    pub use strata_core::{Centering, Dim, FieldDef, IndexBox, IntVector, SlotId, MAX_DIM};

    // Errors
    pub use strata_core::{ConfigError, PreconditionViolation};
    pub use strata_mesh::MeshError;
    pub use strata_transfer::TransferError;

    // Mesh
    pub use strata_mesh::{share, FieldRegistry, GridGeometry, PatchHierarchy, SharedHierarchy, SlotInfo};

    // Transfer
    pub use strata_transfer::{
        CoarsenAlgorithm, CoarsenSchedule, ExtrapolationType, OperatorRegistry, RefineAlgorithm, RefineSchedule,
    };
    pub use strata_ops::default_registry;

    // Convective operator
    pub use strata_advect::{
        BcCoefs, ConvectiveConfig, ConvectiveError, ConvectiveOperator, DifferencingForm, HierarchyVector,
        RobinBcCoefStrategy, RobinCoefs,
    };
}
