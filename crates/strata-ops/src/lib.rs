//! Inter-level operators for Strata.
//!
//! | Operator | Name | Centering | Stencil |
//! |----------|------|-----------|---------|
//! | [`ConservativeLinearRefine`] | `CONSERVATIVE_LINEAR_REFINE` | cell | 1 |
//! | [`QuadraticRefine`] | `QUADRATIC_REFINE` | cell | 1 |
//! | [`ConstantRefine`] | `CONSTANT_REFINE` | cell | 0 |
//! | [`CellConservativeCoarsen`] | `CONSERVATIVE_COARSEN` | cell | 0 |
//! | [`FaceConservativeCoarsen`] | `CONSERVATIVE_COARSEN` | face | 0 |
//! | [`CubicCoarsen`] | `CUBIC_COARSEN` | cell | 0 |
//!
//! All operators have priority 0. [`default_registry`] registers them
//! in the order above.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod access;
pub mod coarsen;
pub mod refine;

use std::sync::Arc;

use strata_transfer::OperatorRegistry;

pub use coarsen::{cubic_fallback_reports, CellConservativeCoarsen, CubicCoarsen, FaceConservativeCoarsen};
pub use refine::{ConservativeLinearRefine, ConstantRefine, QuadraticRefine};

/// A registry holding every operator in this crate.
pub fn default_registry() -> OperatorRegistry {
    let mut registry = OperatorRegistry::new();
    registry.register_refine(Arc::new(ConservativeLinearRefine));
    registry.register_refine(Arc::new(QuadraticRefine));
    registry.register_refine(Arc::new(ConstantRefine));
    registry.register_coarsen(Arc::new(CellConservativeCoarsen));
    registry.register_coarsen(Arc::new(FaceConservativeCoarsen));
    registry.register_coarsen(Arc::new(CubicCoarsen));
    registry
}
