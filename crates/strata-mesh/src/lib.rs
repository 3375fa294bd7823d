//! Block-structured mesh substrate for Strata.
//!
//! A [`PatchHierarchy`] is an ordered sequence of [`PatchLevel`]s, level
//! 0 coarsest. Each level holds non-overlapping [`Patch`]es, and each
//! patch owns one optional [`PatchData`] buffer per storage slot. Slots
//! are issued by an explicitly constructed [`FieldRegistry`] that maps
//! `(field, context)` pairs to stable handles.
//!
//! The substrate is serial: every patch of every level is local.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod geometry;
pub mod hierarchy;
pub mod level;
pub mod patch;
pub mod registry;

use std::sync::{Arc, RwLock};

pub use error::MeshError;
pub use geometry::GridGeometry;
pub use hierarchy::PatchHierarchy;
pub use level::{PatchLevel, PatchPair};
pub use patch::{CellData, FaceData, OtherSlots, Patch, PatchData};
pub use registry::{FieldRegistry, SlotInfo};

/// A hierarchy shared between the caller and the operators that act on it.
pub type SharedHierarchy = Arc<RwLock<PatchHierarchy>>;

/// Wrap a hierarchy for sharing.
pub fn share(hierarchy: PatchHierarchy) -> SharedHierarchy {
    Arc::new(RwLock::new(hierarchy))
}
