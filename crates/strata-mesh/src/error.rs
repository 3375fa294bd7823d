//! Errors raised by the mesh substrate.

use strata_core::{IndexBox, IntVector, PreconditionViolation, SlotId};

/// Errors from hierarchy construction, registry lookups and data access.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum MeshError {
    /// Grid geometry is unusable.
    #[error("invalid grid geometry: {reason}")]
    InvalidGeometry {
        /// What is wrong.
        reason: String,
    },
    /// A refinement ratio component is below one.
    #[error("level {level}: refinement ratio {ratio} must be at least 1 on every axis")]
    InvalidRatio {
        /// Level being added.
        level: usize,
        /// The ratio supplied.
        ratio: IntVector,
    },
    /// Patch boxes on one level are malformed.
    #[error("level {level}: patch box {patch_box} {reason}")]
    InvalidPatchBox {
        /// Level being added.
        level: usize,
        /// The offending box.
        patch_box: IndexBox,
        /// What is wrong with it.
        reason: &'static str,
    },
    /// Level 0 leaves part of the domain uncovered.
    #[error("level 0 does not cover the physical domain {domain}")]
    DomainNotCovered {
        /// The domain box.
        domain: IndexBox,
    },
    /// A level number outside the hierarchy.
    #[error("level {level} does not exist (hierarchy has {num_levels} levels)")]
    LevelOutOfRange {
        /// Requested level.
        level: usize,
        /// Number of levels.
        num_levels: usize,
    },
    /// A field name was re-registered with a different definition.
    #[error("field `{name}` is already registered with a different {what}")]
    FieldConflict {
        /// Field name.
        name: String,
        /// The differing attribute.
        what: &'static str,
    },
    /// A `(field, context)` pair was re-registered with a different ghost width.
    #[error("field `{name}` in context `{context}` is already registered with ghost width {existing}, requested {requested}")]
    SlotConflict {
        /// Field name.
        name: String,
        /// Context name.
        context: String,
        /// Registered ghost width.
        existing: IntVector,
        /// Requested ghost width.
        requested: IntVector,
    },
    /// A handle that the registry never issued.
    #[error("unknown {what} handle {id}")]
    UnknownHandle {
        /// Handle kind.
        what: &'static str,
        /// Raw handle value.
        id: u32,
    },
    /// A slot is missing or has the wrong centering on a patch.
    #[error("patch {patch} on level {level} has no {what} data in slot {slot}")]
    MissingData {
        /// Level number.
        level: usize,
        /// Patch index on the level.
        patch: usize,
        /// Slot looked up.
        slot: SlotId,
        /// Expected kind of data.
        what: &'static str,
    },
    /// Another thread panicked while holding the hierarchy lock.
    #[error("hierarchy lock poisoned")]
    Poisoned,
    /// Layout precondition failed.
    #[error(transparent)]
    Precondition(#[from] PreconditionViolation),
}
