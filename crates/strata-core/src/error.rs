//! Error taxonomy shared across the workspace.
//!
//! [`ConfigError`] covers static misconfiguration detected at setup or
//! at the start of an operation. [`PreconditionViolation`] covers data
//! layouts a stencil cannot work with. Both abort the current call and
//! are never retried. Degraded accuracy is not an error: operators fall
//! back to a lower-order stencil and report it once through `log`.

use crate::field::Centering;
use crate::id::SlotId;
use crate::index::IntVector;

/// A static configuration error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Differencing form outside ADVECTIVE, CONSERVATIVE, SKEW_SYMMETRIC.
    #[error(
        "unsupported differencing form: {found}; valid choices are: ADVECTIVE, CONSERVATIVE, SKEW_SYMMETRIC"
    )]
    UnsupportedDifferencingForm {
        /// The rejected value.
        found: String,
    },
    /// Extrapolation type outside NONE, CONSTANT, LINEAR, QUADRATIC.
    #[error(
        "unsupported outflow boundary extrapolation type: {found}; valid choices are: NONE, CONSTANT, LINEAR, QUADRATIC"
    )]
    UnsupportedExtrapolationType {
        /// The rejected value.
        found: String,
    },
    /// An option key that has been renamed.
    #[error("input key `{key}` has been changed to `{replacement}`")]
    DeprecatedKey {
        /// The obsolete key.
        key: String,
        /// The key to use instead.
        replacement: String,
    },
    /// An operation that needs initialized state was called without it.
    #[error("operator must be initialized prior to call to {operation}")]
    NotInitialized {
        /// The rejected operation.
        operation: &'static str,
    },
    /// Input and output vectors disagree on hierarchy or level range.
    #[error("input and output vectors are incompatible: {reason}")]
    MismatchedVectors {
        /// What differs.
        reason: String,
    },
    /// A required slot was never configured.
    #[error("no {what} has been set")]
    MissingInput {
        /// Description of the missing input.
        what: &'static str,
    },
    /// Only two and three dimensions are supported.
    #[error("unsupported spatial dimension {0}")]
    UnsupportedDimension(usize),
}

/// A data-layout precondition a stencil cannot work around.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PreconditionViolation {
    /// Ghost width differs between axes.
    #[error("{what} has non-uniform ghost width {ghosts}")]
    NonUniformGhostWidth {
        /// The offending data.
        what: String,
        /// Its ghost width.
        ghosts: IntVector,
    },
    /// Source and destination component counts differ.
    #[error("depth mismatch: destination has {dst} components, source has {src}")]
    DepthMismatch {
        /// Destination depth.
        dst: usize,
        /// Source depth.
        src: usize,
    },
    /// An operator that needs an even refinement ratio got an odd one.
    #[error("{operator} requires an even refinement ratio, got {ratio}")]
    OddRatio {
        /// Operator name.
        operator: String,
        /// The ratio supplied.
        ratio: IntVector,
    },
    /// Data has the wrong centering for the operation.
    #[error("{what}: expected {expected}-centered data, found {found}")]
    CenteringMismatch {
        /// The offending data.
        what: String,
        /// Required centering.
        expected: Centering,
        /// Actual centering.
        found: Centering,
    },
    /// Data has fewer ghost cells than the stencil reads.
    #[error("{what} needs ghost width {required}, found {found}")]
    InsufficientGhostWidth {
        /// The offending data.
        what: String,
        /// Minimum width.
        required: i32,
        /// Actual width.
        found: i32,
    },
    /// A slot was read on a level where it is not allocated.
    #[error("slot {slot} is not allocated on level {level}")]
    NotAllocated {
        /// The slot.
        slot: SlotId,
        /// The level number.
        level: usize,
    },
}
