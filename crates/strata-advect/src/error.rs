//! Convective operator errors.

use strata_core::{ConfigError, PreconditionViolation};
use strata_mesh::MeshError;
use strata_transfer::TransferError;

/// Errors from constructing, initializing or applying a
/// [`ConvectiveOperator`](crate::ConvectiveOperator).
///
/// Every variant is fatal for the call that produced it. Nothing is
/// retried and no output is written once a check has failed.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConvectiveError {
    /// Static misconfiguration.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Input data the stencils cannot work with.
    #[error(transparent)]
    Precondition(#[from] PreconditionViolation),
    /// Hierarchy or registry access failed.
    #[error(transparent)]
    Mesh(#[from] MeshError),
    /// Operator lookup or schedule failure.
    #[error(transparent)]
    Transfer(#[from] TransferError),
    /// Boundary coefficient strategies must be given per component.
    #[error("expected {expected} boundary coefficient strategies (one per component), got {found}")]
    BcCoefCount {
        /// Depth of the transported field.
        expected: usize,
        /// Number supplied.
        found: usize,
    },
}
