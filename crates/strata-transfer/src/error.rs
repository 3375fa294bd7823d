//! Transfer errors.

use strata_core::{Centering, ConfigError, PreconditionViolation};
use strata_mesh::MeshError;

/// Errors from operator lookup, schedule construction and execution.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum TransferError {
    /// No registered operator matches the field and name.
    #[error("no {centering}-centered operator named `{name}` is registered for field `{field}`")]
    UnknownOperator {
        /// Field the operator was requested for.
        field: String,
        /// Requested operator name.
        name: String,
        /// Field centering.
        centering: Centering,
    },
    /// A schedule was reset with an algorithm of a different shape.
    #[error("cannot reset schedule: {reason}")]
    IncompatibleReset {
        /// What differs.
        reason: String,
    },
    /// Hierarchy access failed.
    #[error(transparent)]
    Mesh(#[from] MeshError),
    /// An operator rejected its inputs.
    #[error(transparent)]
    Precondition(#[from] PreconditionViolation),
    /// Static misconfiguration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
