//! Convective operator for scalar transport on Strata hierarchies.
//!
//! [`ConvectiveOperator`] evaluates the convective term of
//! `dq/dt + N(u, q) = 0` on a range of levels and writes `-N` into an
//! output slot. Fluxes at coarse-fine interfaces are synchronized before
//! differencing, so the conservative form loses nothing across
//! refinement boundaries.
//!
//! # Lifecycle
//!
//! ```text
//! new ──► initialize_operator_state ──► apply_convective_operator (repeat)
//!              ▲            │
//!              └────────────┴──► deallocate_operator_state / drop
//! ```
//!
//! Configuration ([`ConvectiveConfig`]) is validated when built.
//! Boundary conditions come from [`RobinBcCoefStrategy`] objects, one per
//! component. Phase timing is reported to an injected
//! [`PhaseTimer`](strata_core::PhaseTimer); [`OperatorMetrics`]
//! accumulates it.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod bc;
pub mod config;
pub mod error;
pub mod metrics;
pub mod operator;
pub mod vector;

pub use bc::{BcCoefs, BoundaryFace, ConstantRobinBc, RobinBcCoefStrategy, RobinCoefs};
pub use config::{ConvectiveConfig, DifferencingForm, InputOptions};
pub use error::ConvectiveError;
pub use metrics::{OperatorMetrics, PhaseStats};
pub use operator::ConvectiveOperator;
pub use strata_transfer::ExtrapolationType;
pub use vector::HierarchyVector;
