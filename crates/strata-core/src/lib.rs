//! Core types for the Strata block-structured AMR toolkit.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the index-space vocabulary shared by every other crate in the
//! workspace: integer vectors and boxes, box-indexed dense storage,
//! field definitions, strongly-typed handles, the error taxonomy and
//! the phase-timer capability used for instrumentation.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod array;
pub mod boxes;
pub mod error;
pub mod field;
pub mod id;
pub mod index;
pub mod timer;

pub use array::ArrayData;
pub use boxes::{BoxList, IndexBox};
pub use error::{ConfigError, PreconditionViolation};
pub use field::{Centering, FieldDef};
pub use id::{ContextId, FieldId, SlotId};
pub use index::{Dim, IntVector, MAX_DIM};
pub use timer::{NoopTimer, PhaseGuard, PhaseTimer};
