//! Inter-level data transfer for Strata.
//!
//! Operators that move one field between adjacent levels implement
//! [`RefineOperator`] or [`CoarsenOperator`] and are looked up by
//! symbolic name through an [`OperatorRegistry`]. Algorithms collect
//! `(destination, source, operator)` items and build schedules against
//! a concrete hierarchy:
//!
//! - [`RefineSchedule`] fills a level's data and ghost cells from the
//!   same level, periodic images and, recursively, coarser levels, then
//!   hands cells outside the physical domain to a
//!   [`PhysicalBoundaryStrategy`].
//! - [`CoarsenSchedule`] restricts a finer level onto the coarse data it
//!   covers.
//!
//! Schedules are built once per hierarchy configuration and executed
//! any number of times. Items run in ascending operator priority, ties
//! in registration order; later items overwrite earlier ones where
//! their regions overlap.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod boundary;
pub mod coarsen;
pub mod error;
pub mod operator;
pub mod refine;
pub mod registry;

pub use boundary::{CartExtrapPhysBdryOp, ExtrapolationType, PhysicalBoundaryStrategy};
pub use coarsen::{CoarsenAlgorithm, CoarsenSchedule};
pub use error::TransferError;
pub use operator::{CoarsenOperator, RefineOperator};
pub use refine::{RefineAlgorithm, RefineSchedule};
pub use registry::OperatorRegistry;
