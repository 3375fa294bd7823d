//! Stencil kernels for Strata.
//!
//! Every kernel is a pure function over box-indexed dense arrays: it
//! reads its inputs, writes only the requested index range of its
//! output and keeps no state. 2-D and 3-D share one implementation
//! driven by the box dimension.
//!
//! Kernels do not validate layouts. Callers check ghost widths and
//! depths before invoking them; out-of-range reads trip a debug
//! assertion in [`ArrayData`](strata_core::ArrayData).
//!
//! Face arrays are passed as slices indexed by face normal axis.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod coarsen;
pub mod convective;
pub mod extrapolate;
pub mod refine;

pub use coarsen::{cubic_coarsen, face_average_coarsen, weighted_average_coarsen, CUBIC_WEIGHTS};
pub use convective::{advect_derivative, advect_flux, ctof_interp, ftoc_div, ftoc_div_add};
pub use extrapolate::extrapolate;
pub use refine::{constant_refine, conservative_linear_refine, quadratic_refine, quadratic_weights};
