//! Test fixtures and mock operators for Strata development.
//!
//! [`fixtures`] builds small hierarchies over the unit square or cube and
//! fills slots from closed-form functions. [`MockRefine`] and
//! [`MockCoarsen`] write a fixed value so tests can see which operator
//! touched which cells. [`RecordingTimer`] captures phase notifications.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::Mutex;

use strata_core::{Centering, Dim, IndexBox, IntVector, PhaseTimer, SlotId};
use strata_mesh::{MeshError, Patch};
use strata_transfer::{CoarsenOperator, RefineOperator, TransferError};

/// Refine operator that writes `value` into every component of the
/// requested fine cells.
pub struct MockRefine {
    pub name: String,
    pub priority: i32,
    pub stencil: i32,
    pub value: f64,
}

impl MockRefine {
    pub fn new(name: &str, priority: i32, value: f64) -> Self {
        Self {
            name: name.to_string(),
            priority,
            stencil: 0,
            value,
        }
    }
}

fn missing(patch: &Patch, slot: SlotId) -> TransferError {
    MeshError::MissingData {
        level: patch.level_number(),
        patch: patch.index(),
        slot,
        what: "mock",
    }
    .into()
}

impl RefineOperator for MockRefine {
    fn name(&self) -> &str {
        &self.name
    }

    fn centering(&self) -> Centering {
        Centering::Cell
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn stencil_width(&self, dim: Dim) -> IntVector {
        IntVector::splat(dim, self.stencil)
    }

    fn refine(
        &self,
        fine: &mut Patch,
        _coarse: &Patch,
        dst: SlotId,
        _src: SlotId,
        fine_box: &IndexBox,
        _ratio: IntVector,
    ) -> Result<(), TransferError> {
        let err = missing(fine, dst);
        let data = fine.cell_mut(dst).ok_or(err)?;
        for d in 0..data.depth() {
            data.array_mut().fill_region(fine_box, d, self.value);
        }
        Ok(())
    }
}

/// Coarsen operator that writes `value` into every component of the
/// requested coarse cells.
pub struct MockCoarsen {
    pub name: String,
    pub priority: i32,
    pub value: f64,
}

impl MockCoarsen {
    pub fn new(name: &str, priority: i32, value: f64) -> Self {
        Self {
            name: name.to_string(),
            priority,
            value,
        }
    }
}

impl CoarsenOperator for MockCoarsen {
    fn name(&self) -> &str {
        &self.name
    }

    fn centering(&self) -> Centering {
        Centering::Cell
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn stencil_width(&self, dim: Dim) -> IntVector {
        IntVector::splat(dim, 0)
    }

    fn coarsen(
        &self,
        coarse: &mut Patch,
        _fine: &Patch,
        dst: SlotId,
        _src: SlotId,
        coarse_box: &IndexBox,
        _ratio: IntVector,
    ) -> Result<(), TransferError> {
        let err = missing(coarse, dst);
        let data = coarse.cell_mut(dst).ok_or(err)?;
        for d in 0..data.depth() {
            data.array_mut().fill_region(coarse_box, d, self.value);
        }
        Ok(())
    }
}

/// Phase event captured by [`RecordingTimer`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PhaseEvent {
    Start(String),
    Stop(String),
}

/// Timer that records every notification in order.
#[derive(Default)]
pub struct RecordingTimer {
    events: Mutex<Vec<PhaseEvent>>,
}

impl RecordingTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PhaseEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Names of phases that were started, in order.
    pub fn started(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                PhaseEvent::Start(name) => Some(name),
                PhaseEvent::Stop(_) => None,
            })
            .collect()
    }

    /// True when every start has a matching later stop.
    pub fn is_balanced(&self) -> bool {
        let mut open: Vec<String> = Vec::new();
        for e in self.events() {
            match e {
                PhaseEvent::Start(name) => open.push(name),
                PhaseEvent::Stop(name) => match open.iter().rposition(|n| *n == name) {
                    Some(i) => {
                        open.remove(i);
                    }
                    None => return false,
                },
            }
        }
        open.is_empty()
    }
}

impl PhaseTimer for RecordingTimer {
    fn start(&self, name: &str) {
        if let Ok(mut e) = self.events.lock() {
            e.push(PhaseEvent::Start(name.to_string()));
        }
    }

    fn stop(&self, name: &str) {
        if let Ok(mut e) = self.events.lock() {
            e.push(PhaseEvent::Stop(name.to_string()));
        }
    }
}
