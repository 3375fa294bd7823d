//! Multi-level vectors of slots.

use std::sync::Arc;

use strata_core::ConfigError;
use strata_mesh::{SharedHierarchy, SlotInfo};

/// A set of cell or face slots over a range of hierarchy levels.
///
/// The vector names storage; it does not own it. Data lives on the
/// hierarchy patches under each component's slot.
#[derive(Clone)]
pub struct HierarchyVector {
    hierarchy: SharedHierarchy,
    coarsest: usize,
    finest: usize,
    components: Vec<SlotInfo>,
}

impl HierarchyVector {
    /// An empty vector over levels `coarsest..=finest`.
    pub fn new(hierarchy: SharedHierarchy, coarsest: usize, finest: usize) -> Self {
        Self {
            hierarchy,
            coarsest,
            finest,
            components: Vec::new(),
        }
    }

    /// Builder-style [`add_component`](Self::add_component).
    pub fn with_component(mut self, info: SlotInfo) -> Self {
        self.add_component(info);
        self
    }

    /// Append a component.
    pub fn add_component(&mut self, info: SlotInfo) {
        self.components.push(info);
    }

    /// Hierarchy the vector lives on.
    pub fn hierarchy(&self) -> &SharedHierarchy {
        &self.hierarchy
    }

    /// Coarsest level in range.
    pub fn coarsest_level_number(&self) -> usize {
        self.coarsest
    }

    /// Finest level in range.
    pub fn finest_level_number(&self) -> usize {
        self.finest
    }

    /// Component `i`.
    pub fn component(&self, i: usize) -> Option<&SlotInfo> {
        self.components.get(i)
    }

    /// Number of components.
    pub fn num_components(&self) -> usize {
        self.components.len()
    }

    /// Error unless `other` spans the same levels of the same hierarchy.
    pub fn check_compatible(&self, other: &HierarchyVector) -> Result<(), ConfigError> {
        if !Arc::ptr_eq(&self.hierarchy, &other.hierarchy) {
            return Err(ConfigError::MismatchedVectors {
                reason: "vectors live on different hierarchies".into(),
            });
        }
        if (self.coarsest, self.finest) != (other.coarsest, other.finest) {
            return Err(ConfigError::MismatchedVectors {
                reason: format!(
                    "level ranges differ: {}..={} vs {}..={}",
                    self.coarsest, self.finest, other.coarsest, other.finest
                ),
            });
        }
        if self.coarsest > self.finest {
            return Err(ConfigError::MismatchedVectors {
                reason: format!("empty level range {}..={}", self.coarsest, self.finest),
            });
        }
        Ok(())
    }
}
