//! Field, context and storage slot catalog.
//!
//! The registry is an ordinary value: create one per simulation, pass
//! it by reference to whatever needs to resolve slots, and drop it when
//! the hierarchy it describes is gone. Registration is idempotent for
//! identical requests and an error for conflicting ones, so independent
//! components that ask for the same `(field, context)` pair end up
//! sharing one slot.

use indexmap::{IndexMap, IndexSet};
use strata_core::{ContextId, FieldDef, FieldId, IntVector, SlotId};

use crate::error::MeshError;

/// Everything needed to allocate a slot.
#[derive(Clone, Debug, PartialEq)]
pub struct SlotInfo {
    /// Handle.
    pub slot: SlotId,
    /// Field stored in the slot.
    pub field: FieldId,
    /// Context the slot was registered under.
    pub context: ContextId,
    /// Definition of the field.
    pub def: FieldDef,
    /// Ghost width of every allocation of the slot.
    pub ghosts: IntVector,
}

/// Catalog mapping `(field, context)` pairs to storage slots.
#[derive(Clone, Debug, Default)]
pub struct FieldRegistry {
    fields: IndexMap<String, FieldDef>,
    contexts: IndexSet<String>,
    slots: Vec<SlotInfo>,
    by_pair: IndexMap<(FieldId, ContextId), SlotId>,
}

impl FieldRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a field, or return the existing ID if an identical
    /// definition is already registered under the same name.
    pub fn register_field(&mut self, def: FieldDef) -> Result<FieldId, MeshError> {
        if let Some((idx, _, existing)) = self.fields.get_full(&def.name) {
            if existing.depth != def.depth {
                return Err(MeshError::FieldConflict {
                    name: def.name,
                    what: "depth",
                });
            }
            if existing.centering != def.centering {
                return Err(MeshError::FieldConflict {
                    name: def.name,
                    what: "centering",
                });
            }
            return Ok(FieldId(idx as u32));
        }
        let (idx, _) = self.fields.insert_full(def.name.clone(), def);
        Ok(FieldId(idx as u32))
    }

    /// Look up a field by name.
    pub fn field_id(&self, name: &str) -> Option<FieldId> {
        self.fields.get_index_of(name).map(|i| FieldId(i as u32))
    }

    /// Definition of a registered field.
    pub fn field(&self, id: FieldId) -> Result<&FieldDef, MeshError> {
        self.fields
            .get_index(id.0 as usize)
            .map(|(_, def)| def)
            .ok_or(MeshError::UnknownHandle {
                what: "field",
                id: id.0,
            })
    }

    /// Get or create the context called `name`.
    pub fn context(&mut self, name: &str) -> ContextId {
        let (idx, _) = self.contexts.insert_full(name.to_string());
        ContextId(idx as u32)
    }

    /// Name of a context.
    pub fn context_name(&self, id: ContextId) -> Option<&str> {
        self.contexts.get_index(id.0 as usize).map(String::as_str)
    }

    /// Map `(field, context)` to a slot with the given ghost width.
    ///
    /// Re-registering the same pair with the same ghost width returns
    /// the existing slot.
    pub fn register_slot(
        &mut self,
        field: FieldId,
        context: ContextId,
        ghosts: IntVector,
    ) -> Result<SlotId, MeshError> {
        let def = self.field(field)?.clone();
        if let Some(&slot) = self.by_pair.get(&(field, context)) {
            let existing = self.slots[slot.index()].ghosts;
            if existing != ghosts {
                return Err(MeshError::SlotConflict {
                    name: def.name,
                    context: self.context_name(context).unwrap_or_default().to_string(),
                    existing,
                    requested: ghosts,
                });
            }
            return Ok(slot);
        }
        let slot = SlotId(self.slots.len() as u32);
        self.slots.push(SlotInfo {
            slot,
            field,
            context,
            def,
            ghosts,
        });
        self.by_pair.insert((field, context), slot);
        Ok(slot)
    }

    /// Register a field and a slot for it under the named context.
    pub fn register(
        &mut self,
        def: FieldDef,
        context: &str,
        ghosts: IntVector,
    ) -> Result<SlotInfo, MeshError> {
        let field = self.register_field(def)?;
        let context = self.context(context);
        let slot = self.register_slot(field, context, ghosts)?;
        Ok(self.slots[slot.index()].clone())
    }

    /// Slot for `(field, context)`, if registered.
    pub fn slot(&self, field: FieldId, context: ContextId) -> Option<SlotId> {
        self.by_pair.get(&(field, context)).copied()
    }

    /// Allocation details for a slot.
    pub fn slot_info(&self, slot: SlotId) -> Result<&SlotInfo, MeshError> {
        self.slots.get(slot.index()).ok_or(MeshError::UnknownHandle {
            what: "slot",
            id: slot.0,
        })
    }

    /// Number of slots issued.
    pub fn num_slots(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::{Centering, Dim};

    #[test]
    fn identical_requests_share_a_slot() {
        let mut reg = FieldRegistry::new();
        let g = IntVector::splat(Dim::Two, 1);
        let a = reg.register(FieldDef::cell("q", 1), "scratch", g).unwrap();
        let b = reg.register(FieldDef::cell("q", 1), "scratch", g).unwrap();
        assert_eq!(a.slot, b.slot);
        assert_eq!(reg.num_slots(), 1);
        let c = reg.register(FieldDef::cell("q", 1), "current", g).unwrap();
        assert_ne!(a.slot, c.slot);
        assert_eq!(a.field, c.field);
    }

    #[test]
    fn conflicting_depth_is_rejected() {
        let mut reg = FieldRegistry::new();
        reg.register_field(FieldDef::cell("q", 1)).unwrap();
        let err = reg.register_field(FieldDef::cell("q", 2)).unwrap_err();
        assert_eq!(
            err,
            MeshError::FieldConflict {
                name: "q".into(),
                what: "depth"
            }
        );
        assert!(reg.register_field(FieldDef::face("q", 1)).is_err());
    }

    #[test]
    fn conflicting_ghost_width_is_rejected() {
        let mut reg = FieldRegistry::new();
        reg.register(FieldDef::cell("q", 1), "ctx", IntVector::splat(Dim::Two, 1))
            .unwrap();
        let err = reg
            .register(FieldDef::cell("q", 1), "ctx", IntVector::splat(Dim::Two, 2))
            .unwrap_err();
        assert!(matches!(err, MeshError::SlotConflict { .. }));
    }

    #[test]
    fn lookups_resolve_registered_handles() {
        let mut reg = FieldRegistry::new();
        let info = reg
            .register(FieldDef::face("u", 1), "current", IntVector::ZERO)
            .unwrap();
        assert_eq!(reg.field_id("u"), Some(info.field));
        assert_eq!(reg.field(info.field).unwrap().centering, Centering::Face);
        assert_eq!(reg.context_name(info.context), Some("current"));
        assert_eq!(reg.slot(info.field, info.context), Some(info.slot));
        assert!(reg.slot_info(SlotId(9)).is_err());
    }
}
