//! Operator lookup by field and symbolic name.

use std::sync::Arc;

use strata_core::FieldDef;

use crate::error::TransferError;
use crate::operator::{CoarsenOperator, RefineOperator};

/// Catalog of refine and coarsen operators.
///
/// Lookup returns the first registered operator whose
/// [`matches`](RefineOperator::matches) accepts the field and name.
#[derive(Clone, Default)]
pub struct OperatorRegistry {
    refine: Vec<Arc<dyn RefineOperator>>,
    coarsen: Vec<Arc<dyn CoarsenOperator>>,
}

impl OperatorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a refine operator.
    pub fn register_refine(&mut self, op: Arc<dyn RefineOperator>) {
        self.refine.push(op);
    }

    /// Add a coarsen operator.
    pub fn register_coarsen(&mut self, op: Arc<dyn CoarsenOperator>) {
        self.coarsen.push(op);
    }

    /// Refine operator for `field` registered as `name`.
    pub fn lookup_refine(
        &self,
        field: &FieldDef,
        name: &str,
    ) -> Result<Arc<dyn RefineOperator>, TransferError> {
        self.refine
            .iter()
            .find(|op| op.matches(field, name))
            .cloned()
            .ok_or_else(|| unknown(field, name))
    }

    /// Coarsen operator for `field` registered as `name`.
    pub fn lookup_coarsen(
        &self,
        field: &FieldDef,
        name: &str,
    ) -> Result<Arc<dyn CoarsenOperator>, TransferError> {
        self.coarsen
            .iter()
            .find(|op| op.matches(field, name))
            .cloned()
            .ok_or_else(|| unknown(field, name))
    }

    /// Names of the registered refine operators, in registration order.
    pub fn refine_names(&self) -> impl Iterator<Item = &str> {
        self.refine.iter().map(|op| op.name())
    }

    /// Names of the registered coarsen operators, in registration order.
    pub fn coarsen_names(&self) -> impl Iterator<Item = &str> {
        self.coarsen.iter().map(|op| op.name())
    }
}

fn unknown(field: &FieldDef, name: &str) -> TransferError {
    TransferError::UnknownOperator {
        field: field.name.clone(),
        name: name.to_string(),
        centering: field.centering,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::{Centering, Dim, IndexBox, IntVector, SlotId};
    use strata_mesh::Patch;

    struct Named(&'static str, Centering);

    impl CoarsenOperator for Named {
        fn name(&self) -> &str {
            self.0
        }
        fn centering(&self) -> Centering {
            self.1
        }
        fn priority(&self) -> i32 {
            0
        }
        fn stencil_width(&self, _dim: Dim) -> IntVector {
            IntVector::ZERO
        }
        fn coarsen(
            &self,
            _coarse: &mut Patch,
            _fine: &Patch,
            _dst: SlotId,
            _src: SlotId,
            _coarse_box: &IndexBox,
            _ratio: IntVector,
        ) -> Result<(), TransferError> {
            Ok(())
        }
    }

    #[test]
    fn lookup_matches_name_and_centering() {
        let mut reg = OperatorRegistry::new();
        reg.register_coarsen(Arc::new(Named("AVG", Centering::Cell)));
        reg.register_coarsen(Arc::new(Named("AVG", Centering::Face)));
        let face = FieldDef::face("flux", 1);
        assert_eq!(reg.lookup_coarsen(&face, "AVG").unwrap().centering(), Centering::Face);
        let err = reg.lookup_coarsen(&face, "CUBIC").err().unwrap();
        assert!(matches!(err, TransferError::UnknownOperator { .. }));
        assert!(reg.lookup_refine(&face, "AVG").is_err());
        assert_eq!(reg.coarsen_names().collect::<Vec<_>>(), vec!["AVG", "AVG"]);
    }

    #[test]
    fn first_registered_match_wins() {
        struct Tagged(i32);
        impl CoarsenOperator for Tagged {
            fn name(&self) -> &str {
                "SAME"
            }
            fn centering(&self) -> Centering {
                Centering::Cell
            }
            fn priority(&self) -> i32 {
                self.0
            }
            fn stencil_width(&self, _dim: Dim) -> IntVector {
                IntVector::ZERO
            }
            fn coarsen(
                &self,
                _coarse: &mut Patch,
                _fine: &Patch,
                _dst: SlotId,
                _src: SlotId,
                _coarse_box: &IndexBox,
                _ratio: IntVector,
            ) -> Result<(), TransferError> {
                Ok(())
            }
        }
        let mut reg = OperatorRegistry::new();
        reg.register_coarsen(Arc::new(Tagged(5)));
        reg.register_coarsen(Arc::new(Tagged(1)));
        let op = reg.lookup_coarsen(&FieldDef::cell("q", 1), "SAME").unwrap();
        assert_eq!(op.priority(), 5);
    }
}
