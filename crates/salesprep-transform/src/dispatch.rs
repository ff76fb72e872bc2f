//! Schema id → normalizer routing.

use std::collections::BTreeMap;

use salesprep_model::SchemaId;
use salesprep_schema::SchemaRegistry;
use tracing::debug;

use crate::error::DispatchError;
use crate::normalizer::Normalizer;

/// Which normalizer handles each registered schema.
///
/// Provisional ids never have an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchTable {
    routes: BTreeMap<SchemaId, Normalizer>,
}

impl DispatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes for the built-in registry layouts.
    pub fn builtin() -> Self {
        let mut table = Self::new();
        let routes = [
            (1, Normalizer::LabtracNew),
            (2, Normalizer::LabtracNew),
            (3, Normalizer::LabtracOld),
            (4, Normalizer::LabtracOld),
            (5, Normalizer::Transactor),
            // No year/month columns: rejected by the column count check.
            (6, Normalizer::Transactor),
            (7, Normalizer::Leca),
            (8, Normalizer::Leca),
            (9, Normalizer::Leca),
            (10, Normalizer::TransactorPassion),
            (11, Normalizer::EvidentMonthly),
            (12, Normalizer::LabtracAshford),
        ];
        for (number, normalizer) in routes {
            table.insert(SchemaId::known(number), normalizer);
        }
        table
    }

    pub fn insert(&mut self, schema: SchemaId, normalizer: Normalizer) {
        self.routes.insert(schema, normalizer);
    }

    pub fn normalizer_for(&self, schema: &SchemaId) -> Option<Normalizer> {
        self.routes.get(schema).copied()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&SchemaId, Normalizer)> {
        self.routes.iter().map(|(id, normalizer)| (id, *normalizer))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Every registered schema must be routed and every route registered.
    pub fn validate(&self, registry: &SchemaRegistry) -> Result<(), DispatchError> {
        let unmapped: Vec<SchemaId> = registry
            .ids()
            .filter(|id| !self.routes.contains_key(*id))
            .cloned()
            .collect();
        if !unmapped.is_empty() {
            return Err(DispatchError::Unmapped(unmapped));
        }
        let unregistered: Vec<SchemaId> = self
            .routes
            .keys()
            .filter(|id| !registry.contains(id))
            .cloned()
            .collect();
        if !unregistered.is_empty() {
            return Err(DispatchError::Unregistered(unregistered));
        }
        debug!(routes = self.routes.len(), "dispatch table validated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use salesprep_schema::SchemaMatcher;

    use super::*;

    #[test]
    fn builtin_table_covers_builtin_registry() {
        let registry = SchemaRegistry::builtin(Path::new("data/sales"));
        let table = DispatchTable::builtin();
        assert_eq!(table.validate(&registry), Ok(()));
        assert_eq!(
            table.normalizer_for(&SchemaId::known(11)),
            Some(Normalizer::EvidentMonthly)
        );
        assert_eq!(table.normalizer_for(&SchemaId::provisional(1)), None);
    }

    #[test]
    fn unmapped_schema_fails_validation() {
        let mut registry = SchemaRegistry::builtin(Path::new("data/sales"));
        registry
            .register(
                SchemaId::known(13),
                SchemaMatcher::signature(&["A", "B"]),
                "test layout",
            )
            .expect("register");
        assert_eq!(
            DispatchTable::builtin().validate(&registry),
            Err(DispatchError::Unmapped(vec![SchemaId::known(13)]))
        );
    }

    #[test]
    fn route_to_unknown_schema_fails_validation() {
        let registry = SchemaRegistry::builtin(Path::new("data/sales"));
        let mut table = DispatchTable::builtin();
        table.insert(SchemaId::known(99), Normalizer::Leca);
        assert_eq!(
            table.validate(&registry),
            Err(DispatchError::Unregistered(vec![SchemaId::known(99)]))
        );
    }
}
