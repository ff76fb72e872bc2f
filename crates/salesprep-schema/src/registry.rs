//! Registry of known layouts: header signatures and path prefixes.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use salesprep_model::SchemaId;

use crate::builtin;
use crate::error::{Result, SchemaError};

/// How a registry entry recognises a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaMatcher {
    /// Column names, compared as a set.
    Signature(Vec<String>),
    /// Any file below this directory, compared component-wise.
    PathPrefix(PathBuf),
}

impl SchemaMatcher {
    pub fn signature<S: AsRef<str>>(columns: &[S]) -> Self {
        Self::Signature(columns.iter().map(|c| c.as_ref().to_string()).collect())
    }
}

#[derive(Debug, Clone)]
pub struct RegistryEntry {
    pub id: SchemaId,
    pub matcher: SchemaMatcher,
    /// Human-readable family, e.g. "Transactor".
    pub family: String,
}

/// Order-independent comparison key for a set of column names.
pub(crate) fn signature_key<S: AsRef<str>>(columns: &[S]) -> BTreeSet<&str> {
    columns.iter().map(AsRef::as_ref).collect()
}

/// Known layouts in registration order; the first match wins.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    entries: Vec<RegistryEntry>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shipped layouts, with path entries resolved below `raw_root`.
    pub fn builtin(raw_root: &Path) -> Self {
        let mut entries = Vec::new();
        for (number, columns, family) in builtin::signature_entries() {
            entries.push(RegistryEntry {
                id: SchemaId::known(number),
                matcher: SchemaMatcher::signature(&columns),
                family: family.to_string(),
            });
        }
        for (number, folder, family) in builtin::path_entries() {
            entries.push(RegistryEntry {
                id: SchemaId::known(number),
                matcher: SchemaMatcher::PathPrefix(raw_root.join(folder)),
                family: family.to_string(),
            });
        }
        Self { entries }
    }

    /// Adds an entry, replacing any entry with the same id in place.
    pub fn register(
        &mut self,
        id: SchemaId,
        matcher: SchemaMatcher,
        family: impl Into<String>,
    ) -> Result<()> {
        match &matcher {
            SchemaMatcher::Signature(columns) if columns.is_empty() => {
                return Err(SchemaError::EmptySignature { id });
            }
            SchemaMatcher::PathPrefix(prefix) if prefix.as_os_str().is_empty() => {
                return Err(SchemaError::EmptyPathPrefix { id });
            }
            _ => {}
        }
        let entry = RegistryEntry {
            id,
            matcher,
            family: family.into(),
        };
        match self.entries.iter_mut().find(|existing| existing.id == entry.id) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        Ok(())
    }

    /// First entry whose signature equals `columns` as a set.
    pub fn lookup_by_signature<S: AsRef<str>>(&self, columns: &[S]) -> Option<&SchemaId> {
        let key = signature_key(columns);
        self.entries.iter().find_map(|entry| match &entry.matcher {
            SchemaMatcher::Signature(signature) if signature_key(signature) == key => {
                Some(&entry.id)
            }
            _ => None,
        })
    }

    /// First entry whose path prefix is an ancestor directory of `path`.
    pub fn lookup_by_path(&self, path: &Path) -> Option<&SchemaId> {
        let parent = path.parent()?;
        self.entries.iter().find_map(|entry| match &entry.matcher {
            SchemaMatcher::PathPrefix(prefix)
                if parent.ancestors().any(|dir| dir.ends_with(prefix)) =>
            {
                Some(&entry.id)
            }
            _ => None,
        })
    }

    pub fn get(&self, id: &SchemaId) -> Option<&RegistryEntry> {
        self.entries.iter().find(|entry| &entry.id == id)
    }

    pub fn contains(&self, id: &SchemaId) -> bool {
        self.get(id).is_some()
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn ids(&self) -> impl Iterator<Item = &SchemaId> {
        self.entries.iter().map(|entry| &entry.id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
