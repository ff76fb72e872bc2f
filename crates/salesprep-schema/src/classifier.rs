//! Per-run schema classification.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use salesprep_model::{ProvisionalSchema, SchemaId};
use tracing::{debug, info, warn};

use crate::registry::{SchemaRegistry, signature_key};

/// Outcome of classifying one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// The file sits below a registered path prefix.
    ByPath(SchemaId),
    /// The header matched a registered signature.
    Registered(SchemaId),
    /// The header matched nothing registered. `new` is false when an earlier
    /// table in this run already minted the id.
    Provisional { id: SchemaId, new: bool },
    /// The header repeats column names; the table is not processed.
    DuplicateColumns(Vec<String>),
}

impl Classification {
    pub fn schema_id(&self) -> Option<&SchemaId> {
        match self {
            Self::ByPath(id) | Self::Registered(id) | Self::Provisional { id, .. } => Some(id),
            Self::DuplicateColumns(_) => None,
        }
    }
}

/// One classified table in the session's side table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub path: PathBuf,
    pub sheet: Option<String>,
    pub schema: SchemaId,
}

/// Classification state for one run.
///
/// Owns the provisional signatures minted so far, the file → schema side
/// table and the duplicate-column rejections. The registry is only read.
#[derive(Debug, Clone)]
pub struct ClassifierSession<'r> {
    registry: &'r SchemaRegistry,
    provisional: Vec<ProvisionalSchema>,
    assignments: Vec<Assignment>,
    duplicate_column_files: Vec<PathBuf>,
}

impl<'r> ClassifierSession<'r> {
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self {
            registry,
            provisional: Vec::new(),
            assignments: Vec::new(),
            duplicate_column_files: Vec::new(),
        }
    }

    pub fn registry(&self) -> &'r SchemaRegistry {
        self.registry
    }

    /// Classifies a table from its header row and location.
    ///
    /// Path prefixes win over signatures. Tables with repeated column names
    /// are rejected before any signature comparison.
    pub fn classify(
        &mut self,
        path: &Path,
        sheet: Option<&str>,
        columns: &[String],
    ) -> Classification {
        let classification = self.resolve(path, columns);
        match classification.schema_id() {
            Some(schema) => {
                debug!(path = %path.display(), sheet, schema = %schema, "classified");
                self.assignments.push(Assignment {
                    path: path.to_path_buf(),
                    sheet: sheet.map(str::to_string),
                    schema: schema.clone(),
                });
            }
            None => {
                warn!(path = %path.display(), sheet, "duplicate column names, not classified");
                self.duplicate_column_files.push(path.to_path_buf());
            }
        }
        classification
    }

    fn resolve(&mut self, path: &Path, columns: &[String]) -> Classification {
        if let Some(id) = self.registry.lookup_by_path(path) {
            return Classification::ByPath(id.clone());
        }
        let duplicates = duplicate_names(columns);
        if !duplicates.is_empty() {
            return Classification::DuplicateColumns(duplicates);
        }
        if let Some(id) = self.registry.lookup_by_signature(columns) {
            return Classification::Registered(id.clone());
        }
        if let Some(id) = self.lookup_provisional(columns) {
            return Classification::Provisional {
                id: id.clone(),
                new: false,
            };
        }
        let id = self.mint(columns.to_vec());
        info!(path = %path.display(), schema = %id, columns = columns.len(), "new provisional schema");
        Classification::Provisional { id, new: true }
    }

    fn lookup_provisional(&self, columns: &[String]) -> Option<&SchemaId> {
        let key = signature_key(columns);
        self.provisional
            .iter()
            .find(|schema| signature_key(&schema.columns) == key)
            .map(|schema| &schema.id)
    }

    fn mint(&mut self, columns: Vec<String>) -> SchemaId {
        let id = SchemaId::provisional(self.provisional.len() + 1);
        self.provisional.push(ProvisionalSchema {
            id: id.clone(),
            columns,
        });
        id
    }

    /// A session for another worker: same registry, provisional signatures
    /// known so far, empty side tables.
    pub fn snapshot(&self) -> ClassifierSession<'r> {
        Self {
            registry: self.registry,
            provisional: self.provisional.clone(),
            assignments: Vec::new(),
            duplicate_column_files: Vec::new(),
        }
    }

    /// Folds a worker session back in.
    ///
    /// Provisional signatures are deduplicated by column set; ids minted by
    /// the worker are renumbered to this session's sequence. Returns the
    /// worker id → merged id mapping.
    pub fn merge_provisional(
        &mut self,
        other: ClassifierSession<'_>,
    ) -> BTreeMap<SchemaId, SchemaId> {
        let mut remap = BTreeMap::new();
        for schema in other.provisional {
            let merged = match self.lookup_provisional(&schema.columns) {
                Some(existing) => existing.clone(),
                None => self.mint(schema.columns),
            };
            remap.insert(schema.id, merged);
        }
        for mut assignment in other.assignments {
            if let Some(merged) = remap.get(&assignment.schema) {
                assignment.schema = merged.clone();
            }
            self.assignments.push(assignment);
        }
        self.duplicate_column_files
            .extend(other.duplicate_column_files);
        remap
    }

    pub fn provisional(&self) -> &[ProvisionalSchema] {
        &self.provisional
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn duplicate_column_files(&self) -> &[PathBuf] {
        &self.duplicate_column_files
    }
}

fn duplicate_names(columns: &[String]) -> Vec<String> {
    let mut seen = std::collections::BTreeSet::new();
    let mut duplicates: Vec<String> = Vec::new();
    for name in columns {
        if !seen.insert(name.as_str()) && !duplicates.contains(name) {
            duplicates.push(name.clone());
        }
    }
    duplicates
}
