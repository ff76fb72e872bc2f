//! Run settings, loaded from an optional TOML file.
//!
//! Every field has a default, so a settings file only lists what it changes:
//!
//! ```toml
//! [paths]
//! raw = "exports/2024"
//!
//! [labs.names]
//! smile = "Smile Dental Lab"
//!
//! [policies."Smile Dental Lab"]
//! date_strategy = { strategy = "day_first" }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use salesprep_model::SchemaId;
use salesprep_schema::{SchemaMatcher, SchemaRegistry};
use salesprep_tagging::{
    InternalLab, NhsPrivateTagger, RISIO_MARKER, builtin_internal_labs, builtin_search_terms,
};
use salesprep_transform::{LabPolicy, LabPolicyTable};

/// File picked up from the working directory when `--config` is absent.
pub const DEFAULT_SETTINGS_FILE: &str = "salesprep.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub paths: PathSettings,
    pub schemas: SchemaSettings,
    pub labs: LabSettings,
    pub tagging: TaggingSettings,
    /// Lab name → policy, on top of the built-in policies.
    pub policies: BTreeMap<String, LabPolicy>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    /// Lab-scoped raw exports: `<raw>/<lab_folder>/...`.
    pub raw: PathBuf,
    pub preprocessed: PathBuf,
    pub combined: PathBuf,
    pub mappings: PathBuf,
    /// Triage reports and `run_report.json`.
    pub reports: PathBuf,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            raw: PathBuf::from("data/sales"),
            preprocessed: PathBuf::from("data/pre_processed/sales"),
            combined: PathBuf::from("data/pre_processed_combined/sales"),
            mappings: PathBuf::from("data/utils/mappings"),
            reports: PathBuf::from("data/reports"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaSettings {
    /// Schema id → lab folder classified by location.
    pub path_prefixes: BTreeMap<String, String>,
}

impl Default for SchemaSettings {
    fn default() -> Self {
        let path_prefixes = [("Schema_11", "densign"), ("Schema_12", "ashford")]
            .into_iter()
            .map(|(id, folder)| (id.to_string(), folder.to_string()))
            .collect();
        Self { path_prefixes }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabSettings {
    /// Lab folder → lab name written to `als_lab`.
    pub names: BTreeMap<String, String>,
    /// The group's own labs.
    pub internal: Vec<InternalLab>,
}

impl Default for LabSettings {
    fn default() -> Self {
        let internal = builtin_internal_labs();
        let mut names: BTreeMap<String, String> = internal
            .iter()
            .map(|lab| (lab.key.clone(), lab.name.clone()))
            .collect();
        for (folder, name) in [
            ("romak", "Romak Denture Centre"),
            ("aplus", "APlus"),
            ("lodge", "Lodge"),
            ("precedental", "Precedental"),
        ] {
            names.insert(folder.to_string(), name.to_string());
        }
        Self { names, internal }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggingSettings {
    pub search_terms: Vec<String>,
    pub risio_marker: String,
    /// Also treat practices at a group lab's postcode as internal labs.
    pub match_lab_postcodes: bool,
    /// Lab folder → price list used to tag that lab's order-level rows.
    pub price_lists: BTreeMap<String, PriceListSource>,
    pub aesthetic_world_nhs_codes: PathBuf,
    pub aesthetic_world_private_codes: PathBuf,
    pub woodford_price_list: PathBuf,
}

impl Default for TaggingSettings {
    fn default() -> Self {
        let mappings = PathSettings::default().mappings;
        let mut price_lists = BTreeMap::new();
        price_lists.insert(
            "ashford".to_string(),
            PriceListSource {
                path: PathBuf::from("data/utils/Copy of Copy of 2024 price list.xlsx"),
                code_column: "ProductID".to_string(),
                class_column: "Class".to_string(),
            },
        );
        for lab in ["aesthetic_world", "woodford"] {
            price_lists.insert(
                lab.to_string(),
                PriceListSource {
                    path: mappings.join(format!("{lab}.csv")),
                    ..PriceListSource::default()
                },
            );
        }
        Self {
            search_terms: builtin_search_terms(),
            risio_marker: RISIO_MARKER.to_string(),
            match_lab_postcodes: false,
            price_lists,
            aesthetic_world_nhs_codes: PathBuf::from("data/utils/nhs.xlsx"),
            aesthetic_world_private_codes: PathBuf::from("data/utils/private codes.xlsx"),
            woodford_price_list: PathBuf::from("data/utils/cus product price list.xls"),
        }
    }
}

/// Where a lab's price list lives and which columns carry code and class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceListSource {
    pub path: PathBuf,
    pub code_column: String,
    pub class_column: String,
}

impl Default for PriceListSource {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            code_column: salesprep_model::fields::PRODUCT_CODE.to_string(),
            class_column: salesprep_model::fields::NHS_OR_PRIVATE_MAPPING.to_string(),
        }
    }
}

impl Settings {
    /// Loads `path`, or `salesprep.toml` when present, or the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_SETTINGS_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_SETTINGS_FILE))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("read settings {}", path.display()))?;
        let settings = Self::from_toml(&content)
            .with_context(|| format!("parse settings {}", path.display()))?;
        info!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Lab name for a lab folder; unknown folders keep their folder name.
    pub fn lab_name(&self, folder: &str) -> String {
        self.labs
            .names
            .get(folder)
            .cloned()
            .unwrap_or_else(|| folder.to_string())
    }

    /// Built-in registry with the configured location-classified folders.
    pub fn registry(&self, raw_root: &Path) -> Result<SchemaRegistry> {
        let mut registry = SchemaRegistry::builtin(raw_root);
        for (id, folder) in &self.schemas.path_prefixes {
            let id = SchemaId::new(id).with_context(|| format!("path schema id {id:?}"))?;
            let family = registry
                .get(&id)
                .map_or_else(|| "location classified".to_string(), |entry| entry.family.clone());
            registry
                .register(id, SchemaMatcher::PathPrefix(raw_root.join(folder)), family)
                .with_context(|| format!("register path prefix {folder:?}"))?;
        }
        Ok(registry)
    }

    pub fn policy_table(&self) -> LabPolicyTable {
        let mut table = LabPolicyTable::builtin();
        for (lab, policy) in &self.policies {
            table.insert(lab, policy.clone());
        }
        table
    }

    pub fn tagger(&self) -> NhsPrivateTagger {
        NhsPrivateTagger::new(
            &self.labs.internal,
            &self.tagging.search_terms,
            &self.tagging.risio_marker,
        )
        .with_postcode_match(self.tagging.match_lab_postcodes)
    }
}
