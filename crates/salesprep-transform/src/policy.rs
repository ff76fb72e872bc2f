//! Per-lab normalization policy.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dates::DateStrategy;

/// What to do with the optional product category column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryRule {
    /// Drop the column when any row has no category.
    #[default]
    DropWhenAnyMissing,
    /// Drop the column only when no row has a category.
    DropWhenAllMissing,
    Keep,
}

impl CategoryRule {
    pub fn keeps(self, values: &[Option<String>]) -> bool {
        match self {
            Self::DropWhenAnyMissing => values.iter().all(Option::is_some),
            Self::DropWhenAllMissing => values.iter().any(Option::is_some),
            Self::Keep => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LabPolicy {
    pub date_strategy: DateStrategy,
    pub category_rule: CategoryRule,
}

impl LabPolicy {
    pub fn with_date_strategy(date_strategy: DateStrategy) -> Self {
        Self {
            date_strategy,
            ..Self::default()
        }
    }
}

/// Lab name → policy, with a default for labs not listed.
///
/// Lab names compare case-insensitively after trimming.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabPolicyTable {
    default: LabPolicy,
    labs: BTreeMap<String, LabPolicy>,
}

impl LabPolicyTable {
    pub fn new(default: LabPolicy) -> Self {
        Self {
            default,
            labs: BTreeMap::new(),
        }
    }

    /// Policies for the labs whose exports need special handling.
    pub fn builtin() -> Self {
        let mut table = Self::new(LabPolicy::default());
        table.insert(
            "Romak Denture Centre",
            LabPolicy::with_date_strategy(DateStrategy::DayFirst {
                sentinel: Some("00/01/1900".to_string()),
            }),
        );
        table.insert(
            "Central Dental Laboratory",
            LabPolicy::with_date_strategy(DateStrategy::DropSentinel {
                sentinel: "00:00:00".to_string(),
            }),
        );
        for lab in ["APlus", "Lodge", "Precedental"] {
            table.insert(lab, LabPolicy::with_date_strategy(DateStrategy::Inferred));
        }
        table
    }

    /// Sets the policy for a lab, replacing any previous one.
    pub fn insert(&mut self, lab: &str, policy: LabPolicy) {
        self.labs.insert(lab_key(lab), policy);
    }

    pub fn for_lab(&self, lab: &str) -> &LabPolicy {
        self.labs.get(&lab_key(lab)).unwrap_or(&self.default)
    }

    pub fn default_policy(&self) -> &LabPolicy {
        &self.default
    }

    pub fn len(&self) -> usize {
        self.labs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labs.is_empty()
    }
}

fn lab_key(lab: &str) -> String {
    lab.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_policies_by_lab() {
        let table = LabPolicyTable::builtin();
        assert_eq!(table.len(), 5);
        assert!(matches!(
            table.for_lab("romak denture centre").date_strategy,
            DateStrategy::DayFirst { .. }
        ));
        assert!(table.for_lab(" Central Dental Laboratory ").date_strategy.is_sentinel("00:00:00"));
        assert_eq!(table.for_lab("Somewhere Else"), table.default_policy());
    }

    #[test]
    fn category_rules() {
        let partial = vec![Some("Crown".to_string()), None];
        let empty: Vec<Option<String>> = vec![None, None];
        assert!(!CategoryRule::DropWhenAnyMissing.keeps(&partial));
        assert!(CategoryRule::DropWhenAllMissing.keeps(&partial));
        assert!(!CategoryRule::DropWhenAllMissing.keeps(&empty));
        assert!(CategoryRule::Keep.keeps(&empty));
    }

    #[test]
    fn policies_deserialize_from_settings() {
        let policy: LabPolicy = serde_json::from_str(
            r#"{"date_strategy":{"strategy":"day_first","sentinel":null},"category_rule":"keep"}"#,
        )
        .expect("policy");
        assert_eq!(
            policy.date_strategy,
            DateStrategy::DayFirst { sentinel: None }
        );
        assert_eq!(policy.category_rule, CategoryRule::Keep);
    }
}
