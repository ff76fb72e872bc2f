//! The closed set of layout normalizers.

use polars::prelude::DataFrame;
use salesprep_model::{CanonicalShape, CombinationBucket};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::normalizers::{evident, labtrac, leca, transactor};
use crate::policy::LabPolicyTable;

/// One transformation from a vendor layout to a canonical shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalizer {
    LabtracNew,
    LabtracOld,
    LabtracAshford,
    Transactor,
    TransactorPassion,
    Leca,
    EvidentMonthly,
}

impl Normalizer {
    pub const ALL: [Normalizer; 7] = [
        Normalizer::LabtracNew,
        Normalizer::LabtracOld,
        Normalizer::LabtracAshford,
        Normalizer::Transactor,
        Normalizer::TransactorPassion,
        Normalizer::Leca,
        Normalizer::EvidentMonthly,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Normalizer::LabtracNew => "labtrac_new",
            Normalizer::LabtracOld => "labtrac_old",
            Normalizer::LabtracAshford => "labtrac_ashford",
            Normalizer::Transactor => "transactor",
            Normalizer::TransactorPassion => "transactor_passion",
            Normalizer::Leca => "leca",
            Normalizer::EvidentMonthly => "evident_monthly",
        }
    }

    pub fn shape(self) -> CanonicalShape {
        match self {
            Normalizer::LabtracNew | Normalizer::LabtracOld | Normalizer::LabtracAshford => {
                CanonicalShape::OrderLevel
            }
            Normalizer::Transactor
            | Normalizer::TransactorPassion
            | Normalizer::Leca
            | Normalizer::EvidentMonthly => CanonicalShape::CustomerProductCube,
        }
    }

    pub fn bucket(self) -> CombinationBucket {
        match self {
            Normalizer::LabtracNew | Normalizer::LabtracOld | Normalizer::LabtracAshford => {
                CombinationBucket::Labtrac
            }
            Normalizer::Transactor | Normalizer::TransactorPassion => CombinationBucket::Transactor,
            Normalizer::Leca => CombinationBucket::Leca,
            Normalizer::EvidentMonthly => CombinationBucket::Evident,
        }
    }

    /// Value written to `system_source`.
    pub fn system_source(self) -> &'static str {
        match self {
            Normalizer::LabtracNew | Normalizer::LabtracOld | Normalizer::LabtracAshford => {
                labtrac::SYSTEM_SOURCE
            }
            Normalizer::Transactor | Normalizer::TransactorPassion => transactor::SYSTEM_SOURCE,
            Normalizer::Leca => leca::SYSTEM_SOURCE,
            Normalizer::EvidentMonthly => evident::SYSTEM_SOURCE,
        }
    }

    /// Whether the lab's tables are merged with
    /// [`merge_yearly_exports`](crate::merge_yearly_exports) before normalizing.
    pub fn merges_yearly_exports(self) -> bool {
        matches!(self, Normalizer::LabtracAshford)
    }

    /// Turns one raw all-string table of `lab` into canonical rows.
    pub fn normalize(
        self,
        raw: &DataFrame,
        lab: &str,
        policies: &LabPolicyTable,
    ) -> Result<DataFrame> {
        debug!(normalizer = self.name(), lab, rows = raw.height(), "normalizing");
        match self {
            Normalizer::LabtracNew | Normalizer::LabtracAshford => {
                labtrac::normalize_new(raw, lab, policies.for_lab(lab))
            }
            Normalizer::LabtracOld => labtrac::normalize_old(raw, lab),
            Normalizer::Transactor => transactor::normalize_standard(raw, lab),
            Normalizer::TransactorPassion => transactor::normalize_passion(raw, lab),
            Normalizer::Leca => leca::normalize(raw, lab),
            Normalizer::EvidentMonthly => evident::normalize(raw, lab),
        }
    }
}

impl std::fmt::Display for Normalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
