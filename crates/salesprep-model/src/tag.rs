use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Classification of a sales row by end-customer funding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NhsPrivateTag {
    #[serde(rename = "NHS")]
    Nhs,
    #[serde(rename = "Private")]
    Private,
    /// Sale to another lab inside the group.
    #[serde(rename = "ALS Lab")]
    AlsLab,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl NhsPrivateTag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nhs => "NHS",
            Self::Private => "Private",
            Self::AlsLab => "ALS Lab",
            Self::Unknown => "Unknown",
        }
    }

    /// Folds a price-list class label onto `NHS`/`Private`.
    ///
    /// `Economy` is the NHS band in vendor price lists. Anything else is not a
    /// price-list class and yields `None`.
    pub fn from_price_class(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.eq_ignore_ascii_case("nhs") || label.eq_ignore_ascii_case("economy") {
            Some(Self::Nhs)
        } else if label.eq_ignore_ascii_case("private") {
            Some(Self::Private)
        } else {
            None
        }
    }
}

impl fmt::Display for NhsPrivateTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NhsPrivateTag {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "NHS" => Ok(Self::Nhs),
            "Private" => Ok(Self::Private),
            "ALS Lab" => Ok(Self::AlsLab),
            "Unknown" => Ok(Self::Unknown),
            other => Err(ModelError::UnknownTag(other.to_string())),
        }
    }
}
