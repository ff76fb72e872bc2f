use serde::{Deserialize, Serialize};

use crate::{ModelError, fields};

/// The two canonical row shapes a normalizer can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalShape {
    /// One row per invoiced order line.
    OrderLevel,
    /// One row per customer/product/month aggregate.
    CustomerProductCube,
}

impl CanonicalShape {
    /// Row-unique identifier column of this shape.
    pub fn id_column(self) -> &'static str {
        match self {
            Self::OrderLevel => fields::ORDER_UUID,
            Self::CustomerProductCube => fields::CUSTOMER_PRODUCT_CUBE_UUID,
        }
    }

    /// Column holding the date a row is attributed to.
    pub fn date_column(self) -> &'static str {
        match self {
            Self::OrderLevel => fields::ORDER_INVOICED_DATE,
            Self::CustomerProductCube => fields::YEAR_MONTH,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::OrderLevel => "order_level",
            Self::CustomerProductCube => "customer_product_cube",
        }
    }
}

/// Output grouping for the combination stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombinationBucket {
    Labtrac,
    Transactor,
    Leca,
    Evident,
}

impl CombinationBucket {
    pub const ALL: [Self; 4] = [Self::Labtrac, Self::Transactor, Self::Leca, Self::Evident];

    /// Folder name used for per-file outputs and the combined file name.
    pub fn folder_name(self) -> &'static str {
        match self {
            Self::Labtrac => "labtrac",
            Self::Transactor => "transactor",
            Self::Leca => "leca",
            Self::Evident => "evident",
        }
    }

    pub fn from_folder_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|bucket| bucket.folder_name().eq_ignore_ascii_case(name.trim()))
    }
}

impl std::str::FromStr for CombinationBucket {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_folder_name(s).ok_or_else(|| ModelError::UnknownBucket(s.to_string()))
    }
}

impl std::fmt::Display for CombinationBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.folder_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shapes_name_their_key_columns() {
        assert_eq!(CanonicalShape::OrderLevel.id_column(), "order_uuid");
        assert_eq!(
            CanonicalShape::CustomerProductCube.id_column(),
            "customer_product_cube_uuid"
        );
        assert_eq!(CanonicalShape::CustomerProductCube.date_column(), "year_month");
    }

    #[test]
    fn bucket_folder_names_round_trip() {
        for bucket in CombinationBucket::ALL {
            assert_eq!(
                CombinationBucket::from_folder_name(bucket.folder_name()),
                Some(bucket)
            );
        }
        assert_eq!(CombinationBucket::from_folder_name("LECA"), Some(CombinationBucket::Leca));
        assert_eq!(CombinationBucket::from_folder_name("combine"), None);
        assert!("combine".parse::<CombinationBucket>().is_err());
    }
}
