use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Label used for the analyzed item of every water sample.
pub const WATER_SUPPLY_LABEL: &str = "Water Supply";

/// Label used when a product sample does not name its product.
pub const UNKNOWN_PRODUCT_LABEL: &str = "Unknown Product";

/// Opaque identifier of an inspected establishment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EstablishmentId(pub i64);

impl fmt::Display for EstablishmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two kinds of sample a requisition can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    #[serde(alias = "AGUA", alias = "water", alias = "agua")]
    Water,
    #[serde(alias = "PRODUTO", alias = "product", alias = "produto")]
    Product,
}

impl Category {
    /// Canonical upper-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Water => "WATER",
            Self::Product => "PRODUCT",
        }
    }

    /// Interpret a raw category column from the event store.
    ///
    /// Only the water markers select [`Category::Water`]; every other value,
    /// including an empty one, is a product sample.
    #[must_use]
    pub fn from_store(raw: &str) -> Self {
        raw.parse().unwrap_or(Self::Product)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "water" | "agua" => Ok(Self::Water),
            "product" | "produto" => Ok(Self::Product),
            _ => Err(ParseEnumError {
                expected: "category",
                got: s.to_string(),
            }),
        }
    }
}

/// What was sampled at an establishment, as the label inspectors see.
///
/// Identity is the label itself: a product sample named "Water Supply"
/// is the same obligation as the water supply of that establishment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalyzedItem(String);

impl AnalyzedItem {
    /// Derive the analyzed item from a sample's category and product name.
    ///
    /// Water samples are always [`WATER_SUPPLY_LABEL`]. A product name is
    /// kept verbatim; only a missing or empty one becomes
    /// [`UNKNOWN_PRODUCT_LABEL`].
    #[must_use]
    pub fn from_sample(category: Category, product_name: Option<&str>) -> Self {
        match category {
            Category::Water => Self::water_supply(),
            Category::Product => match product_name {
                Some(name) if !name.is_empty() => Self(name.to_string()),
                _ => Self::unknown_product(),
            },
        }
    }

    #[must_use]
    pub fn water_supply() -> Self {
        Self(WATER_SUPPLY_LABEL.to_string())
    }

    #[must_use]
    pub fn unknown_product() -> Self {
        Self(UNKNOWN_PRODUCT_LABEL.to_string())
    }

    #[must_use]
    pub fn product(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnalyzedItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of one recurring inspection obligation.
///
/// Two establishments sampling a product with the same name never share a
/// key. Names containing separator characters cannot collide because the
/// parts are never joined into one string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EstablishmentItemKey {
    pub establishment_id: EstablishmentId,
    #[serde(rename = "analyzed_item")]
    pub item: AnalyzedItem,
}

impl EstablishmentItemKey {
    #[must_use]
    pub const fn new(establishment_id: EstablishmentId, item: AnalyzedItem) -> Self {
        Self {
            establishment_id,
            item,
        }
    }
}

impl fmt::Display for EstablishmentItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.establishment_id, self.item)
    }
}

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}
