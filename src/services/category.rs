//! Canonical measurement categories and the free-text normalizer that maps
//! user input onto them.

use sea_orm::entity::prelude::*;
use sea_orm::Iterable;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use utoipa::ToSchema;

/// The only values a sensor, reading or report `type`/`category` may hold.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    DeriveActiveEnum,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[sea_orm(string_value = "water_level")]
    WaterLevel,
    #[sea_orm(string_value = "rain")]
    Rain,
    #[sea_orm(string_value = "temperature")]
    Temperature,
}

impl Category {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WaterLevel => "water_level",
            Self::Rain => "rain",
            Self::Temperature => "temperature",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Known free-text spellings, keyed by their trimmed, lower-cased,
/// single-spaced form.
const SYNONYMS: &[(&str, Category)] = &[
    ("water level", Category::WaterLevel),
    ("water-level", Category::WaterLevel),
    ("waterlevel", Category::WaterLevel),
    ("river", Category::WaterLevel),
    ("river level", Category::WaterLevel),
    ("river_level", Category::WaterLevel),
    ("level", Category::WaterLevel),
    ("depth", Category::WaterLevel),
    ("water depth", Category::WaterLevel),
    ("flood", Category::WaterLevel),
    ("rainfall", Category::Rain),
    ("rain fall", Category::Rain),
    ("precipitation", Category::Rain),
    ("rain gauge", Category::Rain),
    ("rain_gauge", Category::Rain),
    ("temp", Category::Temperature),
    ("heat", Category::Temperature),
    ("air temperature", Category::Temperature),
    ("air_temp", Category::Temperature),
    ("weather", Category::Temperature),
];

static SYNONYM_TABLE: LazyLock<HashMap<&'static str, Category>> =
    LazyLock::new(|| SYNONYMS.iter().copied().collect());

/// Raised when a `type`/`category` value is empty or unrecognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "Invalid category '{input}'. Allowed values: {}. Known synonyms: {}",
    allowed_values(),
    known_synonyms()
)]
pub struct InvalidCategory {
    pub input: String,
}

fn allowed_values() -> String {
    Category::iter()
        .map(Category::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Every accepted free-text spelling and the category it maps to.
#[must_use]
pub fn synonyms() -> &'static [(&'static str, Category)] {
    SYNONYMS
}

fn known_synonyms() -> String {
    SYNONYMS
        .iter()
        .map(|(synonym, category)| format!("{synonym} -> {category}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Map a raw category string onto its canonical [`Category`].
///
/// The input is trimmed, lower-cased and has internal whitespace collapsed.
/// Synonyms are checked first, then the canonical names themselves.
///
/// # Errors
///
/// Returns [`InvalidCategory`] for `None`, blank input, or text matching
/// neither a synonym nor a canonical value.
pub fn normalize(raw: Option<&str>) -> Result<Category, InvalidCategory> {
    let raw = raw.unwrap_or_default();
    let key = raw
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    if key.is_empty() {
        return Err(InvalidCategory {
            input: raw.to_string(),
        });
    }

    if let Some(category) = SYNONYM_TABLE.get(key.as_str()) {
        return Ok(*category);
    }

    Category::iter()
        .find(|category| category.as_str() == key)
        .ok_or_else(|| InvalidCategory {
            input: raw.to_string(),
        })
}

impl FromStr for Category {
    type Err = InvalidCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize(Some(s))
    }
}
