use crate::models::{Property, Purpose};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Location facet value meaning "no location filter".
pub const ALL_AREAS: &str = "All Areas";
/// Type facet value meaning "no type filter".
pub const ALL_TYPES: &str = "All Types";
pub const PER_PAGE: usize = 12;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Descending by id
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::PriceAsc => "price-asc",
            SortOrder::PriceDesc => "price-desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "newest" => Ok(SortOrder::Newest),
            "price-asc" => Ok(SortOrder::PriceAsc),
            "price-desc" => Ok(SortOrder::PriceDesc),
            other => Err(format!(
                "unknown sort '{}' (expected newest, price-asc or price-desc)",
                other
            )),
        }
    }
}

/// Facet selection for the property list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facets {
    pub purpose: Purpose,
    /// Case-insensitive match; `ALL_AREAS` or blank disables it
    pub location: String,
    /// Exact match; `ALL_TYPES` or blank disables it
    pub property_type: String,
    /// Minimum bedrooms
    pub bedrooms: Option<u32>,
    /// Minimum bathrooms
    pub bathrooms: Option<u32>,
    /// Key into the purpose's min price table
    pub price_min: Option<String>,
    /// Key into the purpose's max price table
    pub price_max: Option<String>,
    pub sort: SortOrder,
    /// 1-based; clamped when applied
    pub page: usize,
}

impl Default for Facets {
    fn default() -> Self {
        Self {
            purpose: Purpose::Buy,
            location: ALL_AREAS.to_string(),
            property_type: ALL_TYPES.to_string(),
            bedrooms: None,
            bathrooms: None,
            price_min: None,
            price_max: None,
            sort: SortOrder::Newest,
            page: 1,
        }
    }
}

impl Facets {
    pub fn for_purpose(purpose: Purpose) -> Self {
        Self {
            purpose,
            ..Self::default()
        }
    }

    /// Build facets from URL query pairs (`purpose`, `location`, `type`,
    /// `bedrooms`, `bathrooms`, `priceMin`, `priceMax`, `sort`, `page`).
    /// Unknown keys are ignored; unparsable values keep the default.
    pub fn from_query<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut facets = Self::default();
        for (key, value) in pairs {
            let value = value.as_ref().trim();
            match key.as_ref() {
                "purpose" => {
                    if let Some(p) = Purpose::parse(value) {
                        facets.purpose = p;
                    }
                }
                "location" if !value.is_empty() => facets.location = value.to_string(),
                "type" if !value.is_empty() => facets.property_type = value.to_string(),
                "bedrooms" => facets.bedrooms = value.parse().ok(),
                "bathrooms" => facets.bathrooms = value.parse().ok(),
                "priceMin" => facets.price_min = Some(value.to_string()).filter(|v| !v.is_empty()),
                "priceMax" => facets.price_max = Some(value.to_string()).filter(|v| !v.is_empty()),
                "sort" => {
                    if let Ok(sort) = value.parse() {
                        facets.sort = sort;
                    }
                }
                "page" => {
                    if let Ok(page) = value.parse() {
                        facets.page = page;
                    }
                }
                _ => {}
            }
        }
        facets
    }
}

/// One page of search results
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub items: Vec<Property>,
    /// Matches across all pages
    pub total: usize,
    /// Page actually returned, after clamping
    pub page: usize,
    pub total_pages: usize,
    pub per_page: usize,
}

impl SearchPage {
    /// No matches. Not an error; the listing shows its empty state.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
