use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub mod site;

pub use site::{
    Area, ContactInfo, Developer, DocumentType, DownloadLead, LeadRequest, LocationLists,
    SiteData, SiteOverrides, SocialLink, Testimonial,
};

/// Record identifier: numeric in local mode, slug-or-id text from the API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Numeric(i64),
    Text(String),
}

impl RecordId {
    /// Numeric value, also for text ids that hold an integer.
    pub fn as_number(&self) -> Option<i64> {
        match self {
            RecordId::Numeric(n) => Some(*n),
            RecordId::Text(s) => s.trim().parse().ok(),
        }
    }

    /// `3` and `"3"` name the same record.
    pub fn same_as(&self, other: &RecordId) -> bool {
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => a == b,
            _ => self.to_string() == other.to_string(),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Numeric(n) => write!(f, "{}", n),
            RecordId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Numeric(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Text(s.to_string())
    }
}

/// Transaction category of a listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Purpose {
    #[default]
    Buy,
    Rent,
    OffPlan,
}

impl Purpose {
    pub const ALL: [Purpose; 3] = [Purpose::Buy, Purpose::Rent, Purpose::OffPlan];

    pub fn as_str(&self) -> &'static str {
        match self {
            Purpose::Buy => "buy",
            Purpose::Rent => "rent",
            Purpose::OffPlan => "off-plan",
        }
    }

    /// Lenient parse used on untyped input.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "buy" => Some(Purpose::Buy),
            "rent" => Some(Purpose::Rent),
            "off-plan" | "off_plan" | "offplan" => Some(Purpose::OffPlan),
            _ => None,
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Purpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Purpose::parse(s)
            .ok_or_else(|| format!("unknown purpose '{}' (expected buy, rent or off-plan)", s))
    }
}

/// Listing price: an amount, or free text such as "On Request".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Amount(f64),
    Text(String),
}

impl Price {
    pub fn amount(&self) -> Option<f64> {
        match self {
            Price::Amount(v) if v.is_finite() => Some(*v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub line1: String,
    pub city: String,
    pub country: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// Quick-facts block of a listing. Values are display text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_sqft: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_built: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub garages: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building_configuration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,
}

impl Overview {
    pub fn is_empty(&self) -> bool {
        *self == Overview::default()
    }

    /// `areaText` split into display lines.
    pub fn area_lines(&self) -> Vec<&str> {
        self.area_text
            .as_deref()
            .map(|t| t.lines().map(str::trim).filter(|l| !l.is_empty()).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResidenceOption {
    pub label: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorPlan {
    pub id: Option<RecordId>,
    pub title: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Canonical property record. Every UI-facing read produces this shape,
/// whatever the raw payload looked like.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: RecordId,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub photos: Vec<String>,
    /// Free-form, e.g. "Studio – 1 – 2 – 3"; never coerced to a number.
    pub bedrooms: Option<String>,
    pub bathrooms: Option<String>,
    #[serde(rename = "type")]
    pub property_type: String,
    pub purpose: Option<Purpose>,
    pub price: Option<Price>,
    pub price_display: Option<String>,
    pub location: String,
    pub address: Address,
    pub overview: Overview,
    pub highlights: Vec<String>,
    pub residence_options: Vec<ResidenceOption>,
    pub features: Option<BTreeMap<String, Vec<String>>>,
    pub floor_plans: Vec<FloorPlan>,
    pub floor_plan_file: Option<String>,
    pub brochure_file: Option<String>,
    pub agent: Option<Agent>,
}

impl Property {
    pub fn price_amount(&self) -> Option<f64> {
        self.price.as_ref().and_then(Price::amount)
    }

    /// Bedrooms as a number when the text is numeric.
    pub fn bedroom_count(&self) -> Option<f64> {
        numeric_text(self.bedrooms.as_deref())
    }

    pub fn bathroom_count(&self) -> Option<f64> {
        numeric_text(self.bathrooms.as_deref())
    }
}

fn numeric_text(value: Option<&str>) -> Option<f64> {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}
