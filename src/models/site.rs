use super::{Property, Purpose, RecordId};
use crate::error::{ListingError, Result};
use crate::sources::defaults;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub quote: String,
    #[serde(default = "default_rating")]
    pub rating: u8,
}

fn default_rating() -> u8 {
    5
}

impl Testimonial {
    /// Up to two uppercase initials of the author's name.
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect()
    }
}

/// A featured area ("Locations we serve").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    #[serde(default)]
    pub subtitle: String,
    /// `[lat, lng]`
    #[serde(default)]
    pub center: Option<[f64; 2]>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactInfo {
    pub phone_display: String,
    pub phone_tel: String,
    pub email: String,
    pub whatsapp_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLink {
    pub name: String,
    #[serde(default)]
    pub href: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Developer {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub logo_url: String,
    #[serde(default)]
    pub link: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentType {
    FloorPlan,
    Brochure,
}

impl DocumentType {
    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::FloorPlan => "Floor Plan",
            DocumentType::Brochure => "Brochure",
        }
    }
}

/// A visitor's request to download a brochure or floor plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadRequest {
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub project: Option<String>,
    pub message: Option<String>,
    pub document_type: DocumentType,
}

impl LeadRequest {
    /// Trims every field; name, phone and email must be present.
    pub fn validated(self) -> Result<Self> {
        let full_name = self.full_name.trim().to_string();
        let phone = self.phone.trim().to_string();
        let email = self.email.trim().to_string();
        if full_name.is_empty() || phone.is_empty() || email.is_empty() {
            return Err(ListingError::Validation(
                "Please fill in all required fields.".to_string(),
            ));
        }
        let message = self
            .message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());
        Ok(Self {
            full_name,
            phone,
            email,
            project: self.project,
            message,
            document_type: self.document_type,
        })
    }
}

/// A captured lead as the admin API reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadLead {
    pub id: RecordId,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    pub document_type: Option<DocumentType>,
    #[serde(default)]
    pub contacted: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Search dropdown locations, one list per purpose.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationLists {
    pub buy: Vec<String>,
    pub rent: Vec<String>,
    pub off_plan: Vec<String>,
}

impl LocationLists {
    pub fn for_purpose(&self, purpose: Purpose) -> &Vec<String> {
        match purpose {
            Purpose::Buy => &self.buy,
            Purpose::Rent => &self.rent,
            Purpose::OffPlan => &self.off_plan,
        }
    }

    pub fn for_purpose_mut(&mut self, purpose: Purpose) -> &mut Vec<String> {
        match purpose {
            Purpose::Buy => &mut self.buy,
            Purpose::Rent => &mut self.rent,
            Purpose::OffPlan => &mut self.off_plan,
        }
    }
}

/// One layer of site data. A `None` field leaves the layer below untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteOverrides {
    pub properties: Option<Vec<Property>>,
    pub testimonials: Option<Vec<Testimonial>>,
    pub areas: Option<Vec<Area>>,
    pub locations_buy: Option<Vec<String>>,
    pub locations_rent: Option<Vec<String>>,
    pub locations_off_plan: Option<Vec<String>>,
    pub featured_property_ids: Option<Vec<RecordId>>,
    pub contact: Option<ContactInfo>,
    pub social_links: Option<Vec<SocialLink>>,
    pub developers: Option<Vec<Developer>>,
}

/// Everything the public site renders, resolved from the default, persisted
/// and remote layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteData {
    pub properties: Vec<Property>,
    pub testimonials: Vec<Testimonial>,
    pub areas: Vec<Area>,
    pub locations: LocationLists,
    pub featured_property_ids: Vec<RecordId>,
    pub contact: ContactInfo,
    pub social_links: Vec<SocialLink>,
    pub developers: Vec<Developer>,
}

impl Default for SiteData {
    fn default() -> Self {
        Self::defaults()
    }
}

impl SiteData {
    /// Built-in constant layer.
    pub fn defaults() -> Self {
        Self {
            properties: Vec::new(),
            testimonials: Vec::new(),
            areas: defaults::areas(),
            locations: LocationLists {
                buy: defaults::location_list(),
                rent: defaults::location_list(),
                off_plan: Vec::new(),
            },
            featured_property_ids: Vec::new(),
            contact: defaults::contact(),
            social_links: defaults::social_links(),
            developers: defaults::developers(),
        }
    }

    pub fn apply(mut self, layer: SiteOverrides) -> Self {
        if let Some(v) = layer.properties {
            self.properties = v;
        }
        if let Some(v) = layer.testimonials {
            self.testimonials = v;
        }
        if let Some(v) = layer.areas {
            self.areas = v;
        }
        if let Some(v) = layer.locations_buy {
            self.locations.buy = v;
        }
        if let Some(v) = layer.locations_rent {
            self.locations.rent = v;
        }
        if let Some(v) = layer.locations_off_plan {
            self.locations.off_plan = v;
        }
        if let Some(v) = layer.featured_property_ids {
            self.featured_property_ids = v;
        }
        if let Some(v) = layer.contact {
            self.contact = v;
        }
        if let Some(v) = layer.social_links {
            self.social_links = v;
        }
        if let Some(v) = layer.developers {
            self.developers = v;
        }
        self
    }

    /// Persisted form of the dataset. Location lists are flattened so the
    /// stored document reads back through the same parser as `/api/site-data`.
    pub fn to_document(&self) -> Result<Value> {
        let mut doc = serde_json::to_value(self)?;
        if let Value::Object(map) = &mut doc {
            map.remove("locations");
            map.insert("locationsBuy".into(), serde_json::to_value(&self.locations.buy)?);
            map.insert("locationsRent".into(), serde_json::to_value(&self.locations.rent)?);
            map.insert("locationsOffPlan".into(), serde_json::to_value(&self.locations.off_plan)?);
        }
        Ok(doc)
    }

    /// "All Areas" followed by the purpose's dropdown list. An empty off-plan
    /// list borrows the buy list; the built-in list is the last resort.
    pub fn location_options(&self, purpose: Purpose) -> Vec<String> {
        let mut list = self.locations.for_purpose(purpose);
        if list.is_empty() && purpose == Purpose::OffPlan {
            list = &self.locations.buy;
        }
        let mut options = vec![crate::search::ALL_AREAS.to_string()];
        if list.is_empty() {
            options.extend(defaults::filter_locations());
        } else {
            options.extend(list.iter().cloned());
        }
        options
    }

    /// "All Types" followed by every type the filter offers.
    pub fn type_options() -> Vec<String> {
        std::iter::once(crate::search::ALL_TYPES)
            .chain(defaults::PROPERTY_TYPES.iter().copied())
            .map(str::to_string)
            .collect()
    }

    /// Featured properties in the order of `featuredPropertyIds`.
    pub fn featured_properties(&self) -> Vec<&Property> {
        self.featured_property_ids
            .iter()
            .filter_map(|id| self.properties.iter().find(|p| p.id.same_as(id)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_property;
    use serde_json::json;

    fn property(id: i64, title: &str) -> Property {
        normalize_property(&json!({"id": id, "title": title, "purpose": "buy"})).unwrap()
    }

    #[test]
    fn test_apply_only_overrides_present_fields() {
        let base = SiteData::defaults();
        let layered = base.clone().apply(SiteOverrides {
            locations_rent: Some(vec!["Al Barsha".into()]),
            contact: Some(ContactInfo {
                email: "sales@example.com".into(),
                ..Default::default()
            }),
            ..Default::default()
        });

        assert_eq!(layered.locations.rent, vec!["Al Barsha".to_string()]);
        assert_eq!(layered.locations.buy, base.locations.buy);
        assert_eq!(layered.contact.email, "sales@example.com");
        assert_eq!(layered.social_links, base.social_links);
        assert_eq!(layered.developers.len(), base.developers.len());
    }

    #[test]
    fn test_location_options_fall_back_to_builtin_list() {
        let mut site = SiteData::defaults();
        site.locations.off_plan.clear();
        site.locations.buy = vec!["Dubai Hills Estate".into(), "Emaar Beachfront".into()];
        assert_eq!(
            site.location_options(Purpose::OffPlan),
            vec!["All Areas", "Dubai Hills Estate", "Emaar Beachfront"]
        );

        site.locations.buy.clear();
        let options = site.location_options(Purpose::OffPlan);
        assert_eq!(options[0], "All Areas");
        assert_eq!(options.len(), defaults::FILTER_LOCATIONS.len() + 1);
        assert!(options.contains(&"Dubai Silicon Oasis".to_string()));
        assert_eq!(site.location_options(Purpose::Buy), options);

        site.locations.rent = vec!["Business Bay".into()];
        assert_eq!(site.location_options(Purpose::Rent), vec!["All Areas", "Business Bay"]);
    }

    #[test]
    fn test_type_options_lead_with_sentinel() {
        let options = SiteData::type_options();
        assert_eq!(options.len(), 7);
        assert_eq!(options[0], "All Types");
        assert_eq!(options[1], "Villa");
        assert!(options.contains(&"Penthouse".to_string()));
    }

    #[test]
    fn test_featured_properties_follow_id_order() {
        let mut site = SiteData::defaults();
        site.properties = vec![property(1, "One"), property(2, "Two"), property(3, "Three")];
        site.featured_property_ids =
            vec![RecordId::Numeric(3), RecordId::Text("1".into()), RecordId::Numeric(9)];

        let featured = site.featured_properties();
        let titles: Vec<&str> = featured.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Three", "One"]);
    }

    #[test]
    fn test_lead_validation() {
        let lead = LeadRequest {
            full_name: "  Sara Khan ".into(),
            phone: "+971500000000".into(),
            email: "sara@example.com".into(),
            project: Some("Marina Vista".into()),
            message: Some("   ".into()),
            document_type: DocumentType::Brochure,
        };
        let valid = lead.clone().validated().unwrap();
        assert_eq!(valid.full_name, "Sara Khan");
        assert_eq!(valid.message, None);

        let missing = LeadRequest { phone: " ".into(), ..lead };
        assert!(matches!(missing.validated(), Err(ListingError::Validation(_))));
    }

    #[test]
    fn test_testimonial_initials() {
        let t: Testimonial =
            serde_json::from_value(json!({"name": "ahmed al mansouri", "quote": "Great"}))
                .unwrap();
        assert_eq!(t.initials(), "AA");
        assert_eq!(t.rating, 5);
    }
}
