//! Normalization boundary between raw payloads (API bodies, the persisted
//! dataset, imported files) and the canonical records everything else uses.

pub mod json;

use crate::models::{
    Address, Agent, Area, ContactInfo, Developer, FloorPlan, Overview, Price, Property, Purpose,
    RecordId, ResidenceOption, SiteOverrides, SocialLink, Testimonial,
};
use crate::slug::slugify;
use json::{
    array, field, lines, number, object, record_id, string_list, strings, text, text_or_default,
    try_json,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, warn};

const DEFAULT_CITY: &str = "Dubai";
const DEFAULT_COUNTRY: &str = "UAE";
const DEFAULT_LAT: f64 = 25.2;
const DEFAULT_LNG: f64 = 55.3;

/// Convert one raw property payload into the canonical record.
///
/// Returns `None` only when the payload is not an object (or a string
/// holding one). Nested fields that are missing or malformed fall back to
/// their defaults; nothing here fails.
pub fn normalize_property(raw: &Value) -> Option<Property> {
    let obj = object(raw)?;
    let get = |camel: &str, snake: &str| field(&obj, camel, snake);

    let title = text_or_default(get("title", "title"));
    let location = text_or_default(get("location", "location"));
    let photos_raw = get("photos", "photos");
    let mut image = text_or_default(get("image", "image"));
    let photos = photos(photos_raw, &image);
    if image.is_empty() {
        if let Some(first) = photos.first() {
            image = first.clone();
        }
    }

    let explicit_slug = get("slug", "slug").and_then(text);
    let id = get("id", "id").and_then(record_id);
    let slug = explicit_slug
        .or_else(|| Some(slugify(&title)).filter(|s| !s.is_empty()))
        .or_else(|| id.as_ref().map(|id| id.to_string()))
        .unwrap_or_default();
    let id = id.unwrap_or_else(|| RecordId::Text(slug.clone()));

    Some(Property {
        id,
        slug,
        title,
        description: text_or_default(get("description", "description")),
        image,
        photos,
        bedrooms: get("bedrooms", "bedrooms").and_then(text),
        bathrooms: get("bathrooms", "bathrooms").and_then(text),
        property_type: get("type", "type")
            .or_else(|| get("propertyType", "property_type"))
            .and_then(text)
            .unwrap_or_default(),
        purpose: get("purpose", "purpose")
            .and_then(Value::as_str)
            .and_then(Purpose::parse),
        price: get("price", "price").and_then(price),
        price_display: get("priceDisplay", "price_display").and_then(text),
        address: address(get("address", "address"), &location),
        location,
        overview: get("overview", "overview").map(overview).unwrap_or_default(),
        highlights: get("highlights", "highlights").map(string_list).unwrap_or_default(),
        residence_options: get("residenceOptions", "residence_options")
            .map(residence_options)
            .unwrap_or_default(),
        features: get("features", "features").and_then(features),
        floor_plans: get("floorPlans", "floor_plans").map(floor_plans).unwrap_or_default(),
        floor_plan_file: get("floorPlanFile", "floor_plan_file").and_then(file_url),
        brochure_file: get("brochureFile", "brochure_file").and_then(file_url),
        agent: get("agent", "agent").and_then(agent),
    })
}

/// Normalize a list payload. Elements that are not objects are dropped.
pub fn normalize_properties(raw: &Value) -> Vec<Property> {
    let items = array(raw).unwrap_or_default();
    let total = items.len();
    let properties: Vec<Property> = items.iter().filter_map(normalize_property).collect();
    if properties.len() < total {
        debug!("Dropped {} non-object property entries", total - properties.len());
    }
    properties
}

/// Read one site-data layer (`/api/site-data` body or the persisted
/// dataset). Each key is parsed on its own; a key that fails to parse is
/// left out of the layer instead of failing the whole document.
pub fn site_overrides(raw: &Value) -> SiteOverrides {
    let obj = match object(raw) {
        Some(obj) => obj,
        None => return SiteOverrides::default(),
    };
    let locations = obj.get("locations").and_then(object);
    let nested_list = |key: &str| {
        locations
            .as_ref()
            .and_then(|l| l.get(key))
            .and_then(array)
            .map(|items| strings(&items))
    };
    let list = |keys: &[&str]| {
        keys.iter()
            .find_map(|k| obj.get(*k).filter(|v| !v.is_null()))
            .and_then(array)
            .map(|items| strings(&items))
    };

    SiteOverrides {
        properties: obj
            .get("properties")
            .filter(|v| !v.is_null())
            .map(normalize_properties),
        testimonials: entities::<Testimonial>(&obj, "testimonials"),
        areas: entities::<Area>(&obj, "areas"),
        locations_buy: list(&["locationsBuy", "locationsListBuy", "locations_buy"])
            .or_else(|| nested_list("buy")),
        locations_rent: list(&["locationsRent", "locationsListRent", "locations_rent"])
            .or_else(|| nested_list("rent")),
        locations_off_plan: list(&[
            "locationsOffPlan",
            "locationsListOffPlan",
            "locations_off_plan",
        ])
        .or_else(|| nested_list("offPlan")),
        featured_property_ids: field(&obj, "featuredPropertyIds", "featured_property_ids")
            .and_then(array)
            .map(|items| items.iter().filter_map(record_id).collect()),
        contact: single::<ContactInfo>(&obj, "contact"),
        social_links: field(&obj, "socialLinks", "social_links")
            .and_then(array)
            .map(|items| parse_each::<SocialLink>(&items, "socialLinks")),
        developers: entities::<Developer>(&obj, "developers"),
    }
}

/// Typed list payload (an admin list endpoint body). Malformed entries are
/// skipped with a warning.
pub fn entity_list<T: DeserializeOwned>(raw: &Value, what: &str) -> Vec<T> {
    array(raw).map(|items| parse_each(&items, what)).unwrap_or_default()
}

fn entities<T: DeserializeOwned>(obj: &Map<String, Value>, key: &str) -> Option<Vec<T>> {
    obj.get(key)
        .filter(|v| !v.is_null())
        .and_then(array)
        .map(|items| parse_each(&items, key))
}

fn parse_each<T: DeserializeOwned>(items: &[Value], key: &str) -> Vec<T> {
    items
        .iter()
        .filter_map(|item| match serde_json::from_value::<T>(item.clone()) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("Skipping malformed {} entry: {}", key, e);
                None
            }
        })
        .collect()
}

fn single<T: DeserializeOwned>(obj: &Map<String, Value>, key: &str) -> Option<T> {
    let value = obj.get(key).filter(|v| !v.is_null()).and_then(object)?;
    match serde_json::from_value(Value::Object(value)) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!("Ignoring malformed {}: {}", key, e);
            None
        }
    }
}

/// explicit array → JSON array string → single non-blank string → image → []
fn photos(raw: Option<&Value>, image: &str) -> Vec<String> {
    let mut photos = match raw {
        Some(Value::Array(items)) => strings(items),
        Some(value @ Value::String(s)) => match try_json(value) {
            Some(Value::Array(items)) => strings(&items),
            _ if !s.trim().is_empty() => vec![s.trim().to_string()],
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };
    if photos.is_empty() && !image.is_empty() {
        photos.push(image.to_string());
    }
    photos
}

fn price(value: &Value) -> Option<Price> {
    if let Some(amount) = number(value) {
        return Some(Price::Amount(amount));
    }
    text(value).map(Price::Text)
}

fn address(raw: Option<&Value>, location: &str) -> Address {
    let mut address = Address {
        line1: if location.is_empty() {
            DEFAULT_CITY.to_string()
        } else {
            location.to_string()
        },
        city: DEFAULT_CITY.to_string(),
        country: DEFAULT_COUNTRY.to_string(),
        lat: Some(DEFAULT_LAT),
        lng: Some(DEFAULT_LNG),
    };
    let obj = match raw.and_then(object) {
        Some(obj) => obj,
        None => return address,
    };
    if let Some(line1) = obj.get("line1").and_then(text) {
        address.line1 = line1;
    }
    if let Some(city) = obj.get("city").and_then(text) {
        address.city = city;
    }
    if let Some(country) = obj.get("country").and_then(text) {
        address.country = country;
    }
    if let Some(lat) = obj.get("lat").and_then(number) {
        address.lat = Some(lat);
    }
    if let Some(lng) = obj.get("lng").and_then(number) {
        address.lng = Some(lng);
    }
    address
}

fn overview(value: &Value) -> Overview {
    let obj = match object(value) {
        Some(obj) => obj,
        None => return Overview::default(),
    };
    let get = |camel: &str, snake: &str| field(&obj, camel, snake).and_then(text);
    Overview {
        area_sqft: get("areaSqft", "area_sqft"),
        area_text: get("areaText", "area_text"),
        status: get("status", "status"),
        year_built: get("yearBuilt", "year_built"),
        garages: get("garages", "garages"),
        building_configuration: get("buildingConfiguration", "building_configuration"),
        project_type: get("projectType", "project_type"),
    }
}

fn residence_options(value: &Value) -> Vec<ResidenceOption> {
    array(value)
        .unwrap_or_default()
        .iter()
        .filter_map(|item| item.as_object())
        .map(|obj| ResidenceOption {
            label: text_or_default(obj.get("label")),
            items: obj.get("items").map(string_list).unwrap_or_default(),
        })
        .collect()
}

fn features(value: &Value) -> Option<BTreeMap<String, Vec<String>>> {
    let obj = object(value)?;
    Some(
        obj.iter()
            .filter_map(|(group, items)| {
                let list = match items {
                    Value::Array(items) => strings(items),
                    Value::String(s) => lines(s),
                    _ => return None,
                };
                Some((group.clone(), list))
            })
            .collect(),
    )
}

fn floor_plans(value: &Value) -> Vec<FloorPlan> {
    array(value)
        .unwrap_or_default()
        .iter()
        .filter_map(|item| item.as_object())
        .map(|obj| FloorPlan {
            id: obj.get("id").and_then(record_id),
            title: text_or_default(obj.get("title")),
            image: text_or_default(obj.get("image")),
        })
        .collect()
}

fn file_url(value: &Value) -> Option<String> {
    value.as_str().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

fn agent(value: &Value) -> Option<Agent> {
    let obj = object(value)?;
    let agent = Agent {
        name: obj.get("name").and_then(text),
        phone: obj.get("phone").and_then(text),
        email: obj.get("email").and_then(text),
    };
    if agent.name.is_none() && agent.phone.is_none() && agent.email.is_none() {
        None
    } else {
        Some(agent)
    }
}
