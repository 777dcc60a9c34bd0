use crate::models::Property;
use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_\-]+").unwrap());
static DASH_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"-{2,}").unwrap());

/// URL-friendly slug: lowercase, whitespace to dashes, everything outside
/// `[A-Za-z0-9_-]` dropped, dash runs collapsed, edge dashes trimmed.
pub fn slugify(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let dashed = WHITESPACE.replace_all(&lowered, "-");
    let cleaned = NON_WORD.replace_all(&dashed, "");
    let collapsed = DASH_RUNS.replace_all(&cleaned, "-");
    collapsed.trim_matches('-').to_string()
}

/// Slug used in property URLs: explicit slug, else slugified title, else id.
pub fn property_slug(property: &Property) -> String {
    if !property.slug.trim().is_empty() {
        return property.slug.clone();
    }
    let from_title = slugify(&property.title);
    if !from_title.is_empty() {
        return from_title;
    }
    property.id.to_string()
}

/// Resolve a detail-page key. All-digit keys match numeric ids; anything
/// else matches the slug or the slugified title.
pub fn find_property<'a>(properties: &'a [Property], slug_or_id: &str) -> Option<&'a Property> {
    let key = slug_or_id.trim();
    if key.is_empty() {
        return None;
    }
    if key.bytes().all(|b| b.is_ascii_digit()) {
        let wanted: i64 = key.parse().ok()?;
        return properties.iter().find(|p| p.id.as_number() == Some(wanted));
    }
    properties
        .iter()
        .find(|p| p.slug == key || slugify(&p.title) == key)
}
