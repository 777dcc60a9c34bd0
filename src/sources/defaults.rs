//! Constant bottom layer of the site data.

use crate::models::{Area, ContactInfo, Developer, RecordId, SocialLink};

/// Every area the search filter knows about, without the "All Areas" sentinel.
pub const FILTER_LOCATIONS: &[&str] = &[
    "Dubai Marina",
    "Downtown Dubai",
    "Palm Jumeirah",
    "JBR (Jumeirah Beach Residence)",
    "Business Bay",
    "Arabian Ranches",
    "Dubai Hills Estate",
    "Jumeirah Village Circle",
    "Dubai Creek Harbour",
    "Emaar Beachfront",
    "Jumeirah Lake Towers",
    "Al Barsha",
    "Dubai Silicon Oasis",
];

/// Types offered by the search filter, without the "All Types" sentinel.
pub const PROPERTY_TYPES: &[&str] =
    &["Villa", "Apartment", "Townhouse", "Penthouse", "Studio", "Duplex"];

const DEVELOPER_NAMES: &[&str] = &[
    "Damac", "Sobha", "Ellington", "Reef", "Imtiaz", "Wadan", "Emaar", "RAK", "Anantara",
    "Peace Home", "Samana", "Aldar", "Meraas", "Nakheel",
];

pub fn filter_locations() -> Vec<String> {
    FILTER_LOCATIONS.iter().map(|s| s.to_string()).collect()
}

/// Default buy/rent dropdown list: the first ten filter locations.
pub fn location_list() -> Vec<String> {
    FILTER_LOCATIONS.iter().take(10).map(|s| s.to_string()).collect()
}

pub fn contact() -> ContactInfo {
    ContactInfo {
        phone_display: "+971 52 778 0718".to_string(),
        phone_tel: "+971527780718".to_string(),
        email: "contact@nextprimerealestate.com".to_string(),
        whatsapp_text: "Hi Next Prime, I'm interested in your Dubai properties.".to_string(),
    }
}

pub fn social_links() -> Vec<SocialLink> {
    [
        ("Facebook", "#", "facebook"),
        ("LinkedIn", "#", "linkedin"),
        ("Twitter", "#", "twitter"),
        ("YouTube", "#", "youtube"),
        ("Instagram", "https://www.instagram.com/nextprimerealestate/", "instagram"),
    ]
    .iter()
    .map(|(name, href, icon)| SocialLink {
        name: name.to_string(),
        href: href.to_string(),
        icon: icon.to_string(),
    })
    .collect()
}

pub fn areas() -> Vec<Area> {
    [
        (
            "dubai-marina",
            "Dubai Marina",
            "Waterfront lifestyle & high-demand rentals",
            [25.0807, 55.1403],
        ),
        (
            "downtown",
            "Downtown Dubai",
            "Prime CBD living near Burj Khalifa",
            [25.1972, 55.2744],
        ),
        (
            "palm-jumeirah",
            "Palm Jumeirah",
            "Ultra-luxury beachfront residences",
            [25.1124, 55.1389],
        ),
        (
            "business-bay",
            "Business Bay",
            "Modern towers & investment opportunities",
            [25.1864, 55.2727],
        ),
        (
            "jvc",
            "Jumeirah Village Circle (JVC)",
            "Value-focused homes with strong ROI",
            [25.0606, 55.2056],
        ),
        (
            "dubai-hills",
            "Dubai Hills Estate",
            "Green communities & family-friendly villas",
            [25.0669, 55.2343],
        ),
    ]
    .iter()
    .map(|(id, name, subtitle, center)| Area {
        id: Some(RecordId::Text(id.to_string())),
        name: name.to_string(),
        subtitle: subtitle.to_string(),
        center: Some(*center),
    })
    .collect()
}

pub fn developers() -> Vec<Developer> {
    DEVELOPER_NAMES
        .iter()
        .zip(1i64..)
        .map(|(name, id)| Developer {
            id: RecordId::Numeric(id),
            name: name.to_string(),
            logo_url: String::new(),
            link: String::new(),
        })
        .collect()
}
