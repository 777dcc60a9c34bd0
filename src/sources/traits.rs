use crate::error::Result;
use crate::models::{
    Area, ContactInfo, Developer, DownloadLead, LeadRequest, LocationLists, Property, Purpose,
    RecordId, SiteOverrides, SocialLink, Testimonial,
};
use async_trait::async_trait;
use serde_json::Value;

/// Backend behind the public site and the CMS dashboard.
/// Both implementations hand back canonical records, whatever they store.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Short name used in logs ("api" or "local")
    fn source_name(&self) -> &'static str;

    /// Layer this source contributes on top of the built-in defaults.
    async fn site_data(&self) -> Result<SiteOverrides>;

    /// Public detail lookup by slug or id. `Ok(None)` is "not found".
    async fn property(&self, slug_or_id: &str) -> Result<Option<Property>>;

    // Auth

    async fn login(&self, user: &str, password: &str) -> Result<()>;
    async fn logout(&self) -> Result<()>;
    async fn auth_token(&self) -> Result<Option<String>>;

    // Properties. Writes take a raw record and return it normalized.

    async fn properties(&self) -> Result<Vec<Property>>;
    async fn create_property(&self, raw: Value) -> Result<Property>;
    async fn update_property(&self, id: &RecordId, raw: Value) -> Result<Property>;
    async fn delete_property(&self, id: &RecordId) -> Result<()>;

    async fn testimonials(&self) -> Result<Vec<Testimonial>>;
    async fn create_testimonial(&self, testimonial: Testimonial) -> Result<Testimonial>;
    async fn update_testimonial(
        &self,
        id: &RecordId,
        testimonial: Testimonial,
    ) -> Result<Testimonial>;
    async fn delete_testimonial(&self, id: &RecordId) -> Result<()>;

    async fn areas(&self) -> Result<Vec<Area>>;
    async fn create_area(&self, area: Area) -> Result<Area>;
    async fn update_area(&self, id: &RecordId, area: Area) -> Result<Area>;
    async fn delete_area(&self, id: &RecordId) -> Result<()>;

    // Search dropdown locations; every call returns the updated lists.

    async fn locations(&self) -> Result<LocationLists>;
    async fn add_location(&self, name: &str, purpose: Purpose) -> Result<LocationLists>;
    async fn remove_location(&self, name: &str, purpose: Purpose) -> Result<LocationLists>;

    async fn contact(&self) -> Result<ContactInfo>;
    async fn update_contact(&self, contact: ContactInfo) -> Result<ContactInfo>;

    async fn social_links(&self) -> Result<Vec<SocialLink>>;
    /// Insert, or replace the link with the same name.
    async fn upsert_social_link(&self, link: SocialLink) -> Result<Vec<SocialLink>>;
    async fn delete_social_link(&self, name: &str) -> Result<Vec<SocialLink>>;

    async fn featured(&self) -> Result<Vec<RecordId>>;
    async fn set_featured(&self, ids: Vec<RecordId>) -> Result<Vec<RecordId>>;

    async fn developers(&self) -> Result<Vec<Developer>>;
    async fn set_developers(&self, developers: Vec<Developer>) -> Result<Vec<Developer>>;

    // Download leads. Submission is public; the rest needs auth.

    async fn submit_download_lead(&self, lead: &LeadRequest) -> Result<()>;
    async fn download_leads(&self) -> Result<Vec<DownloadLead>>;
    async fn set_lead_contacted(&self, id: &RecordId, contacted: bool) -> Result<()>;
    async fn delete_download_lead(&self, id: &RecordId) -> Result<()>;

    /// Restore the stored dataset to the built-in defaults.
    async fn reset(&self) -> Result<()>;
}
