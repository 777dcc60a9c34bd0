use crate::error::{ListingError, Result};
use crate::models::{
    Area, ContactInfo, Developer, DownloadLead, LeadRequest, LocationLists, Property, Purpose,
    RecordId, SiteData, SiteOverrides, SocialLink, Testimonial,
};
use crate::normalize::{normalize_property, site_overrides};
use crate::slug::{find_property, slugify};
use crate::sources::traits::DataSource;
use crate::storage::{FileStorage, AUTH_KEY, DATASET_KEY};
use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const MODE: &str = "local";
const ADMIN_USER: &str = "admin";
const ADMIN_PASSWORD: &str = "admin123";
const LOCAL_TOKEN: &str = "logged-in";

/// Offline backend: the whole CMS dataset lives under one storage key.
pub struct LocalStore {
    storage: FileStorage,
    // Serializes read-modify-write cycles on the dataset.
    lock: Mutex<()>,
}

impl LocalStore {
    pub fn new(storage: FileStorage) -> Self {
        Self {
            storage,
            lock: Mutex::new(()),
        }
    }

    /// The persisted layer on its own. Missing or unreadable data is an empty layer.
    async fn stored_layer(&self) -> Result<SiteOverrides> {
        let raw = match self.storage.get(DATASET_KEY).await? {
            Some(raw) => raw,
            None => return Ok(SiteOverrides::default()),
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(doc) => Ok(site_overrides(&doc)),
            Err(e) => {
                warn!("Stored dataset is not valid JSON, ignoring it: {}", e);
                Ok(SiteOverrides::default())
            }
        }
    }

    /// Defaults with the persisted layer applied.
    pub async fn load(&self) -> Result<SiteData> {
        Ok(SiteData::defaults().apply(self.stored_layer().await?))
    }

    async fn save(&self, data: &SiteData) -> Result<()> {
        let doc = data.to_document()?;
        self.storage.set(DATASET_KEY, &serde_json::to_string(&doc)?).await
    }

    async fn require_auth(&self) -> Result<()> {
        match self.auth_token().await? {
            Some(_) => Ok(()),
            None => Err(ListingError::Unauthorized),
        }
    }

    async fn read<T: Send>(&self, f: impl FnOnce(SiteData) -> T + Send) -> Result<T> {
        self.require_auth().await?;
        Ok(f(self.load().await?))
    }

    async fn mutate<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut SiteData) -> Result<T> + Send,
        T: Send,
    {
        self.require_auth().await?;
        let _guard = self.lock.lock().await;
        let mut data = self.load().await?;
        let out = f(&mut data)?;
        self.save(&data).await?;
        Ok(out)
    }
}

fn unsupported(operation: &'static str) -> ListingError {
    ListingError::Unsupported { operation, mode: MODE }
}

fn not_found(what: &str, id: &RecordId) -> ListingError {
    ListingError::NotFound(format!("{} {}", what, id))
}

fn next_id<'a>(ids: impl Iterator<Item = Option<&'a RecordId>>) -> RecordId {
    let max = ids.flatten().filter_map(RecordId::as_number).max().unwrap_or(0);
    RecordId::Numeric(max + 1)
}

fn property_from_raw(raw: &Value) -> Result<Property> {
    let property = normalize_property(raw)
        .ok_or_else(|| ListingError::Validation("Property must be a JSON object".to_string()))?;
    if property.title.trim().is_empty() {
        return Err(ListingError::Validation("Title is required".to_string()));
    }
    Ok(property)
}

fn matches_id(id: Option<&RecordId>, wanted: &RecordId) -> bool {
    id.map_or(false, |id| id.same_as(wanted))
}

/// Deduplicated, numeric ids ascending, text ids after them.
fn sorted_ids(ids: Vec<RecordId>) -> Vec<RecordId> {
    let mut out: Vec<RecordId> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.iter().any(|seen| seen.same_as(&id)) {
            out.push(id);
        }
    }
    out.sort_by(|a, b| match (a.as_number(), b.as_number()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.to_string().cmp(&b.to_string()),
    });
    out
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

#[async_trait]
impl DataSource for LocalStore {
    fn source_name(&self) -> &'static str {
        MODE
    }

    async fn site_data(&self) -> Result<SiteOverrides> {
        self.stored_layer().await
    }

    async fn property(&self, slug_or_id: &str) -> Result<Option<Property>> {
        let data = self.load().await?;
        Ok(find_property(&data.properties, slug_or_id).cloned())
    }

    async fn login(&self, user: &str, password: &str) -> Result<()> {
        let user = user.trim();
        if (user.is_empty() || user == ADMIN_USER) && password == ADMIN_PASSWORD {
            self.storage.set(AUTH_KEY, LOCAL_TOKEN).await?;
            info!("Logged in to local dashboard");
            Ok(())
        } else {
            Err(ListingError::InvalidCredentials(
                "Invalid credentials. Default: admin / admin123".to_string(),
            ))
        }
    }

    async fn logout(&self) -> Result<()> {
        self.storage.remove(AUTH_KEY).await
    }

    async fn auth_token(&self) -> Result<Option<String>> {
        Ok(self
            .storage
            .get(AUTH_KEY)
            .await?
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty()))
    }

    async fn properties(&self) -> Result<Vec<Property>> {
        self.read(|data| data.properties).await
    }

    async fn create_property(&self, raw: Value) -> Result<Property> {
        let mut property = property_from_raw(&raw)?;
        self.mutate(move |data| {
            property.id = next_id(data.properties.iter().map(|p| Some(&p.id)));
            if property.slug.is_empty() {
                property.slug = property.id.to_string();
            }
            info!("Created property {} ({})", property.id, property.title);
            data.properties.push(property.clone());
            Ok(property)
        })
        .await
    }

    async fn update_property(&self, id: &RecordId, raw: Value) -> Result<Property> {
        let mut property = property_from_raw(&raw)?;
        self.mutate(move |data| {
            let slot = data
                .properties
                .iter_mut()
                .find(|p| p.id.same_as(id))
                .ok_or_else(|| not_found("property", id))?;
            property.id = slot.id.clone();
            *slot = property.clone();
            debug!("Updated property {}", property.id);
            Ok(property)
        })
        .await
    }

    async fn delete_property(&self, id: &RecordId) -> Result<()> {
        self.mutate(|data| {
            let before = data.properties.len();
            data.properties.retain(|p| !p.id.same_as(id));
            if data.properties.len() == before {
                return Err(not_found("property", id));
            }
            data.featured_property_ids.retain(|f| !f.same_as(id));
            info!("Deleted property {}", id);
            Ok(())
        })
        .await
    }

    async fn testimonials(&self) -> Result<Vec<Testimonial>> {
        self.read(|data| data.testimonials).await
    }

    async fn create_testimonial(&self, mut testimonial: Testimonial) -> Result<Testimonial> {
        if testimonial.name.trim().is_empty() || testimonial.quote.trim().is_empty() {
            return Err(ListingError::Validation("Name and quote are required".to_string()));
        }
        self.mutate(move |data| {
            testimonial.id = Some(next_id(data.testimonials.iter().map(|t| t.id.as_ref())));
            data.testimonials.push(testimonial.clone());
            Ok(testimonial)
        })
        .await
    }

    async fn update_testimonial(
        &self,
        id: &RecordId,
        mut testimonial: Testimonial,
    ) -> Result<Testimonial> {
        self.mutate(move |data| {
            let slot = data
                .testimonials
                .iter_mut()
                .find(|t| matches_id(t.id.as_ref(), id))
                .ok_or_else(|| not_found("testimonial", id))?;
            testimonial.id = slot.id.clone();
            *slot = testimonial.clone();
            Ok(testimonial)
        })
        .await
    }

    async fn delete_testimonial(&self, id: &RecordId) -> Result<()> {
        self.mutate(|data| {
            let before = data.testimonials.len();
            data.testimonials.retain(|t| !matches_id(t.id.as_ref(), id));
            if data.testimonials.len() == before {
                return Err(not_found("testimonial", id));
            }
            Ok(())
        })
        .await
    }

    async fn areas(&self) -> Result<Vec<Area>> {
        self.read(|data| data.areas).await
    }

    async fn create_area(&self, mut area: Area) -> Result<Area> {
        area.name = area.name.trim().to_string();
        let slug = slugify(&area.name);
        if slug.is_empty() {
            return Err(ListingError::Validation("Area name is required".to_string()));
        }
        let id = RecordId::Text(slug);
        self.mutate(move |data| {
            if data.areas.iter().any(|a| matches_id(a.id.as_ref(), &id)) {
                return Err(ListingError::Validation(format!(
                    "An area with id '{}' already exists",
                    id
                )));
            }
            area.id = Some(id);
            data.areas.push(area.clone());
            Ok(area)
        })
        .await
    }

    async fn update_area(&self, id: &RecordId, mut area: Area) -> Result<Area> {
        self.mutate(move |data| {
            let slot = data
                .areas
                .iter_mut()
                .find(|a| matches_id(a.id.as_ref(), id))
                .ok_or_else(|| not_found("area", id))?;
            area.id = slot.id.clone();
            *slot = area.clone();
            Ok(area)
        })
        .await
    }

    async fn delete_area(&self, id: &RecordId) -> Result<()> {
        self.mutate(|data| {
            let before = data.areas.len();
            data.areas.retain(|a| !matches_id(a.id.as_ref(), id));
            if data.areas.len() == before {
                return Err(not_found("area", id));
            }
            Ok(())
        })
        .await
    }

    async fn locations(&self) -> Result<LocationLists> {
        self.read(|data| data.locations).await
    }

    async fn add_location(&self, name: &str, purpose: Purpose) -> Result<LocationLists> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(ListingError::Validation("Location name is required".to_string()));
        }
        self.mutate(move |data| {
            let list = data.locations.for_purpose_mut(purpose);
            if !list.iter().any(|l| same_name(l, &name)) {
                list.push(name);
            }
            Ok(data.locations.clone())
        })
        .await
    }

    async fn remove_location(&self, name: &str, purpose: Purpose) -> Result<LocationLists> {
        self.mutate(|data| {
            data.locations
                .for_purpose_mut(purpose)
                .retain(|l| !same_name(l, name));
            Ok(data.locations.clone())
        })
        .await
    }

    async fn contact(&self) -> Result<ContactInfo> {
        self.read(|data| data.contact).await
    }

    async fn update_contact(&self, contact: ContactInfo) -> Result<ContactInfo> {
        self.mutate(move |data| {
            data.contact = contact.clone();
            Ok(contact)
        })
        .await
    }

    async fn social_links(&self) -> Result<Vec<SocialLink>> {
        self.read(|data| data.social_links).await
    }

    async fn upsert_social_link(&self, mut link: SocialLink) -> Result<Vec<SocialLink>> {
        link.name = link.name.trim().to_string();
        if link.name.is_empty() {
            return Err(ListingError::Validation("Social link name is required".to_string()));
        }
        self.mutate(move |data| {
            match data.social_links.iter_mut().find(|l| same_name(&l.name, &link.name)) {
                Some(existing) => *existing = link,
                None => data.social_links.push(link),
            }
            Ok(data.social_links.clone())
        })
        .await
    }

    async fn delete_social_link(&self, name: &str) -> Result<Vec<SocialLink>> {
        self.mutate(|data| {
            data.social_links.retain(|l| !same_name(&l.name, name));
            Ok(data.social_links.clone())
        })
        .await
    }

    async fn featured(&self) -> Result<Vec<RecordId>> {
        self.read(|data| data.featured_property_ids).await
    }

    async fn set_featured(&self, ids: Vec<RecordId>) -> Result<Vec<RecordId>> {
        let ids = sorted_ids(ids);
        self.mutate(move |data| {
            data.featured_property_ids = ids.clone();
            Ok(ids)
        })
        .await
    }

    async fn developers(&self) -> Result<Vec<Developer>> {
        self.read(|data| data.developers).await
    }

    async fn set_developers(&self, developers: Vec<Developer>) -> Result<Vec<Developer>> {
        if developers.iter().any(|d| d.name.trim().is_empty()) {
            return Err(ListingError::Validation("Developer name is required".to_string()));
        }
        self.mutate(move |data| {
            data.developers = developers.clone();
            Ok(developers)
        })
        .await
    }

    async fn submit_download_lead(&self, lead: &LeadRequest) -> Result<()> {
        // Leads are only captured by the API backend.
        info!(
            "Download lead for {} from {} accepted without capture",
            lead.document_type.label(),
            lead.email
        );
        Ok(())
    }

    async fn download_leads(&self) -> Result<Vec<DownloadLead>> {
        Err(unsupported("download leads"))
    }

    async fn set_lead_contacted(&self, _id: &RecordId, _contacted: bool) -> Result<()> {
        Err(unsupported("download leads"))
    }

    async fn delete_download_lead(&self, _id: &RecordId) -> Result<()> {
        Err(unsupported("download leads"))
    }

    async fn reset(&self) -> Result<()> {
        self.require_auth().await?;
        let _guard = self.lock.lock().await;
        self.storage.remove(DATASET_KEY).await?;
        info!("Local dataset reset to defaults");
        Ok(())
    }
}
