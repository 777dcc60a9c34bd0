use crate::error::{ListingError, Result};
use crate::models::{
    Area, ContactInfo, Developer, DownloadLead, LeadRequest, LocationLists, Property, Purpose,
    RecordId, SiteOverrides, SocialLink, Testimonial,
};
use crate::normalize::json::{array, object, record_id, strings};
use crate::normalize::{entity_list, normalize_properties, normalize_property, site_overrides};
use crate::sources::defaults;
use crate::sources::traits::DataSource;
use crate::storage::{FileStorage, AUTH_KEY};
use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::time::Duration;
use tracing::{debug, info, warn};

const MODE: &str = "api";

/// REST backend. Admin calls carry the stored bearer token when there is one.
pub struct ApiSource {
    client: Client,
    base_url: Url,
    storage: FileStorage,
}

impl ApiSource {
    pub fn new(base_url: &str, storage: FileStorage, timeout: Duration) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| ListingError::Config(format!("invalid API URL '{}': {}", base_url, e)))?;
        if parsed.cannot_be_a_base() {
            return Err(ListingError::Config(format!(
                "API URL '{}' cannot hold paths",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("prime-listings/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: parsed,
            storage,
        })
    }

    /// Base URL plus `segments`, each percent-encoded as one path segment.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ListingError::NoApiUrl)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request and hand back the status with the decoded body.
    /// 204 has no body; a body that is not JSON reads as `{}`.
    async fn exchange(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<(StatusCode, Option<Value>)> {
        debug!("{} {}", method, url);
        let mut request = self.client.request(method, url);
        if let Some(token) = self.auth_token().await? {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok((status, None));
        }
        let text = response.text().await?;
        let data = serde_json::from_str(&text).unwrap_or_else(|_| Value::Object(Map::new()));
        Ok((status, Some(data)))
    }

    async fn call(&self, method: Method, url: Url, body: Option<&Value>) -> Result<Option<Value>> {
        let (status, data) = self.exchange(method, url, body).await?;
        if status.is_success() {
            Ok(data)
        } else {
            Err(error_for(status, data.as_ref()))
        }
    }

    async fn get(&self, segments: &[&str]) -> Result<Value> {
        let url = self.url(segments)?;
        Ok(self.call(Method::GET, url, None).await?.unwrap_or(Value::Null))
    }

    async fn send<B: Serialize + Sync>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<Option<Value>> {
        let url = self.url(segments)?;
        let body = serde_json::to_value(body)?;
        self.call(method, url, Some(&body)).await
    }

    async fn delete(&self, segments: &[&str]) -> Result<()> {
        let url = self.url(segments)?;
        self.call(Method::DELETE, url, None).await?;
        Ok(())
    }

    async fn write_property(
        &self,
        method: Method,
        segments: &[&str],
        raw: Value,
    ) -> Result<Property> {
        let response = self.send(method, segments, &raw).await?;
        // Some backends answer writes with `{ok: true}`; fall back to what was sent.
        let body = response
            .filter(|v| v.get("id").is_some())
            .unwrap_or(raw);
        normalize_property(&body).ok_or_else(|| {
            ListingError::Validation("property payload must be an object".to_string())
        })
    }
}

/// Error text of a failed call: the body's `error`, else `message`, else
/// `HTTP <status>`.
pub fn error_message(body: Option<&Value>, status: u16) -> String {
    body.and_then(|b| {
        ["error", "message"]
            .iter()
            .find_map(|key| b.get(*key).and_then(Value::as_str))
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
    })
    .unwrap_or_else(|| format!("HTTP {}", status))
}

fn error_for(status: StatusCode, body: Option<&Value>) -> ListingError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ListingError::Unauthorized,
        _ => ListingError::Api {
            status: status.as_u16(),
            message: error_message(body, status.as_u16()),
        },
    }
}

/// Typed response body, or the value that was sent when the body does not
/// parse as one.
fn echo<T: DeserializeOwned>(response: Option<Value>, sent: T) -> T {
    response
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or(sent)
}

/// `{buy, rent, offPlan}`; missing lists are empty.
fn location_lists(value: &Value) -> LocationLists {
    let obj = object(value).unwrap_or_default();
    let list = |keys: &[&str]| {
        keys.iter()
            .find_map(|k| obj.get(*k).and_then(array))
            .map(|items| strings(&items))
            .unwrap_or_default()
    };
    LocationLists {
        buy: list(&["buy"]),
        rent: list(&["rent"]),
        off_plan: list(&["offPlan", "off_plan", "off-plan"]),
    }
}

/// Featured ids arrive as a bare array or as `{ids: [...]}`.
fn featured_ids(value: &Value) -> Vec<RecordId> {
    let items = array(value)
        .or_else(|| value.get("ids").and_then(array))
        .unwrap_or_default();
    items.iter().filter_map(record_id).collect()
}

fn unsupported(operation: &'static str) -> ListingError {
    ListingError::Unsupported { operation, mode: MODE }
}

#[async_trait]
impl DataSource for ApiSource {
    fn source_name(&self) -> &'static str {
        MODE
    }

    async fn site_data(&self) -> Result<SiteOverrides> {
        let body = self.get(&["api", "site-data"]).await?;
        let layer = site_overrides(&body);
        info!(
            "Fetched site data: {} properties",
            layer.properties.as_ref().map_or(0, Vec::len)
        );
        Ok(layer)
    }

    async fn property(&self, slug_or_id: &str) -> Result<Option<Property>> {
        let url = self.url(&["api", "properties", slug_or_id.trim()])?;
        let (status, data) = self.exchange(Method::GET, url, None).await?;
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(error_for(status, data.as_ref()));
        }
        Ok(data.as_ref().and_then(normalize_property))
    }

    async fn login(&self, user: &str, password: &str) -> Result<()> {
        let user = match user.trim() {
            "" => "admin",
            other => other,
        };
        let url = self.url(&["api", "admin", "login"])?;
        let body = json!({ "email": user, "password": password });
        let (status, data) = self.exchange(Method::POST, url, Some(&body)).await?;
        if !status.is_success() {
            let message = error_message(data.as_ref(), status.as_u16());
            return Err(ListingError::InvalidCredentials(message));
        }

        let token = data
            .as_ref()
            .and_then(|d| d.get("token"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|t| !t.is_empty());
        match token {
            Some(token) => {
                self.storage.set(AUTH_KEY, token).await?;
                info!("Logged in as {}", user);
                Ok(())
            }
            None => Err(ListingError::InvalidCredentials(
                "Login response carried no token".to_string(),
            )),
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
        let body = self.get(&["api", "admin", "properties"]).await?;
        Ok(normalize_properties(&body))
    }

    async fn create_property(&self, raw: Value) -> Result<Property> {
        self.write_property(Method::POST, &["api", "admin", "properties"], raw).await
    }

    async fn update_property(&self, id: &RecordId, raw: Value) -> Result<Property> {
        let id = id.to_string();
        self.write_property(Method::PUT, &["api", "admin", "properties", id.as_str()], raw).await
    }

    async fn delete_property(&self, id: &RecordId) -> Result<()> {
        self.delete(&["api", "admin", "properties", id.to_string().as_str()]).await
    }

    async fn testimonials(&self) -> Result<Vec<Testimonial>> {
        let body = self.get(&["api", "admin", "testimonials"]).await?;
        Ok(entity_list(&body, "testimonials"))
    }

    async fn create_testimonial(&self, testimonial: Testimonial) -> Result<Testimonial> {
        let response = self
            .send(Method::POST, &["api", "admin", "testimonials"], &testimonial)
            .await?;
        Ok(echo(response, testimonial))
    }

    async fn update_testimonial(
        &self,
        id: &RecordId,
        testimonial: Testimonial,
    ) -> Result<Testimonial> {
        let id = id.to_string();
        let response = self
            .send(Method::PUT, &["api", "admin", "testimonials", id.as_str()], &testimonial)
            .await?;
        Ok(echo(response, testimonial))
    }

    async fn delete_testimonial(&self, id: &RecordId) -> Result<()> {
        self.delete(&["api", "admin", "testimonials", id.to_string().as_str()]).await
    }

    async fn areas(&self) -> Result<Vec<Area>> {
        let body = self.get(&["api", "admin", "areas"]).await?;
        Ok(entity_list(&body, "areas"))
    }

    async fn create_area(&self, area: Area) -> Result<Area> {
        let response = self.send(Method::POST, &["api", "admin", "areas"], &area).await?;
        Ok(echo(response, area))
    }

    async fn update_area(&self, id: &RecordId, area: Area) -> Result<Area> {
        let id = id.to_string();
        let response = self
            .send(Method::PUT, &["api", "admin", "areas", id.as_str()], &area)
            .await?;
        Ok(echo(response, area))
    }

    async fn delete_area(&self, id: &RecordId) -> Result<()> {
        self.delete(&["api", "admin", "areas", id.to_string().as_str()]).await
    }

    async fn locations(&self) -> Result<LocationLists> {
        let body = self.get(&["api", "admin", "locations-list"]).await?;
        Ok(location_lists(&body))
    }

    async fn add_location(&self, name: &str, purpose: Purpose) -> Result<LocationLists> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ListingError::Validation("Location name is required".to_string()));
        }
        let body = json!({ "name": name, "purpose": purpose.as_str() });
        self.send(Method::POST, &["api", "admin", "locations-list"], &body).await?;
        self.locations().await
    }

    async fn remove_location(&self, name: &str, purpose: Purpose) -> Result<LocationLists> {
        let mut url = self.url(&["api", "admin", "locations-list", name.trim()])?;
        url.query_pairs_mut().append_pair("purpose", purpose.as_str());
        self.call(Method::DELETE, url, None).await?;
        self.locations().await
    }

    async fn contact(&self) -> Result<ContactInfo> {
        let body = self.get(&["api", "admin", "contact"]).await?;
        Ok(serde_json::from_value(body).unwrap_or_else(|e| {
            warn!("Malformed contact payload, using defaults: {}", e);
            defaults::contact()
        }))
    }

    async fn update_contact(&self, contact: ContactInfo) -> Result<ContactInfo> {
        let response = self.send(Method::PUT, &["api", "admin", "contact"], &contact).await?;
        Ok(echo(response, contact))
    }

    async fn social_links(&self) -> Result<Vec<SocialLink>> {
        let body = self.get(&["api", "admin", "social"]).await?;
        Ok(entity_list(&body, "social links"))
    }

    async fn upsert_social_link(&self, link: SocialLink) -> Result<Vec<SocialLink>> {
        self.send(Method::PUT, &["api", "admin", "social"], &link).await?;
        self.social_links().await
    }

    async fn delete_social_link(&self, name: &str) -> Result<Vec<SocialLink>> {
        self.delete(&["api", "admin", "social", name.trim()]).await?;
        self.social_links().await
    }

    async fn featured(&self) -> Result<Vec<RecordId>> {
        let body = self.get(&["api", "admin", "featured"]).await?;
        Ok(featured_ids(&body))
    }

    async fn set_featured(&self, ids: Vec<RecordId>) -> Result<Vec<RecordId>> {
        let response = self
            .send(Method::PUT, &["api", "admin", "featured"], &json!({ "ids": ids }))
            .await?;
        Ok(response
            .map(|v| featured_ids(&v))
            .filter(|returned| !returned.is_empty())
            .unwrap_or(ids))
    }

    async fn developers(&self) -> Result<Vec<Developer>> {
        // No admin endpoint; the public aggregate carries them when the backend has any.
        let layer = self.site_data().await?;
        Ok(layer.developers.unwrap_or_else(defaults::developers))
    }

    async fn set_developers(&self, _developers: Vec<Developer>) -> Result<Vec<Developer>> {
        Err(unsupported("editing developers"))
    }

    async fn submit_download_lead(&self, lead: &LeadRequest) -> Result<()> {
        self.send(Method::POST, &["api", "download-leads"], lead).await?;
        info!(
            "Submitted {} download lead for {}",
            lead.document_type.label(),
            lead.email
        );
        Ok(())
    }

    async fn download_leads(&self) -> Result<Vec<DownloadLead>> {
        let body = self.get(&["api", "admin", "download-leads"]).await?;
        Ok(entity_list(&body, "download leads"))
    }

    async fn set_lead_contacted(&self, id: &RecordId, contacted: bool) -> Result<()> {
        let id = id.to_string();
        self.send(
            Method::PUT,
            &["api", "admin", "download-leads", id.as_str()],
            &json!({ "contacted": contacted }),
        )
        .await?;
        Ok(())
    }

    async fn delete_download_lead(&self, id: &RecordId) -> Result<()> {
        self.delete(&["api", "admin", "download-leads", id.to_string().as_str()]).await
    }

    async fn reset(&self) -> Result<()> {
        Err(unsupported("reset"))
    }
}
