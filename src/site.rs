use crate::config::{Config, DataMode};
use crate::error::Result;
use crate::models::{LeadRequest, Property, SiteData};
use crate::search::{self, Facets, SearchPage};
use crate::slug::find_property;
use crate::sources::{ApiSource, DataSource, LocalStore};
use crate::storage::FileStorage;
use tracing::{debug, info, warn};

/// Entry point for everything the public site reads. Built once from the
/// startup config; dashboard operations go through `source()`.
pub struct SiteService {
    config: Config,
    source: Box<dyn DataSource>,
}

impl SiteService {
    pub fn from_config(config: Config) -> Result<Self> {
        let storage = FileStorage::new(&config.data_dir);
        let source: Box<dyn DataSource> = match config.mode() {
            DataMode::Api { base_url } => {
                Box::new(ApiSource::new(&base_url, storage, config.request_timeout)?)
            }
            DataMode::Local => Box::new(LocalStore::new(storage)),
        };
        info!("Using {} data source", source.source_name());
        Ok(Self { config, source })
    }

    /// Use `source` whatever mode `config` names.
    pub fn with_source(config: Config, source: Box<dyn DataSource>) -> Self {
        Self { config, source }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn mode(&self) -> DataMode {
        self.config.mode()
    }

    pub fn source(&self) -> &dyn DataSource {
        self.source.as_ref()
    }

    /// Built-in defaults with the source's layer on top. Source failures are
    /// logged and the defaults returned.
    pub async fn site_data(&self) -> SiteData {
        let defaults = SiteData::defaults();
        match self.source.site_data().await {
            Ok(layer) => defaults.apply(layer),
            Err(e) => {
                warn!(
                    "Failed to load site data from {} source, using defaults: {}",
                    self.source.source_name(),
                    e
                );
                defaults
            }
        }
    }

    pub async fn search(&self, facets: &Facets) -> SearchPage {
        let data = self.site_data().await;
        let page = search::search(&data.properties, facets);
        debug!(
            "Search {} / {} matched {} (page {}/{})",
            facets.purpose, facets.location, page.total, page.page, page.total_pages
        );
        page
    }

    /// Detail lookup. `None` is the "not found" state, never an error.
    pub async fn property(&self, slug_or_id: &str) -> Option<Property> {
        match self.source.property(slug_or_id).await {
            Ok(Some(property)) => return Some(property),
            Ok(None) => {}
            Err(e) => warn!("Property lookup for '{}' failed: {}", slug_or_id, e),
        }
        if !self.mode().is_api() {
            return None;
        }
        // The detail endpoint only knows ids; slugs resolve through the list.
        let data = self.site_data().await;
        find_property(&data.properties, slug_or_id).cloned()
    }

    pub async fn submit_download_lead(&self, lead: LeadRequest) -> Result<()> {
        let lead = lead.validated()?;
        self.source.submit_download_lead(&lead).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ListingError;
    use crate::models::{DocumentType, Purpose};
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_from_config_picks_source_by_mode() {
        let dir = tempdir().unwrap();
        let local =
            SiteService::from_config(Config::default().with_data_dir(dir.path())).unwrap();
        assert_eq!(local.source().source_name(), "local");
        assert_eq!(local.mode(), DataMode::Local);

        let api = SiteService::from_config(
            Config::default()
                .with_data_dir(dir.path())
                .with_api_url("https://api.example.com/"),
        )
        .unwrap();
        assert_eq!(api.source().source_name(), "api");
        assert!(api.mode().is_api());
    }

    #[tokio::test]
    async fn test_site_data_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        // A regular file where the data directory should be makes every read fail.
        let blocked = dir.path().join("blocked");
        std::fs::write(&blocked, "x").unwrap();
        let service =
            SiteService::from_config(Config::default().with_data_dir(&blocked)).unwrap();

        assert_eq!(service.site_data().await, SiteData::defaults());
        assert!(service.search(&Facets::default()).await.is_empty());
        assert_eq!(service.property("1").await, None);
    }

    #[tokio::test]
    async fn test_search_and_detail_over_local_store() {
        let dir = tempdir().unwrap();
        let service =
            SiteService::from_config(Config::default().with_data_dir(dir.path())).unwrap();
        let source = service.source();
        source.login("admin", "admin123").await.unwrap();
        source
            .create_property(json!({
                "title": "Marina Loft",
                "purpose": "rent",
                "price": 90000,
                "location": "Dubai Marina"
            }))
            .await
            .unwrap();
        source
            .create_property(json!({"title": "Hills Villa", "purpose": "buy", "price": 4200000}))
            .await
            .unwrap();

        let page = service
            .search(&Facets {
                location: "dubai marina".into(),
                ..Facets::for_purpose(Purpose::Rent)
            })
            .await;
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].title, "Marina Loft");

        assert_eq!(
            service.property("hills-villa").await.map(|p| p.title),
            Some("Hills Villa".to_string())
        );
        assert_eq!(service.property("missing").await, None);
    }

    #[tokio::test]
    async fn test_injected_source_serves_reads() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(FileStorage::new(dir.path()));
        store.login("admin", "admin123").await.unwrap();
        store
            .create_property(json!({"title": "Creek Rise", "purpose": "off-plan"}))
            .await
            .unwrap();

        // The config names the API, but nothing reaches the network.
        let config = Config::default().with_api_url("http://127.0.0.1:9");
        let service = SiteService::with_source(config, Box::new(store));
        assert!(service.mode().is_api());
        assert_eq!(service.source().source_name(), "local");

        let page = service.search(&Facets::for_purpose(Purpose::OffPlan)).await;
        assert_eq!(page.total, 1);
        assert_eq!(
            service.property("creek-rise").await.map(|p| p.title),
            Some("Creek Rise".to_string())
        );
    }

    #[tokio::test]
    async fn test_lead_is_validated_before_submission() {
        let dir = tempdir().unwrap();
        let service =
            SiteService::from_config(Config::default().with_data_dir(dir.path())).unwrap();
        let lead = LeadRequest {
            full_name: "Lina".into(),
            phone: String::new(),
            email: "lina@example.com".into(),
            project: Some("Creek Rise".into()),
            message: None,
            document_type: DocumentType::Brochure,
        };
        assert!(matches!(
            service.submit_download_lead(lead.clone()).await,
            Err(ListingError::Validation(_))
        ));
        let complete = LeadRequest { phone: "+971 50 000 0000".into(), ..lead };
        service.submit_download_lead(complete).await.unwrap();
    }
}
