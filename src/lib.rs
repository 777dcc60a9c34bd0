//! Property listings for a real-estate site: normalization of loosely shaped
//! listing payloads, faceted search, and CMS data access against either a
//! REST backend or a local file store.

pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod models;
pub mod normalize;
pub mod search;
pub mod site;
pub mod slug;
pub mod sources;
pub mod storage;

pub use config::{Config, DataMode};
pub use error::{ListingError, Result};
pub use models::{Property, Purpose, RecordId, SiteData};
pub use search::{Facets, SearchPage, SortOrder};
pub use site::SiteService;
pub use sources::{ApiSource, DataSource, LocalStore};
