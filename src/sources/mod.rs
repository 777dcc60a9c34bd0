pub mod api;
pub mod defaults;
pub mod local;
pub mod traits;

pub use api::ApiSource;
pub use local::LocalStore;
pub use traits::DataSource;
