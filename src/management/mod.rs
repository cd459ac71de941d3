mod chart;
mod credentials;
mod error;
mod registry;

pub use chart::ChartCache;
pub use credentials::CredentialStore;
pub use credentials::Credentials;
pub use credentials::{
    KEY_ACCESS_TOKEN, KEY_CLIENT_ID, KEY_CLIENT_SECRET, KEY_REFRESH_TOKEN, KEY_USER_ID,
};
pub use error::StoreError;
pub use registry::PlaylistRegistry;
