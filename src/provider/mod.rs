// Provider module - clients for the external image storage service
mod error;
mod http;
mod types;

pub use error::ProviderError;
pub use http::HttpImageStore;
pub use types::*;

use async_trait::async_trait;

/// Returns the descriptor list for every photo stored under a customer
/// identifier.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn list_images(&self, hn: &str) -> Result<ImageListResponse, ProviderError>;
}

/// Returns one image's encoded payload given its storage path.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    async fn fetch_content(&self, full_path: &str) -> Result<ImageContentResponse, ProviderError>;
}
