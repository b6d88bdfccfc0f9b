use super::{
    ContentProvider, ImageContentRequest, ImageContentResponse, ImageListResponse,
    MetadataProvider, ProviderError,
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// HTTP client for the image storage service. Implements both provider
/// traits against a single configured endpoint root.
pub struct HttpImageStore {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpImageStore {
    pub fn new(config: &crate::ProviderConfig) -> Result<Self, ProviderError> {
        // A trailing slash keeps Url::join from replacing the last path
        // segment of a base like "http://host/api".
        let mut base = config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;

        let mut builder = reqwest::Client::builder();
        if config.request_timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.request_timeout_secs));
        }
        let client = builder.build()?;

        Ok(Self { client, base_url })
    }

    fn list_endpoint(&self, hn: &str) -> Result<Url, ProviderError> {
        let path = format!("get-all-images-by-hn/{}", urlencoding::encode(hn));
        Ok(self.base_url.join(&path)?)
    }

    fn content_endpoint(&self) -> Result<Url, ProviderError> {
        Ok(self.base_url.join("get-image-by-path/base64")?)
    }
}

#[async_trait]
impl MetadataProvider for HttpImageStore {
    async fn list_images(&self, hn: &str) -> Result<ImageListResponse, ProviderError> {
        let url = self.list_endpoint(hn)?;
        debug!("Requesting image list: {}", url);

        let response = self.client.get(url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(ProviderError::UnexpectedStatus {
                endpoint: url.to_string(),
                status: response.status(),
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl ContentProvider for HttpImageStore {
    async fn fetch_content(&self, full_path: &str) -> Result<ImageContentResponse, ProviderError> {
        let url = self.content_endpoint()?;
        debug!("Requesting image content for {}", full_path);

        let request = ImageContentRequest {
            full_path: full_path.to_string(),
        };
        let response = self.client.post(url.clone()).json(&request).send().await?;
        if !response.status().is_success() {
            return Err(ProviderError::UnexpectedStatus {
                endpoint: url.to_string(),
                status: response.status(),
            });
        }

        Ok(response.json().await?)
    }
}
