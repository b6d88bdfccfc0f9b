use serde::{Deserialize, Serialize};

/// Response of `GET {base}/get-all-images-by-hn/{hn}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImageListResponse {
    pub hn: String,
    pub total_images: u64,
    pub images: Vec<ImageEntry>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImageEntry {
    pub filename: String,
    #[serde(default)]
    pub branch_code: String,
    pub full_path: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub url: String,
    pub dates: ImageDates,
}

// Timestamps stay as strings here; the viewer parses them (the service
// emits both RFC 3339 and zone-less forms).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImageDates {
    pub created_time: String,
    #[serde(default)]
    pub modified_time: String,
    #[serde(default)]
    pub accessed_time: String,
}

/// Request body of `POST {base}/get-image-by-path/base64`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImageContentRequest {
    pub full_path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImageContentResponse {
    pub full_path: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub branch_code: String,
    #[serde(default)]
    pub size: u64,
    pub base64: String,
    pub mime_type: String,
}
