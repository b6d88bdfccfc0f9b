use super::ViewerError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Label the presentation layer shows for the "show all" selection.
pub const ALL_IMAGES_LABEL: &str = "All images";

/// Sentinel key accepted by the selection API alongside `YYYY-MM-DD` keys.
pub const ALL_KEY: &str = "all";

/// Metadata for one stored photo. Identity is `storage_path`.
#[derive(Debug, Clone, Serialize)]
pub struct ImageDescriptor {
    pub filename: String,
    pub storage_path: String,
    pub size_bytes: u64,
    pub created_time: DateTime<Utc>,
}

/// One gallery tile. Built as a placeholder with empty content as soon as
/// descriptors arrive, replaced wholesale once the payload is fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadedImage {
    pub storage_path: String,
    pub filename: String,
    pub created_time: DateTime<Utc>,
    pub encoded_content: String,
    pub media_type: String,
}

impl LoadedImage {
    pub fn placeholder(descriptor: &ImageDescriptor) -> Self {
        Self {
            storage_path: descriptor.storage_path.clone(),
            filename: descriptor.filename.clone(),
            created_time: descriptor.created_time,
            encoded_content: String::new(),
            media_type: String::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        !self.encoded_content.is_empty()
    }
}

/// A calendar-day bucket of images, newest image first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateGroup {
    pub date_key: NaiveDate,
    pub display_label: String,
    pub images: Vec<LoadedImage>,
}

/// What the viewer currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Unset,
    All,
    Date(NaiveDate),
}

impl Selection {
    pub fn as_key(&self) -> Option<String> {
        match self {
            Selection::Unset => None,
            Selection::All => Some(ALL_KEY.to_string()),
            Selection::Date(date) => Some(date.to_string()),
        }
    }
}

/// A selection request: the sentinel "all" or one group's date key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    All,
    Date(NaiveDate),
}

impl GroupKey {
    pub fn parse(raw: &str) -> Result<Self, ViewerError> {
        if raw.eq_ignore_ascii_case(ALL_KEY) {
            return Ok(GroupKey::All);
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(GroupKey::Date)
            .map_err(|_| ViewerError::InvalidGroupKey(raw.to_string()))
    }
}

impl From<GroupKey> for Selection {
    fn from(key: GroupKey) -> Self {
        match key {
            GroupKey::All => Selection::All,
            GroupKey::Date(date) => Selection::Date(date),
        }
    }
}

/// Content batch lifecycle. `Fetching` covers every overlapping batch; the
/// state settles only when the last one finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchState {
    #[default]
    Idle,
    Fetching,
    Done,
    PartialFailure,
}

/// Date-selector entry in the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSummary {
    pub date_key: NaiveDate,
    pub display_label: String,
    pub image_count: usize,
}

/// Everything the presentation layer reads in one consistent view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GallerySnapshot {
    pub identifier: String,
    pub loading: bool,
    pub error: Option<String>,
    pub total_images: u64,
    pub groups: Vec<GroupSummary>,
    pub selection: Option<String>,
    pub selected_label: Option<String>,
    pub loading_images: bool,
    pub batch: BatchState,
}
