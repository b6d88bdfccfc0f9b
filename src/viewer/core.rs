use super::{
    ALL_IMAGES_LABEL, BatchState, DateGroup, GallerySnapshot, GroupKey, GroupSummary,
    ImageDescriptor, LoadedImage, Selection, ViewerError,
    grouping::{group_by_date, parse_timestamp},
};
use crate::provider::{ContentProvider, ImageEntry, MetadataProvider};
use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

pub type SharedViewer = Arc<GalleryViewer>;

/// Gallery session controller. Owns the state of one customer lookup at a
/// time: the descriptor groups, the content cache, the current selection
/// and the batch flags. A new search discards everything from the previous
/// one.
pub struct GalleryViewer {
    metadata: Arc<dyn MetadataProvider>,
    content: Arc<dyn ContentProvider>,
    locale: chrono::Locale,
    session: Arc<RwLock<Session>>,
}

#[derive(Default)]
pub(crate) struct Session {
    // Bumped on every search. Batches carry the generation they started
    // under and stop writing once it moves on, so a superseded batch can
    // never touch the next session's cache or flags.
    generation: u64,
    identifier: String,
    loading: bool,
    error: Option<String>,
    total_images: u64,
    groups: Vec<DateGroup>,
    selection: Selection,
    // Loaded entries only; a path present here always has content.
    cache: HashMap<String, LoadedImage>,
    // Per-path claims taken by running batches. At most one fetch is ever
    // active per path, even when selection changes spawn overlapping
    // batches.
    in_flight: HashSet<String>,
    batch: BatchState,
    active_batches: usize,
    batch_failures: usize,
}

impl Session {
    fn reset(&mut self, identifier: &str) {
        self.generation += 1;
        self.identifier = identifier.to_string();
        self.loading = true;
        self.error = None;
        self.total_images = 0;
        self.groups.clear();
        self.selection = Selection::Unset;
        self.cache = HashMap::new();
        self.in_flight.clear();
        self.batch = BatchState::Idle;
        self.active_batches = 0;
        self.batch_failures = 0;
    }

    fn begin_batch(&mut self) {
        if self.active_batches == 0 {
            self.batch_failures = 0;
        }
        self.active_batches += 1;
        self.batch = BatchState::Fetching;
    }

    fn finish_batch(&mut self, failed: usize) {
        self.batch_failures += failed;
        self.active_batches = self.active_batches.saturating_sub(1);
        if self.active_batches == 0 {
            self.batch = if self.batch_failures > 0 {
                BatchState::PartialFailure
            } else {
                BatchState::Done
            };
        }
    }

    fn snapshot(&self) -> GallerySnapshot {
        let selected_label = match self.selection {
            Selection::Unset => None,
            Selection::All => Some(ALL_IMAGES_LABEL.to_string()),
            Selection::Date(date) => self
                .groups
                .iter()
                .find(|group| group.date_key == date)
                .map(|group| group.display_label.clone()),
        };

        GallerySnapshot {
            identifier: self.identifier.clone(),
            loading: self.loading,
            error: self.error.clone(),
            total_images: self.total_images,
            groups: self
                .groups
                .iter()
                .map(|group| GroupSummary {
                    date_key: group.date_key,
                    display_label: group.display_label.clone(),
                    image_count: group.images.len(),
                })
                .collect(),
            selection: self.selection.as_key(),
            selected_label,
            loading_images: self.active_batches > 0,
            batch: self.batch,
        }
    }
}

impl GalleryViewer {
    pub fn new(
        config: crate::ViewerConfig,
        metadata: Arc<dyn MetadataProvider>,
        content: Arc<dyn ContentProvider>,
    ) -> Self {
        let locale = match chrono::Locale::try_from(config.locale.as_str()) {
            Ok(locale) => locale,
            Err(_) => {
                warn!(
                    "Unknown display locale '{}', falling back to POSIX date labels",
                    config.locale
                );
                chrono::Locale::POSIX
            }
        };

        Self {
            metadata,
            content,
            locale,
            session: Arc::new(RwLock::new(Session::default())),
        }
    }

    /// Starts a new lookup session for `hn`. All state of the previous
    /// session is discarded first. Provider failures become the session's
    /// error state, not a Rust error; only an empty identifier is rejected
    /// outright.
    pub async fn search(&self, hn: &str) -> Result<GallerySnapshot, ViewerError> {
        let hn = hn.trim();
        if hn.is_empty() {
            return Err(ViewerError::EmptyIdentifier);
        }

        let generation = {
            let mut session = self.session.write().await;
            session.reset(hn);
            session.generation
        };

        info!("Fetching image list for customer {}", hn);
        let result = self.metadata.list_images(hn).await;

        let initial_key = {
            let mut session = self.session.write().await;
            if session.generation != generation {
                // A newer search owns the session now.
                return Ok(session.snapshot());
            }

            match result {
                Ok(list) => {
                    let descriptors = parse_entries(&list.images);
                    let placeholders: Vec<LoadedImage> =
                        descriptors.iter().map(LoadedImage::placeholder).collect();

                    session.total_images = list.total_images;
                    session.groups = group_by_date(&placeholders, self.locale);
                    session.selection = match session.groups.first() {
                        Some(newest) => Selection::Date(newest.date_key),
                        None => Selection::All,
                    };
                    session.loading = false;

                    info!(
                        "Found {} images for customer {} across {} days",
                        placeholders.len(),
                        hn,
                        session.groups.len()
                    );

                    match session.selection {
                        Selection::Date(date) => Some(GroupKey::Date(date)),
                        _ => None,
                    }
                }
                Err(e) => {
                    error!("Image list fetch failed for customer {}: {}", hn, e);
                    session.error = Some("Could not retrieve images for this customer".to_string());
                    session.loading = false;
                    None
                }
            }
        };

        if let Some(key) = initial_key {
            self.spawn_batch(generation, key);
        }

        Ok(self.snapshot().await)
    }

    /// Changes the displayed group and kicks off content loading for it in
    /// the background. Never blocks on the fetches; a batch already running
    /// for a previous selection keeps writing into the cache.
    pub async fn select_group(&self, key: GroupKey) -> Result<GallerySnapshot, ViewerError> {
        let generation = {
            let mut session = self.session.write().await;
            if let GroupKey::Date(date) = key
                && !session.groups.iter().any(|group| group.date_key == date)
            {
                return Err(ViewerError::UnknownGroup(date.to_string()));
            }
            session.selection = key.into();
            session.generation
        };

        self.spawn_batch(generation, key);
        Ok(self.snapshot().await)
    }

    /// Fetches content for every not-yet-loaded image in scope and waits
    /// for the batch to finish. `select_group` runs the spawned form of
    /// this.
    pub async fn load_group(&self, key: GroupKey) {
        let generation = self.session.read().await.generation;
        run_batch(
            Arc::clone(&self.content),
            Arc::clone(&self.session),
            generation,
            key,
        )
        .await;
    }

    fn spawn_batch(&self, generation: u64, key: GroupKey) {
        let content = Arc::clone(&self.content);
        let session = Arc::clone(&self.session);
        tokio::spawn(async move {
            run_batch(content, session, generation, key).await;
        });
    }

    /// The currently displayed set: all cached images for the "all"
    /// selection, the selected group's images (cached entry where loaded,
    /// placeholder otherwise) for a date selection, empty before the first
    /// search.
    pub async fn displayed_images(&self) -> Vec<LoadedImage> {
        let session = self.session.read().await;

        match session.selection {
            Selection::Unset => Vec::new(),
            Selection::All => session.cache.values().cloned().collect(),
            Selection::Date(date) => {
                let Some(group) = session.groups.iter().find(|group| group.date_key == date)
                else {
                    return Vec::new();
                };
                group
                    .images
                    .iter()
                    .map(|image| {
                        session
                            .cache
                            .get(&image.storage_path)
                            .cloned()
                            .unwrap_or_else(|| image.clone())
                    })
                    .collect()
            }
        }
    }

    /// The loaded payload for one path, if its fetch has completed.
    pub async fn cached_content(&self, storage_path: &str) -> Option<(String, String)> {
        let session = self.session.read().await;
        session
            .cache
            .get(storage_path)
            .map(|image| (image.encoded_content.clone(), image.media_type.clone()))
    }

    pub async fn snapshot(&self) -> GallerySnapshot {
        self.session.read().await.snapshot()
    }
}

async fn run_batch(
    content: Arc<dyn ContentProvider>,
    session: Arc<RwLock<Session>>,
    generation: u64,
    key: GroupKey,
) {
    let pending = {
        let mut session = session.write().await;
        if session.generation != generation {
            return;
        }

        let scope: Vec<LoadedImage> = match key {
            GroupKey::All => session
                .groups
                .iter()
                .flat_map(|group| group.images.iter().cloned())
                .collect(),
            GroupKey::Date(date) => session
                .groups
                .iter()
                .find(|group| group.date_key == date)
                .map(|group| group.images.clone())
                .unwrap_or_default(),
        };

        let mut pending = Vec::new();
        for image in scope {
            if session.cache.contains_key(&image.storage_path)
                || session.in_flight.contains(&image.storage_path)
            {
                continue;
            }
            session.in_flight.insert(image.storage_path.clone());
            pending.push(image);
        }

        // Everything in scope is cached or claimed: nothing to do, and the
        // batch flags stay untouched.
        if pending.is_empty() {
            return;
        }

        session.begin_batch();
        pending
    };

    debug!("Loading {} images", pending.len());

    // Strictly sequential: one request to the content provider at a time.
    // A failed path is logged and skipped; the rest of the batch continues.
    let mut failed = 0usize;
    for placeholder in pending {
        let fetched = content.fetch_content(&placeholder.storage_path).await;

        let mut session = session.write().await;
        if session.generation != generation {
            return;
        }
        session.in_flight.remove(&placeholder.storage_path);

        match fetched {
            Ok(body) => {
                session.cache.insert(
                    placeholder.storage_path.clone(),
                    LoadedImage {
                        encoded_content: body.base64,
                        media_type: body.mime_type,
                        ..placeholder
                    },
                );
            }
            Err(e) => {
                failed += 1;
                warn!(
                    "Failed to load image {} ({}): {}",
                    placeholder.storage_path, placeholder.filename, e
                );
            }
        }
    }

    let mut session = session.write().await;
    if session.generation != generation {
        return;
    }
    session.finish_batch(failed);
}

/// Parses wire entries into descriptors. An entry whose timestamp does not
/// parse is dropped with a warning rather than failing the whole list.
fn parse_entries(entries: &[ImageEntry]) -> Vec<ImageDescriptor> {
    let mut descriptors = Vec::with_capacity(entries.len());
    for entry in entries {
        match parse_timestamp(&entry.dates.created_time) {
            Ok(created_time) => descriptors.push(ImageDescriptor {
                filename: entry.filename.clone(),
                storage_path: entry.full_path.clone(),
                size_bytes: entry.size,
                created_time,
            }),
            Err(e) => {
                warn!(
                    "Skipping image {} with unparseable created_time '{}': {}",
                    entry.full_path, entry.dates.created_time, e
                );
            }
        }
    }
    descriptors
}
