// Viewer module - gallery session controller and its HTTP surface
mod core;
mod error;
mod grouping;
mod handlers;
mod types;

pub use self::core::{GalleryViewer, SharedViewer};
pub use error::ViewerError;
pub use grouping::{group_by_date, local_date_key, parse_timestamp};
pub use handlers::{
    gallery_images_handler, gallery_snapshot_handler, image_content_handler, search_handler,
    select_group_handler,
};
pub use types::*;
