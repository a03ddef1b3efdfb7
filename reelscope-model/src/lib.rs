//! Core data model definitions shared across Reelscope crates.
#![allow(missing_docs)]

pub use ::chrono;

pub mod details;
pub mod error;
pub mod image;
pub mod language;
pub mod list;
pub mod media;
pub mod page;

// Intentionally curated re-exports for downstream consumers.
pub use details::{CastMember, GenreInfo, MediaDetail};
pub use error::{ModelError, Result as ModelResult};
pub use image::{
    BackdropSize, ImageSize, PLACEHOLDER_IMAGE, PosterSize, ProfileSize,
    image_url,
};
pub use language::{
    DEFAULT_LANGUAGE_CODE, Language, SUPPORTED_LANGUAGES, find_language,
};
pub use list::{ListName, TimeWindow, TrendingFilter};
pub use media::{MediaItem, MediaKind};
pub use page::{MAX_API_PAGE, PaginationPayload};
