use crate::media::MediaItem;

/// Highest page number the catalog API will serve for any paginated endpoint.
pub const MAX_API_PAGE: u32 = 500;

/// One page of a paginated catalog response.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PaginationPayload {
    pub page: u32,
    /// Already clamped to [`MAX_API_PAGE`].
    pub total_pages: u32,
    pub total_results: u64,
    pub items: Vec<MediaItem>,
}

impl PaginationPayload {
    pub fn new(
        page: u32,
        total_pages: u32,
        total_results: u64,
        items: Vec<MediaItem>,
    ) -> Self {
        Self {
            page: page.max(1),
            total_pages: total_pages.min(MAX_API_PAGE),
            total_results,
            items,
        }
    }

    pub fn is_last_page(&self) -> bool {
        self.page >= self.total_pages
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
