//! Page table models

use sqlx::FromRow;

/// Database model for one `pages` row
#[derive(Debug, Clone, FromRow)]
pub struct PageModel {
    pub id: i64,
    pub namespace: i32,
    pub title: String,
    pub is_redirect: bool,
    pub view_count: i64,
}

/// Watch and view counts for one suggestion candidate page
#[derive(Debug, Clone, FromRow)]
pub struct PageWatchViewStatsModel {
    pub page_id: i64,
    pub num_watches: i64,
    pub num_views: i64,
}

/// One `page_links` row
#[derive(Debug, Clone, FromRow)]
pub struct LinkRowModel {
    pub from_page: i64,
    pub to_page: i64,
}
