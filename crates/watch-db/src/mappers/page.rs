//! Page model <-> entity mappers

use watch_core::entities::Page;
use watch_core::traits::PageWatchViewStats;
use watch_core::value_objects::{Namespace, PageId, PageIdentity};

use crate::models::{PageModel, PageWatchViewStatsModel};

/// Convert PageModel to Page entity
impl From<PageModel> for Page {
    fn from(model: PageModel) -> Self {
        Page {
            id: PageId::new(model.id),
            identity: PageIdentity::new(Namespace::new(model.namespace), model.title),
            is_redirect: model.is_redirect,
            view_count: model.view_count,
        }
    }
}

/// Convert PageWatchViewStatsModel to PageWatchViewStats
impl From<PageWatchViewStatsModel> for PageWatchViewStats {
    fn from(model: PageWatchViewStatsModel) -> Self {
        PageWatchViewStats {
            page_id: PageId::new(model.page_id),
            num_watches: model.num_watches,
            num_views: model.num_views,
        }
    }
}
