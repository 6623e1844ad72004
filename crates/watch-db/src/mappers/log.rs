//! Revision and log-event model <-> entity mappers

use watch_core::entities::{LogEvent, Revision};
use watch_core::value_objects::{Namespace, PageId, PageIdentity, UserId};

use crate::models::{LogEventModel, RevisionModel};

/// Convert RevisionModel to Revision entity
impl From<RevisionModel> for Revision {
    fn from(model: RevisionModel) -> Self {
        Revision {
            id: model.id,
            page_id: PageId::new(model.page_id),
            timestamp: model.timestamp,
            actor: UserId::new(model.actor_id),
            comment: model.comment,
        }
    }
}

/// Convert LogEventModel to LogEvent entity
impl From<LogEventModel> for LogEvent {
    fn from(model: LogEventModel) -> Self {
        LogEvent {
            id: model.id,
            kind: model.kind,
            action: model.action,
            timestamp: model.timestamp,
            actor: UserId::new(model.actor_id),
            page: PageIdentity::new(Namespace::new(model.namespace), model.title),
            page_id: model.page_id.map(PageId::new),
            params: model.params,
            comment: model.comment,
        }
    }
}
