use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::ErrorPayload;
use crate::models::CategoriesDocument;

/// Registration key for [`EventBus::on`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    LoadStart,
    CategoriesReady,
    VideosLoadStart,
    VideosReady,
    SearchIndexReady,
    LoadError,
}

impl EventKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LoadStart => "load-start",
            Self::CategoriesReady => "categories-ready",
            Self::VideosLoadStart => "videos-load-start",
            Self::VideosReady => "videos-ready",
            Self::SearchIndexReady => "search-index-ready",
            Self::LoadError => "load-error",
        }
    }
}

/// Lifecycle notification emitted by the staged loader.
#[derive(Debug, Clone)]
pub enum CatalogEvent {
    LoadStart,
    CategoriesReady {
        categories: Arc<CategoriesDocument>,
    },
    VideosLoadStart,
    VideosReady {
        count: usize,
        explicit_order: bool,
    },
    SearchIndexReady {
        term_count: usize,
    },
    LoadError {
        payload: ErrorPayload,
    },
}

impl CatalogEvent {
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::LoadStart => EventKind::LoadStart,
            Self::CategoriesReady { .. } => EventKind::CategoriesReady,
            Self::VideosLoadStart => EventKind::VideosLoadStart,
            Self::VideosReady { .. } => EventKind::VideosReady,
            Self::SearchIndexReady { .. } => EventKind::SearchIndexReady,
            Self::LoadError { .. } => EventKind::LoadError,
        }
    }
}

type Subscriber = Arc<dyn Fn(&CatalogEvent) + Send + Sync>;

/// Engine-owned observer channel: callbacks registered per event kind,
/// delivered synchronously to every subscriber current at emit time. No
/// global dispatch target.
#[derive(Default)]
pub struct EventBus {
    subscribers: Mutex<HashMap<EventKind, Vec<Subscriber>>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus").finish_non_exhaustive()
    }
}

impl EventBus {
    pub fn on(&self, kind: EventKind, callback: impl Fn(&CatalogEvent) + Send + Sync + 'static) {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        subscribers.entry(kind).or_default().push(Arc::new(callback));
    }

    /// Delivery happens outside the registry lock so a subscriber may
    /// register further callbacks without deadlocking.
    pub fn emit(&self, event: &CatalogEvent) {
        let current: Vec<Subscriber> = {
            let subscribers = self
                .subscribers
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            subscribers
                .get(&event.kind())
                .map(|list| list.to_vec())
                .unwrap_or_default()
        };
        for subscriber in current {
            subscriber(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn subscriber_receives_only_its_kind() {
        let bus = EventBus::default();
        let videos_ready = Arc::new(AtomicUsize::new(0));
        let seen = videos_ready.clone();
        bus.on(EventKind::VideosReady, move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        bus.emit(&CatalogEvent::LoadStart);
        bus.emit(&CatalogEvent::VideosReady {
            count: 3,
            explicit_order: true,
        });

        assert_eq!(videos_ready.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn all_current_subscribers_are_notified() {
        let bus = EventBus::default();
        let hits = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            let hits = hits.clone();
            bus.on(EventKind::LoadStart, move |_| {
                hits.fetch_add(1, Ordering::SeqCst);
            });
        }
        bus.emit(&CatalogEvent::LoadStart);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn subscriber_may_register_another_during_delivery() {
        let bus = Arc::new(EventBus::default());
        let inner = bus.clone();
        bus.on(EventKind::SearchIndexReady, move |_| {
            inner.on(EventKind::LoadError, |_| {});
        });
        bus.emit(&CatalogEvent::SearchIndexReady { term_count: 42 });
    }

    #[test]
    fn event_kind_names_match_the_wire_vocabulary() {
        assert_eq!(EventKind::CategoriesReady.as_str(), "categories-ready");
        assert_eq!(EventKind::LoadError.as_str(), "load-error");
    }
}
