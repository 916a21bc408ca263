use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::types::FacetSnapshot;
use crate::backend::{DashboardApi, FacetKind};

/// Loads the filter-panel suggestion lists.
///
/// Each activation fires one independent fetch per [`FacetKind`]. A fetch
/// only ever writes its own slot; a failed fetch leaves its slot as it was.
/// Results belonging to an earlier activation, or arriving after
/// [`FacetLoader::deactivate`], are dropped.
pub struct FacetLoader<A> {
    api: Arc<A>,
    limit: usize,
    tx: Arc<watch::Sender<FacetSnapshot>>,
    activation: Arc<AtomicU64>,
}

impl<A: DashboardApi> FacetLoader<A> {
    pub fn new(api: Arc<A>, limit: usize) -> Self {
        let (tx, _) = watch::channel(FacetSnapshot::default());
        Self {
            api,
            limit,
            tx: Arc::new(tx),
            activation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Start (or restart) all fetches from scratch. Must run inside a tokio runtime.
    pub fn activate(&self) {
        let activation = self.activation.fetch_add(1, Ordering::SeqCst) + 1;

        self.tx.send_replace(FacetSnapshot {
            pending: FacetKind::ALL.into_iter().collect(),
            ..FacetSnapshot::default()
        });

        info!(
            event = "core.facets.activate_started",
            activation = activation,
            limit = self.limit
        );

        for kind in FacetKind::ALL {
            self.spawn_fetch(kind, activation);
        }
    }

    /// Retire the current activation. Lists already loaded stay; slots still
    /// loading are marked settled since their results will be dropped.
    pub fn deactivate(&self) {
        let retired = self.activation.fetch_add(1, Ordering::SeqCst);
        let abandoned = self.tx.send_if_modified(|snapshot| {
            let had_pending = !snapshot.pending.is_empty();
            snapshot.pending.clear();
            had_pending
        });
        debug!(
            event = "core.facets.deactivated",
            activation = retired,
            abandoned = abandoned
        );
    }

    pub fn snapshot(&self) -> FacetSnapshot {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FacetSnapshot> {
        self.tx.subscribe()
    }

    fn spawn_fetch(&self, kind: FacetKind, activation: u64) {
        let api = Arc::clone(&self.api);
        let tx = Arc::clone(&self.tx);
        let current = Arc::clone(&self.activation);
        let limit = self.limit;

        tokio::spawn(async move {
            debug!(event = "core.facets.fetch_started", kind = %kind);
            let outcome = api.get_facet_suggestions(kind).await;

            let applied = tx.send_if_modified(|snapshot| {
                if current.load(Ordering::SeqCst) != activation {
                    return false;
                }
                snapshot.pending.remove(&kind);
                if let Ok(suggestions) = &outcome {
                    snapshot.lists.set(kind, suggestions, limit);
                }
                true
            });

            match outcome {
                _ if !applied => {
                    debug!(event = "core.facets.fetch_superseded", kind = %kind);
                }
                Ok(suggestions) => info!(
                    event = "core.facets.fetch_completed",
                    kind = %kind,
                    received = suggestions.len(),
                    kept = suggestions.len().min(limit)
                ),
                Err(e) => warn!(
                    event = "core.facets.fetch_failed",
                    kind = %kind,
                    error = %e
                ),
            }
        });
    }
}

impl<A> Drop for FacetLoader<A> {
    fn drop(&mut self) {
        self.activation.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::scripted::ScriptedBackend;
    use crate::backend::{BackendError, FacetSuggestion};
    use crate::facets::DEFAULT_FACET_LIMIT;

    fn suggestions(prefix: &str, n: usize) -> Vec<FacetSuggestion> {
        (0..n)
            .map(|i| FacetSuggestion::new(format!("{prefix}{i}")))
            .collect()
    }

    async fn settled(rx: &mut watch::Receiver<FacetSnapshot>) -> FacetSnapshot {
        rx.wait_for(|s| s.is_settled()).await.unwrap().clone()
    }

    #[tokio::test]
    async fn test_activate_fetches_every_facet_once() {
        let api = Arc::new(ScriptedBackend::new());
        let loader = FacetLoader::new(Arc::clone(&api), DEFAULT_FACET_LIMIT);

        loader.activate();
        api.facets.wait_for_calls(3).await;

        assert_eq!(api.facets.count(), 3);
        for kind in FacetKind::ALL {
            api.facet_call(kind);
        }
        assert_eq!(loader.snapshot().pending.len(), 3);
    }

    #[tokio::test]
    async fn test_lists_are_capped_at_limit() {
        let api = Arc::new(ScriptedBackend::new());
        let loader = FacetLoader::new(Arc::clone(&api), DEFAULT_FACET_LIMIT);
        let mut rx = loader.subscribe();

        loader.activate();
        api.facets.wait_for_calls(3).await;
        api.facets
            .resolve(api.facet_call(FacetKind::Tags), Ok(suggestions("t", 20)));
        api.facets
            .resolve(api.facet_call(FacetKind::Labels), Ok(suggestions("l", 3)));
        api.facets
            .resolve(api.facet_call(FacetKind::Features), Ok(suggestions("f", 8)));

        let snapshot = settled(&mut rx).await;
        assert_eq!(snapshot.lists.tags.len(), 8);
        assert_eq!(snapshot.lists.tags[0].name, "t0");
        assert_eq!(snapshot.lists.labels, vec!["l0", "l1", "l2"]);
        assert_eq!(snapshot.lists.features.len(), 8);
    }

    #[tokio::test]
    async fn test_failure_leaves_only_its_own_slot_empty() {
        let api = Arc::new(ScriptedBackend::new());
        let loader = FacetLoader::new(Arc::clone(&api), DEFAULT_FACET_LIMIT);
        let mut rx = loader.subscribe();

        loader.activate();
        api.facets.wait_for_calls(3).await;
        api.facets.resolve(
            api.facet_call(FacetKind::Labels),
            Err(BackendError::Unavailable {
                message: "labels endpoint down".to_string(),
            }),
        );
        api.facets
            .resolve(api.facet_call(FacetKind::Tags), Ok(suggestions("t", 2)));
        api.facets
            .resolve(api.facet_call(FacetKind::Features), Ok(suggestions("f", 1)));

        let snapshot = settled(&mut rx).await;
        assert_eq!(snapshot.lists.tags.len(), 2);
        assert!(snapshot.lists.labels.is_empty());
        assert_eq!(snapshot.lists.features, vec!["f0"]);
    }

    #[tokio::test]
    async fn test_each_completion_is_published_independently() {
        let api = Arc::new(ScriptedBackend::new());
        let loader = FacetLoader::new(Arc::clone(&api), DEFAULT_FACET_LIMIT);
        let mut rx = loader.subscribe();

        loader.activate();
        api.facets.wait_for_calls(3).await;
        api.facets
            .resolve(api.facet_call(FacetKind::Features), Ok(suggestions("f", 2)));

        let partial = rx
            .wait_for(|s| !s.pending.contains(&FacetKind::Features))
            .await
            .unwrap()
            .clone();
        assert_eq!(partial.lists.features.len(), 2);
        assert!(partial.lists.tags.is_empty());
        assert!(partial.pending.contains(&FacetKind::Tags));
        assert!(partial.pending.contains(&FacetKind::Labels));
    }

    #[tokio::test]
    async fn test_reactivation_ignores_previous_results() {
        let api = Arc::new(ScriptedBackend::new());
        let loader = FacetLoader::new(Arc::clone(&api), DEFAULT_FACET_LIMIT);
        let mut rx = loader.subscribe();

        loader.activate();
        api.facets.wait_for_calls(3).await;
        loader.activate();
        api.facets.wait_for_calls(6).await;

        // Answer the second activation first, then the stale first one.
        for index in 3..6 {
            api.facets.resolve(index, Ok(suggestions("new", 1)));
        }
        let snapshot = settled(&mut rx).await;
        for index in 0..3 {
            api.facets.resolve(index, Ok(suggestions("old", 5)));
        }
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }

        assert_eq!(loader.snapshot(), snapshot);
        assert_eq!(snapshot.lists.tags, suggestions("new", 1));
    }

    #[tokio::test]
    async fn test_results_after_deactivate_are_ignored() {
        let api = Arc::new(ScriptedBackend::new());
        let loader = FacetLoader::new(Arc::clone(&api), DEFAULT_FACET_LIMIT);

        loader.activate();
        api.facets.wait_for_calls(3).await;
        loader.deactivate();
        let before = loader.snapshot();

        for index in 0..3 {
            api.facets.resolve(index, Ok(suggestions("late", 4)));
        }
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }

        assert_eq!(loader.snapshot(), before);
        assert!(before.lists.tags.is_empty());
    }

    #[tokio::test]
    async fn test_deactivate_settles_pending_slots() {
        let api = Arc::new(ScriptedBackend::new());
        let loader = FacetLoader::new(Arc::clone(&api), DEFAULT_FACET_LIMIT);
        let mut rx = loader.subscribe();

        loader.activate();
        api.facets.wait_for_calls(3).await;
        api.facets
            .resolve(api.facet_call(FacetKind::Tags), Ok(suggestions("t", 2)));
        rx.wait_for(|s| !s.pending.contains(&FacetKind::Tags))
            .await
            .unwrap();

        loader.deactivate();
        let snapshot = settled(&mut rx).await;
        assert!(snapshot.pending.is_empty());
        assert_eq!(snapshot.lists.tags.len(), 2);
        assert!(snapshot.lists.labels.is_empty());
    }
}
