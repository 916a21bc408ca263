//! The resource list screen's controller.
//!
//! Ties the filter store, the list query engine and the facet loader
//! together for one activation. The three parts never talk to each other
//! directly: the engine follows the store's snapshots, and the facet loader
//! runs on its own.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use crate::backend::DashboardApi;
use crate::config::RunwatchConfig;
use crate::facets::{FacetLoader, FacetSnapshot};
use crate::filters::{Facet, FilterCriteria, FilterStateStore, is_filtered};
use crate::listing::{ListHandle, ListQueryEngine, ListView, NavigationRequest};

pub struct ListController<A> {
    store: FilterStateStore,
    list: ListHandle,
    facets: FacetLoader<A>,
}

impl<A: DashboardApi> ListController<A> {
    /// Start with the configured default criteria: issues the first list
    /// query and the three facet fetches. Must run inside a tokio runtime.
    pub fn activate(api: Arc<A>, config: &RunwatchConfig) -> Self {
        let store = FilterStateStore::new(config.default_criteria());
        let list = ListQueryEngine::spawn(
            Arc::clone(&api),
            store.defaults().clone(),
            store.subscribe(),
        );
        let facets = FacetLoader::new(api, config.facets.limit());
        facets.activate();

        info!(
            event = "core.controller.activated",
            page_size = store.defaults().page_size().get(),
            facet_limit = config.facets.limit()
        );

        Self {
            store,
            list,
            facets,
        }
    }

    pub fn set_search_text(&self, value: impl Into<String>) -> FilterCriteria {
        self.store.set_search_text(value)
    }

    pub fn toggle_facet_value(&self, facet: Facet, value: &str) -> FilterCriteria {
        self.store.toggle_facet_value(facet, value)
    }

    pub fn set_offset(&self, page: i64) -> FilterCriteria {
        self.store.set_offset(page)
    }

    pub fn reset(&self) -> FilterCriteria {
        self.store.reset()
    }

    pub fn criteria(&self) -> FilterCriteria {
        self.store.current()
    }

    pub fn is_filtered(&self) -> bool {
        is_filtered(&self.store.current(), self.store.defaults())
    }

    pub fn view(&self) -> ListView {
        self.list.view()
    }

    pub fn subscribe_list(&self) -> watch::Receiver<ListView> {
        self.list.subscribe()
    }

    pub fn facets(&self) -> FacetSnapshot {
        self.facets.snapshot()
    }

    pub fn subscribe_facets(&self) -> watch::Receiver<FacetSnapshot> {
        self.facets.subscribe()
    }

    /// Wait for the list to settle on the current criteria and for every
    /// facet fetch to finish.
    pub async fn settled(&self) -> (ListView, FacetSnapshot) {
        let view = self.list.settled_for(&self.store.current()).await;

        let mut rx = self.facets.subscribe();
        let facets = match rx.wait_for(FacetSnapshot::is_settled).await {
            Ok(snapshot) => snapshot.clone(),
            Err(_) => self.facets.snapshot(),
        };

        (view, facets)
    }

    pub fn select_row(&self, row_id: &str) -> Option<NavigationRequest> {
        self.list.select_row(row_id)
    }

    /// Tear down the engine and the facet loader. Nothing resolving later
    /// can change what subscribers see.
    pub fn deactivate(self) {
        self.facets.deactivate();
        info!(event = "core.controller.deactivated");
    }
}
