//! View-state controller shared by every entity page.
//!
//! One [`ListController`] backs one page. Each dispatch takes a request token
//! under the state lock; only the response carrying the latest token may write
//! state, so an older request that resolves late is dropped instead of
//! overwriting newer results.

use std::sync::Arc;

use shared::{
    domain::{Entity, EntityKind},
    protocol::PageRequest,
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, warn};

use crate::{api::EntityApi, error::FetchError, view::ViewState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Load,
    Search,
    Refresh,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Search => "search",
            Self::Refresh => "refresh",
        }
    }

    /// User-facing text shown in place of the table after a failure.
    pub fn failure_message(self, kind: EntityKind) -> String {
        format!(
            "Failed to {} {}. Please try again later.",
            self.name(),
            kind.plural()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Applied,
    Failed,
    /// A newer dispatch started before this one resolved.
    Superseded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Started {
        kind: EntityKind,
        operation: Operation,
        token: u64,
    },
    Applied {
        kind: EntityKind,
        token: u64,
    },
    Failed {
        kind: EntityKind,
        token: u64,
        message: String,
    },
    Superseded {
        kind: EntityKind,
        token: u64,
    },
}

struct ControllerState<E> {
    view: ViewState<E>,
    latest_token: u64,
}

pub struct ListController<E: Entity> {
    api: Arc<dyn EntityApi<E>>,
    page: PageRequest,
    inner: Mutex<ControllerState<E>>,
    events: broadcast::Sender<ViewEvent>,
}

impl<E: Entity> ListController<E> {
    pub fn new(api: Arc<dyn EntityApi<E>>) -> Self {
        Self::with_page(api, PageRequest::default())
    }

    pub fn with_page(api: Arc<dyn EntityApi<E>>, page: PageRequest) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            api,
            page,
            inner: Mutex::new(ControllerState {
                view: ViewState::default(),
                latest_token: 0,
            }),
            events,
        }
    }

    pub fn kind(&self) -> EntityKind {
        E::KIND
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ViewEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> ViewState<E> {
        self.inner.lock().await.view.clone()
    }

    pub async fn load_all(&self) -> DispatchOutcome {
        self.list(None).await
    }

    /// A blank term (after trimming) lists instead of searching.
    pub async fn search(&self, term: &str) -> DispatchOutcome {
        if term.trim().is_empty() {
            return self.list(Some(term)).await;
        }

        let token = self.begin(Operation::Search, Some(term)).await;
        let result = self.api.search(term, self.page).await;
        self.finish(token, Operation::Search, result, |view, response| {
            if !response.is_consistent() {
                warn!(
                    kind = %E::KIND,
                    count = response.count,
                    total_count = response.total_count,
                    results = response.results.len(),
                    "search response counts are inconsistent"
                );
            }
            view.items = response.results.clone();
            view.search_response = Some(response);
        })
        .await
    }

    async fn list(&self, term: Option<&str>) -> DispatchOutcome {
        let token = self.begin(Operation::Load, term).await;
        let result = self.api.fetch_list(self.page).await;
        self.finish(token, Operation::Load, result, |view, items| {
            view.items = items;
            view.search_response = None;
        })
        .await
    }

    pub async fn refresh(&self) -> DispatchOutcome {
        let token = self.begin(Operation::Refresh, None).await;
        let result = self.api.refresh().await;
        self.finish(token, Operation::Refresh, result, |view, items| {
            view.items = items;
            view.search_response = None;
        })
        .await
    }

    /// Takes the next token; a search term is stored in the same critical section.
    async fn begin(&self, operation: Operation, search_term: Option<&str>) -> u64 {
        let token = {
            let mut guard = self.inner.lock().await;
            if let Some(term) = search_term {
                guard.view.search_term = term.to_string();
            }
            guard.latest_token += 1;
            guard.view.loading = true;
            guard.view.error = None;
            guard.latest_token
        };
        debug!(kind = %E::KIND, operation = operation.name(), token, "dispatch");
        let _ = self.events.send(ViewEvent::Started {
            kind: E::KIND,
            operation,
            token,
        });
        token
    }

    async fn finish<T, F>(
        &self,
        token: u64,
        operation: Operation,
        result: Result<T, FetchError>,
        apply: F,
    ) -> DispatchOutcome
    where
        T: Send,
        F: FnOnce(&mut ViewState<E>, T) + Send,
    {
        let mut guard = self.inner.lock().await;
        if guard.latest_token != token {
            debug!(
                kind = %E::KIND,
                operation = operation.name(),
                token,
                latest = guard.latest_token,
                "discarding superseded response"
            );
            drop(guard);
            let _ = self.events.send(ViewEvent::Superseded {
                kind: E::KIND,
                token,
            });
            return DispatchOutcome::Superseded;
        }

        let (outcome, event) = match result {
            Ok(value) => {
                apply(&mut guard.view, value);
                guard.view.loading = false;
                (
                    DispatchOutcome::Applied,
                    ViewEvent::Applied {
                        kind: E::KIND,
                        token,
                    },
                )
            }
            Err(err) => {
                warn!(
                    kind = %E::KIND,
                    operation = operation.name(),
                    error = %err,
                    "request failed"
                );
                let message = operation.failure_message(E::KIND);
                guard.view.error = Some(message.clone());
                guard.view.loading = false;
                (
                    DispatchOutcome::Failed,
                    ViewEvent::Failed {
                        kind: E::KIND,
                        token,
                        message,
                    },
                )
            }
        };
        drop(guard);

        let _ = self.events.send(event);
        outcome
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
