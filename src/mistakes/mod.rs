//! Mistake-book browsing
//!
//! Client-side paging state over the saved-problem collection: subject
//! tabs, page cursor, and a `has_more` flag inferred from full pages.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use tracing::warn;

use crate::api::{ApiClient, MistakeProblem};
use crate::error::ClientError;

pub const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone)]
struct PagerState {
    subject: String,
    problems: Vec<MistakeProblem>,
    page: u32,
    has_more: bool,
}

/// Paged view over the saved-problem collection
pub struct MistakeBook {
    api: Arc<ApiClient>,
    state: StdMutex<PagerState>,
    page_size: u32,
    loading: AtomicBool,
}

impl MistakeBook {
    pub fn new(api: Arc<ApiClient>, subject: impl Into<String>) -> Self {
        Self {
            api,
            state: StdMutex::new(PagerState {
                subject: subject.into(),
                problems: Vec::new(),
                page: 0,
                has_more: true,
            }),
            page_size: DEFAULT_PAGE_SIZE,
            loading: AtomicBool::new(false),
        }
    }

    pub fn subject(&self) -> String {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .subject
            .clone()
    }

    pub fn problems(&self) -> Vec<MistakeProblem> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .problems
            .clone()
    }

    pub fn has_more(&self) -> bool {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).has_more
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Drop the loaded pages and fetch the first one again
    pub async fn refresh(&self) -> Result<(), ClientError> {
        {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            state.problems.clear();
            state.page = 0;
            state.has_more = true;
        }
        self.load_next_page().await
    }

    /// Fetch the next page, if any. No-op while a load is in flight or
    /// when the collection is exhausted.
    pub async fn load_more(&self) -> Result<(), ClientError> {
        if !self.has_more() {
            return Ok(());
        }
        self.load_next_page().await
    }

    /// Switch subject tab and reload from the first page
    pub async fn switch_subject(&self, subject: impl Into<String>) -> Result<(), ClientError> {
        {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            state.subject = subject.into();
        }
        self.refresh().await
    }

    /// Remove a saved problem and drop it from the loaded list
    pub async fn remove(&self, entry_id: &str) -> Result<(), ClientError> {
        self.api.remove_mistake(entry_id).await?;

        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.problems.retain(|p| p.id != entry_id);
        Ok(())
    }

    async fn load_next_page(&self) -> Result<(), ClientError> {
        if self
            .loading
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Ok(()); // a load is already running
        }

        let (subject, page) = {
            let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            (state.subject.clone(), state.page + 1)
        };

        let result = self.api.list_mistakes(&subject, page, self.page_size).await;
        self.loading.store(false, Ordering::SeqCst);

        match result {
            Ok(batch) => {
                let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
                // A subject switch mid-flight discards the stale page
                if state.subject != subject {
                    return Ok(());
                }
                state.page = page;
                state.has_more = batch.problems.len() as u32 == self.page_size;
                state.problems.extend(batch.problems);
                Ok(())
            }
            Err(e) => {
                // The already-loaded list stays intact
                warn!("Failed to load mistake book page {}: {}", page, e);
                Err(e)
            }
        }
    }
}
