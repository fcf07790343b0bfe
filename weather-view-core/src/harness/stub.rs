use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::provider::{Fetch, FetchResponse};

#[derive(Debug, Default)]
struct StubState {
    response: Option<FetchResponse>,
    calls: Vec<String>,
}

/// Stand-in for the network call: resolves with a canned body and status.
///
/// Clones share state, so the harness keeps one handle while the component owns
/// another. Nothing here ever touches the network.
#[derive(Debug, Clone, Default)]
pub struct StubFetch {
    state: Arc<Mutex<StubState>>,
}

impl StubFetch {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, StubState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Answer every call with `body` and `status` until [`restore`](Self::restore).
    pub fn resolves(&self, body: &serde_json::Value, status: u16) {
        let mut state = self.state();
        state.response = Some(FetchResponse::new(status, body.to_string()));
        state.calls.clear();
    }

    /// Remove the canned response and forget recorded calls.
    pub fn restore(&self) {
        let mut state = self.state();
        state.response = None;
        state.calls.clear();
    }

    pub fn called(&self) -> bool {
        !self.state().calls.is_empty()
    }

    pub fn call_count(&self) -> usize {
        self.state().calls.len()
    }

    pub fn first_call(&self) -> Option<String> {
        self.state().calls.first().cloned()
    }
}

#[async_trait]
impl Fetch for StubFetch {
    async fn fetch(&self, url: &str) -> Result<FetchResponse> {
        let mut state = self.state();
        state.calls.push(url.to_string());
        state
            .response
            .clone()
            .ok_or_else(|| anyhow!("fetch stub has no response installed"))
    }
}
