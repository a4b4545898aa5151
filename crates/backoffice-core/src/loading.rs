//! # Loading-State Fragment
//!
//! The loading / error / ready sub-state every remote-backed store embeds.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │            mark_loading()                 mark_loaded()                 │
//! │   Idle ────────────────────► Loading ─────────────────────► Ready       │
//! │                                 │                                       │
//! │                                 │ mark_error(msg)                       │
//! │                                 ▼                                       │
//! │                              Failed ──── mark_loading() ───► Loading    │
//! │                                                                         │
//! │   The same cycle repeats for every load and every create.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

/// Coarse status derived from a [`LoadingState`], for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    /// Nothing requested yet.
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Loading flag plus last error message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadingState {
    loading: bool,
    error: Option<String>,
    settled_once: bool,
}

impl LoadingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Not loading and no error.
    pub fn is_ready(&self) -> bool {
        !self.loading && self.error.is_none()
    }

    /// Starts a request: sets loading and clears any previous error.
    pub fn mark_loading(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Finishes a request successfully. An existing error is kept.
    pub fn mark_loaded(&mut self) {
        self.loading = false;
        self.settled_once = true;
    }

    /// Finishes a request with a failure message.
    pub fn mark_error(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
        self.settled_once = true;
    }

    /// Records a failure while another request is still pending. Loading
    /// is left as is.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn status(&self) -> LoadStatus {
        match (self.loading, &self.error, self.settled_once) {
            (true, _, _) => LoadStatus::Loading,
            (false, Some(_), _) => LoadStatus::Failed,
            (false, None, true) => LoadStatus::Ready,
            (false, None, false) => LoadStatus::Idle,
        }
    }
}
