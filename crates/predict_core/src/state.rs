use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::catalog::DomainCatalog;
use crate::fragment::{mark_image_failed, RenderFragment};
use crate::selection::{Selection, SelectionState};
use crate::view_model::AppViewModel;

pub type RequestId = u64;

/// The most recently settled prediction, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionView {
    pub request_id: RequestId,
    pub domain: String,
    pub query: String,
    pub fragments: Vec<RenderFragment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    selection: SelectionState,
    auth_token: Option<String>,
    next_request_id: RequestId,
    in_flight: BTreeMap<RequestId, Selection>,
    pending_images: BTreeSet<(RequestId, String)>,
    displayed: Option<PredictionView>,
    notice: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new(catalog: Arc<DomainCatalog>) -> Self {
        Self {
            selection: SelectionState::new(catalog),
            auth_token: None,
            next_request_id: 1,
            in_flight: BTreeMap::new(),
            pending_images: BTreeSet::new(),
            displayed: None,
            notice: None,
            dirty: false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        let catalog = self.selection.catalog();
        AppViewModel {
            domains: catalog.domains().map(ToOwned::to_owned).collect(),
            queries: self
                .selection
                .current_queries()
                .into_iter()
                .map(ToOwned::to_owned)
                .collect(),
            selection: self.selection.current().cloned(),
            in_flight: self.in_flight.len(),
            pending_images: self.pending_images.len(),
            result: self.displayed.clone(),
            notice: self.notice.clone(),
            dirty: self.dirty,
        }
    }

    pub fn catalog(&self) -> &DomainCatalog {
        self.selection.catalog()
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.current()
    }

    /// Returns whether the state changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn selection_mut(&mut self) -> &mut SelectionState {
        &mut self.selection
    }

    pub(crate) fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    pub(crate) fn set_auth_token(&mut self, token: Option<String>) {
        self.auth_token = token.filter(|t| !t.trim().is_empty());
    }

    pub(crate) fn set_notice(&mut self, notice: Option<String>) {
        self.notice = notice;
        self.dirty = true;
    }

    /// Registers a new in-flight request for `selection`.
    pub(crate) fn begin_request(&mut self, selection: Selection) -> RequestId {
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.in_flight.insert(request_id, selection);
        self.dirty = true;
        request_id
    }

    /// Forgets an in-flight request; false when it was not known.
    pub(crate) fn finish_request(&mut self, request_id: RequestId) -> bool {
        let known = self.in_flight.remove(&request_id).is_some();
        self.dirty = true;
        known
    }

    pub(crate) fn show(&mut self, prediction: PredictionView) {
        for fragment in &prediction.fragments {
            if let Some(path) = fragment.image_path() {
                self.pending_images
                    .insert((prediction.request_id, path.to_string()));
            }
        }
        self.displayed = Some(prediction);
        self.dirty = true;
    }

    pub(crate) fn image_settled(&mut self, request_id: RequestId, path: &str) {
        if self.pending_images.remove(&(request_id, path.to_string())) {
            self.dirty = true;
        }
    }

    /// Swaps the failed image for an error note if that response is still shown.
    pub(crate) fn fail_image(&mut self, request_id: RequestId, path: &str) -> bool {
        match self.displayed.as_mut() {
            Some(shown) if shown.request_id == request_id => {
                let replaced = mark_image_failed(&mut shown.fragments, path);
                if replaced {
                    self.dirty = true;
                }
                replaced
            }
            _ => false,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(DomainCatalog::builtin()))
    }
}
