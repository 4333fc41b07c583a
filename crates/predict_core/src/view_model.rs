use crate::selection::Selection;
use crate::state::PredictionView;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub domains: Vec<String>,
    /// Queries of the selected domain, in catalog order.
    pub queries: Vec<String>,
    pub selection: Option<Selection>,
    pub in_flight: usize,
    pub pending_images: usize,
    pub result: Option<PredictionView>,
    pub notice: Option<String>,
    pub dirty: bool,
}

impl AppViewModel {
    /// Fetches and image loads that have not reported back yet.
    pub fn pending(&self) -> usize {
        self.in_flight + self.pending_images
    }
}
