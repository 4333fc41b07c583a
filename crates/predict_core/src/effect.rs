use crate::selection::Selection;
use crate::state::RequestId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// `GET` the prediction for a pair. Overlapping requests are allowed.
    FetchPrediction {
        request_id: RequestId,
        domain: String,
        query: String,
        bearer_token: Option<String>,
    },
    /// Domain changed: the dependent query list must be re-populated.
    SelectionChanged {
        selection: Selection,
        queries: Vec<String>,
    },
    /// Load the image of a rendered response and report back.
    LoadImage { request_id: RequestId, path: String },
}
