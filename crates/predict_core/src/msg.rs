use crate::render::FetchResult;
use crate::state::RequestId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked a domain; the query list is re-populated.
    DomainSelected(String),
    /// User picked a query within the current domain.
    QuerySelected(String),
    /// User submitted the prediction form for the current selection.
    SelectionSubmitted,
    /// Authentication collaborator handed over (or revoked) a bearer token.
    AuthTokenChanged(Option<String>),
    /// A prediction fetch settled, successfully or not.
    PredictionSettled {
        request_id: RequestId,
        domain: String,
        query: String,
        result: FetchResult,
    },
    /// The display surface loaded an image fragment.
    ImageLoaded { request_id: RequestId, path: String },
    /// The display surface failed to load an image fragment.
    ImageLoadFailed { request_id: RequestId, path: String },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
