//! Prediction engine: HTTP fetches of backend predictions and their images.
mod engine;
mod fetch;
mod types;

pub use engine::{EngineError, EngineHandle};
pub use fetch::{
    prediction_url, resolve_image_url, FetchSettings, PredictionFetcher, ReqwestFetcher,
    PREDICTIONS_PATH,
};
pub use types::{EngineEvent, FailureKind, FetchError, PredictionRequest, RequestId};
