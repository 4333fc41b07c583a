use std::time::Duration;

use predict_core::{Effect, FetchFailure, Msg};
use predict_engine::{EngineEvent, EngineHandle, PredictionRequest};
use predict_logging::{predict_debug, predict_info, predict_warn};

/// Carries core effects out on the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn run(&self, effect: Effect) {
        match effect {
            Effect::FetchPrediction {
                request_id,
                domain,
                query,
                bearer_token,
            } => {
                predict_info!(
                    "FetchPrediction request_id={} authenticated={}",
                    request_id,
                    bearer_token.is_some()
                );
                self.engine.submit(PredictionRequest {
                    request_id,
                    domain,
                    query,
                    bearer_token,
                });
            }
            Effect::LoadImage { request_id, path } => {
                predict_debug!("LoadImage request_id={} path={}", request_id, path);
                self.engine.check_image(request_id, path);
            }
            Effect::SelectionChanged { selection, queries } => {
                predict_debug!(
                    "SelectionChanged domain={:?} queries={}",
                    selection.domain,
                    queries.len()
                );
            }
        }
    }

    pub fn try_recv(&self) -> Option<Msg> {
        self.engine.try_recv().map(event_to_msg)
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<Msg> {
        self.engine.recv_timeout(timeout).map(event_to_msg)
    }
}

pub fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::PredictionCompleted {
            request_id,
            domain,
            query,
            result,
        } => Msg::PredictionSettled {
            request_id,
            domain,
            query,
            result: result.map_err(|err| FetchFailure::new(err.to_string())),
        },
        EngineEvent::ImageChecked {
            request_id,
            path,
            result: Ok(()),
        } => Msg::ImageLoaded { request_id, path },
        EngineEvent::ImageChecked {
            request_id,
            path,
            result: Err(err),
        } => {
            predict_warn!("image {} of request {} failed: {}", path, request_id, err);
            Msg::ImageLoadFailed { request_id, path }
        }
    }
}
