use std::sync::Arc;
use std::time::Duration;

use predict_core::PredictionResponse;
use predict_engine::{
    EngineEvent, EngineHandle, FailureKind, FetchError, FetchSettings, PredictionFetcher,
    PredictionRequest,
};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct SlowFirst;

#[async_trait::async_trait]
impl PredictionFetcher for SlowFirst {
    async fn fetch_prediction(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, FetchError> {
        if request.request_id == 1 {
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        Ok(PredictionResponse {
            prediction_info: Some(format!("answer {}", request.request_id)),
            ..PredictionResponse::default()
        })
    }

    async fn check_image(&self, _path: &str) -> Result<(), FetchError> {
        Ok(())
    }
}

fn request(request_id: u64) -> PredictionRequest {
    PredictionRequest {
        request_id,
        domain: "RealEstate".to_string(),
        query: "Real Estate Query 2 New York".to_string(),
        bearer_token: None,
    }
}

fn collect(engine: &EngineHandle, count: usize) -> Vec<EngineEvent> {
    let mut events = Vec::new();
    while events.len() < count {
        match engine.recv_timeout(Duration::from_secs(5)) {
            Some(event) => events.push(event),
            None => break,
        }
    }
    events
}

#[test]
fn every_request_settles_once_in_completion_order() {
    let engine = EngineHandle::with_fetcher(Arc::new(SlowFirst)).unwrap();
    engine.submit(request(1));
    engine.submit(request(2));

    let ids: Vec<u64> = collect(&engine, 2)
        .into_iter()
        .map(|event| match event {
            EngineEvent::PredictionCompleted {
                request_id, result, ..
            } => {
                assert!(result.is_ok());
                request_id
            }
            other => panic!("unexpected event {other:?}"),
        })
        .collect();
    assert_eq!(ids, vec![2, 1]);
    assert!(engine.try_recv().is_none());
}

#[test]
fn image_checks_report_path_and_request() {
    let engine = EngineHandle::with_fetcher(Arc::new(SlowFirst)).unwrap();
    engine.check_image(4, "/static/a.png");

    let events = collect(&engine, 1);
    assert_eq!(
        events,
        vec![EngineEvent::ImageChecked {
            request_id: 4,
            path: "/static/a.png".to_string(),
            result: Ok(()),
        }]
    );
}

#[test]
fn reqwest_engine_reports_backend_failure() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let server = runtime.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/predictions"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "boom"})))
            .mount(&server)
            .await;
        server
    });

    let engine = EngineHandle::new(FetchSettings {
        base_url: server.uri(),
        ..FetchSettings::default()
    })
    .unwrap();
    engine.submit(request(9));

    let events = collect(&engine, 1);
    match events.as_slice() {
        [EngineEvent::PredictionCompleted {
            request_id: 9,
            result: Err(err),
            ..
        }] => assert_eq!(err.kind, FailureKind::HttpStatus(500)),
        other => panic!("unexpected events {other:?}"),
    }
}
