use std::sync::Once;

use predict_core::{
    update, AppState, Effect, FetchFailure, Msg, PredictionResponse, RenderFragment, Selection,
    GAS_PRICES, IMAGE_LOAD_ERROR, JOB_MARKET, REAL_ESTATE,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(predict_logging::initialize_for_tests);
}

fn submit(state: AppState) -> (AppState, u64) {
    let (state, effects) = update(state, Msg::SelectionSubmitted);
    let request_id = effects
        .iter()
        .find_map(|effect| match effect {
            Effect::FetchPrediction { request_id, .. } => Some(*request_id),
            _ => None,
        })
        .expect("fetch effect");
    (state, request_id)
}

fn settle(
    state: AppState,
    request_id: u64,
    domain: &str,
    query: &str,
    info: &str,
) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::PredictionSettled {
            request_id,
            domain: domain.to_string(),
            query: query.to_string(),
            result: Ok(PredictionResponse {
                prediction_info: Some(info.to_string()),
                image_path: Some(format!("/static/{request_id}.png")),
                ..PredictionResponse::default()
            }),
        },
    )
}

#[test]
fn domain_change_repopulates_queries_and_notifies() {
    init_logging();
    let (mut state, effects) = update(
        AppState::default(),
        Msg::DomainSelected(GAS_PRICES.to_string()),
    );

    let view = state.view();
    assert_eq!(
        view.selection,
        Some(Selection {
            domain: GAS_PRICES.to_string(),
            query: "Gas Prices Query 1".to_string(),
        })
    );
    assert_eq!(
        view.queries,
        vec!["Gas Prices Query 1", "Gas Prices Query 2 Yearly Averages"]
    );
    assert_eq!(
        effects,
        vec![Effect::SelectionChanged {
            selection: view.selection.clone().unwrap(),
            queries: view.queries.clone(),
        }]
    );
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}

#[test]
fn unknown_domain_is_surfaced_and_selection_kept() {
    init_logging();
    let state = AppState::default();
    let before = state.view().selection;

    let (state, effects) = update(state, Msg::DomainSelected("Weather".to_string()));

    assert!(effects.is_empty());
    assert_eq!(state.view().selection, before);
    assert!(state.view().notice.unwrap().contains("Weather"));
}

#[test]
fn invalid_query_falls_back_to_first_query() {
    init_logging();
    let (state, _) = update(AppState::default(), Msg::DomainSelected(REAL_ESTATE.to_string()));
    let (state, _) = update(state, Msg::QuerySelected("Real Estate Query 2 New York".to_string()));
    assert_eq!(state.view().selection.unwrap().query, "Real Estate Query 2 New York");

    let (state, effects) = update(state, Msg::QuerySelected("Gas Prices Query 1".to_string()));

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.selection.unwrap().query, "Real Estate Query 1 Philadelphia");
    assert!(view.notice.unwrap().contains("Gas Prices Query 1"));
}

#[test]
fn submit_emits_fetch_with_bearer_token() {
    init_logging();
    let (state, _) = update(AppState::default(), Msg::DomainSelected(GAS_PRICES.to_string()));
    let (state, _) = update(state, Msg::AuthTokenChanged(Some("opaque-token".to_string())));

    let (state, effects) = update(state, Msg::SelectionSubmitted);

    assert_eq!(
        effects,
        vec![Effect::FetchPrediction {
            request_id: 1,
            domain: GAS_PRICES.to_string(),
            query: "Gas Prices Query 1".to_string(),
            bearer_token: Some("opaque-token".to_string()),
        }]
    );
    assert_eq!(state.view().in_flight, 1);
}

#[test]
fn settled_prediction_is_rendered_and_image_load_requested() {
    init_logging();
    let (state, _) = update(AppState::default(), Msg::DomainSelected(GAS_PRICES.to_string()));
    let (state, request_id) = submit(state);

    let (state, effects) = settle(
        state,
        request_id,
        GAS_PRICES,
        "Gas Prices Query 1",
        "Prices rise.",
    );

    assert_eq!(
        effects,
        vec![Effect::LoadImage {
            request_id,
            path: format!("/static/{request_id}.png"),
        }]
    );
    let view = state.view();
    assert_eq!(view.in_flight, 0);
    assert_eq!(view.pending_images, 1);
    let result = view.result.unwrap();
    assert_eq!(result.request_id, request_id);
    assert_eq!(result.fragments[0], RenderFragment::text("Prices rise."));

    let (state, _) = update(
        state,
        Msg::ImageLoaded {
            request_id,
            path: format!("/static/{request_id}.png"),
        },
    );
    assert_eq!(state.view().pending(), 0);
}

#[test]
fn fetch_failure_replaces_previous_result_with_error_note() {
    init_logging();
    let (state, first) = submit(AppState::default());
    let (state, _) = settle(
        state,
        first,
        JOB_MARKET,
        "Job Market Query 1 Software Engineering",
        "Job Title: A",
    );
    let (state, second) = submit(state);

    let (state, effects) = update(
        state,
        Msg::PredictionSettled {
            request_id: second,
            domain: JOB_MARKET.to_string(),
            query: "Job Market Query 1 Software Engineering".to_string(),
            result: Err(FetchFailure::new("network error")),
        },
    );

    assert!(effects.is_empty());
    let fragments = state.view().result.unwrap().fragments;
    assert_eq!(fragments.len(), 1);
    assert!(matches!(fragments[0], RenderFragment::ErrorNote(_)));
}

#[test]
fn overlapping_requests_last_settled_wins() {
    init_logging();
    let (state, _) = update(AppState::default(), Msg::DomainSelected(GAS_PRICES.to_string()));
    let (state, first) = submit(state);
    let (state, second) = submit(state);
    assert_ne!(first, second);
    assert_eq!(state.view().in_flight, 2);

    let (state, _) = settle(state, second, GAS_PRICES, "Gas Prices Query 1", "second");
    let (state, _) = settle(state, first, GAS_PRICES, "Gas Prices Query 1", "first");

    let view = state.view();
    assert_eq!(view.in_flight, 0);
    let result = view.result.unwrap();
    assert_eq!(result.request_id, first);
    assert_eq!(result.fragments[0], RenderFragment::text("first"));
}

#[test]
fn image_failure_mutates_displayed_result_only() {
    init_logging();
    let (state, _) = update(AppState::default(), Msg::DomainSelected(GAS_PRICES.to_string()));
    let (state, first) = submit(state);
    let (state, _) = settle(state, first, GAS_PRICES, "Gas Prices Query 1", "first");
    let (state, second) = submit(state);
    let (mut state, _) = settle(state, second, GAS_PRICES, "Gas Prices Query 1", "second");
    state.consume_dirty();

    // Stale failure for a response that is no longer shown.
    let (mut state, _) = update(
        state,
        Msg::ImageLoadFailed {
            request_id: first,
            path: format!("/static/{first}.png"),
        },
    );
    assert_eq!(
        state.view().result.unwrap().fragments[1].image_path(),
        Some(format!("/static/{second}.png").as_str())
    );
    assert!(state.consume_dirty());

    let (state, _) = update(
        state,
        Msg::ImageLoadFailed {
            request_id: second,
            path: format!("/static/{second}.png"),
        },
    );
    let view = state.view();
    assert_eq!(
        view.result.as_ref().unwrap().fragments,
        vec![
            RenderFragment::text("second"),
            RenderFragment::error(IMAGE_LOAD_ERROR),
        ]
    );
    assert_eq!(view.pending(), 0);
}
