use predict_logging::{predict_info, predict_warn};

use crate::render::render;
use crate::selection::Selection;
use crate::state::PredictionView;
use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::DomainSelected(domain) => {
            let selected = state.selection_mut().select_domain(&domain).cloned();
            match selected {
                Ok(selection) => {
                    state.set_notice(None);
                    vec![selection_changed(&state, selection)]
                }
                Err(err) => {
                    predict_warn!("domain selection rejected: {}", err);
                    state.set_notice(Some(err.to_string()));
                    Vec::new()
                }
            }
        }
        Msg::QuerySelected(query) => {
            let domain = state.selection().map(|s| s.domain.clone());
            match domain {
                Some(domain) => select_query(&mut state, &domain, &query),
                None => {
                    state.set_notice(Some("No domain is available to select from.".to_string()));
                    Vec::new()
                }
            }
        }
        Msg::SelectionSubmitted => match state.selection().cloned() {
            Some(selection) => {
                let bearer_token = state.auth_token().map(ToOwned::to_owned);
                let Selection { domain, query } = selection.clone();
                let request_id = state.begin_request(selection);
                predict_info!(
                    "prediction request {} domain={:?} query={:?}",
                    request_id,
                    domain,
                    query
                );
                vec![Effect::FetchPrediction {
                    request_id,
                    domain,
                    query,
                    bearer_token,
                }]
            }
            None => {
                state.set_notice(Some("Select a domain and query first.".to_string()));
                Vec::new()
            }
        },
        Msg::AuthTokenChanged(token) => {
            state.set_auth_token(token);
            Vec::new()
        }
        Msg::PredictionSettled {
            request_id,
            domain,
            query,
            result,
        } => {
            if !state.finish_request(request_id) {
                predict_warn!("prediction {} settled but was not in flight", request_id);
            }
            if let Err(failure) = &result {
                predict_warn!("prediction {} failed: {}", request_id, failure);
            }
            let fragments = render(state.catalog(), &domain, &query, &result);
            let effects: Vec<Effect> = fragments
                .iter()
                .filter_map(|fragment| fragment.image_path())
                .map(|path| Effect::LoadImage {
                    request_id,
                    path: path.to_string(),
                })
                .collect();
            state.show(PredictionView {
                request_id,
                domain,
                query,
                fragments,
            });
            effects
        }
        Msg::ImageLoaded { request_id, path } => {
            state.image_settled(request_id, &path);
            Vec::new()
        }
        Msg::ImageLoadFailed { request_id, path } => {
            state.image_settled(request_id, &path);
            if !state.fail_image(request_id, &path) {
                predict_info!(
                    "image {:?} of request {} failed after it was replaced",
                    path,
                    request_id
                );
            }
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// An unknown query falls back to the first query of the domain, with a notice.
fn select_query(state: &mut AppState, domain: &str, query: &str) -> Vec<Effect> {
    let selected = state.selection_mut().select(domain, query).map(|_| ());
    match selected {
        Ok(()) => {
            state.set_notice(None);
            Vec::new()
        }
        Err(err) => {
            predict_warn!("query selection rejected: {}", err);
            let fallback = state
                .selection_mut()
                .select_or_fallback(domain, query)
                .map(|s| s.query.clone());
            let notice = match fallback {
                Ok(first) => format!("{err}; using {first:?}"),
                Err(_) => err.to_string(),
            };
            state.set_notice(Some(notice));
            Vec::new()
        }
    }
}

fn selection_changed(state: &AppState, selection: Selection) -> Effect {
    let queries = state
        .catalog()
        .queries_for(&selection.domain)
        .into_iter()
        .map(ToOwned::to_owned)
        .collect();
    Effect::SelectionChanged { selection, queries }
}
