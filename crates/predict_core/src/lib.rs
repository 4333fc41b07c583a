//! Prediction core: domain catalog, selection state, response rendering and
//! the pure state machine driving the front end.
mod catalog;
mod effect;
mod fragment;
mod msg;
pub mod parse;
mod render;
mod response;
mod selection;
mod state;
mod update;
mod view_model;

pub use catalog::{
    CatalogError, DomainCatalog, DomainSpec, DomainStyle, QuerySpec, E_COMMERCE, GAS_PRICES,
    JOB_MARKET, REAL_ESTATE,
};
pub use effect::Effect;
pub use fragment::{mark_image_failed, RenderFragment, IMAGE_LOAD_ERROR};
pub use msg::Msg;
pub use render::{render, FetchFailure, FetchResult, NO_DATA, NO_LISTINGS};
pub use response::{JobListing, PredictionResponse};
pub use selection::{Selection, SelectionError, SelectionState};
pub use state::{AppState, PredictionView, RequestId};
pub use update::update;
pub use view_model::AppViewModel;
