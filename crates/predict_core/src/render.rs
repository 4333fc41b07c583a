use predict_logging::{predict_debug, predict_warn};
use thiserror::Error;

use crate::catalog::DomainCatalog;
use crate::fragment::RenderFragment;
use crate::parse::{parse_job_listings, parse_table};
use crate::response::{JobListing, PredictionResponse};

pub const NO_DATA: &str = "No prediction data available.";
pub const NO_LISTINGS: &str = "No job listings found.";
const SKILLS_HEADING: &str = "Most Demand Skills:";
const BEST_MATCH_HEADING: &str = "Best match:";

/// Network or backend level failure of a prediction fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FetchFailure {
    pub message: String,
}

impl FetchFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type FetchResult = Result<PredictionResponse, FetchFailure>;

/// Turns a settled fetch into display fragments.
///
/// A failure yields exactly one error note. Otherwise primary content comes
/// first (listing cards, a table or text, or an informative empty state),
/// followed by the image reference when the response names one.
pub fn render(
    catalog: &DomainCatalog,
    domain: &str,
    query: &str,
    result: &FetchResult,
) -> Vec<RenderFragment> {
    let response = match result {
        Ok(response) => response,
        Err(failure) => {
            return vec![RenderFragment::error(format!(
                "Error fetching prediction: {failure}"
            ))]
        }
    };

    if !catalog.contains(domain, query) {
        predict_warn!(
            "rendering response for unknown pair domain={:?} query={:?}",
            domain,
            query
        );
    }

    let mut fragments = if catalog.is_listing(domain) {
        render_listings(response)
    } else {
        render_prose(catalog, domain, query, response)
    };

    if let Some(path) = response.image() {
        fragments.push(RenderFragment::ImageRef {
            path: path.to_string(),
            alt_text: format!("Prediction image for {query}"),
        });
    }
    fragments
}

fn render_listings(response: &PredictionResponse) -> Vec<RenderFragment> {
    let mut fragments = Vec::new();
    let mut cards = 0;

    if let Some(skills) = response.skills() {
        fragments.push(RenderFragment::text(skills_heading(skills)));
    }
    if let Some(job) = &response.specific_job {
        fragments.push(RenderFragment::text(BEST_MATCH_HEADING));
        fragments.push(RenderFragment::ListingCard(job.clone()));
    }

    if let Some(listings) = response.listings() {
        cards += push_cards(&mut fragments, listings.iter().cloned());
    } else if let Some(info) = response.info() {
        let blob = parse_job_listings(info);
        if blob.outcome.skipped() > 0 {
            predict_debug!(
                "skipped {} unusable listing records",
                blob.outcome.skipped()
            );
        }
        if let Some(heading) = blob.heading {
            fragments.push(RenderFragment::TextBlock(heading));
        }
        cards += push_cards(&mut fragments, blob.outcome.into_records());
    }

    if cards == 0 {
        fragments.push(RenderFragment::text(NO_LISTINGS));
    }
    fragments
}

fn push_cards(
    fragments: &mut Vec<RenderFragment>,
    listings: impl IntoIterator<Item = JobListing>,
) -> usize {
    let before = fragments.len();
    fragments.extend(listings.into_iter().map(RenderFragment::ListingCard));
    fragments.len() - before
}

fn skills_heading(skills: &str) -> String {
    if skills.starts_with(SKILLS_HEADING) {
        skills.to_string()
    } else {
        format!("{SKILLS_HEADING} {skills}")
    }
}

fn render_prose(
    catalog: &DomainCatalog,
    domain: &str,
    query: &str,
    response: &PredictionResponse,
) -> Vec<RenderFragment> {
    let Some(info) = response.info() else {
        return vec![RenderFragment::text(NO_DATA)];
    };

    if catalog.is_tabular(domain, query) {
        match parse_table(info) {
            Some(table) if !table.rows.is_empty() => {
                return vec![RenderFragment::Table {
                    rows: table.rows,
                    summary: table.summary,
                }];
            }
            _ => predict_debug!("query {:?} is tabular but has no rows, showing text", query),
        }
    }
    vec![RenderFragment::text(info)]
}
