use std::fmt::Write as _;

use predict_core::{AppViewModel, JobListing, PredictionView, RenderFragment, Selection};

const INDENT: &str = "    ";

/// One status line plus the notice, if any.
pub fn render_status(view: &AppViewModel) -> String {
    let selection = match &view.selection {
        Some(Selection { domain, query }) => format!("{domain} / {query}"),
        None => "nothing selected".to_string(),
    };
    let mut out = format!("[{selection}]");
    if view.pending() > 0 {
        let _ = write!(
            out,
            " requests in flight: {}, images loading: {}",
            view.in_flight, view.pending_images
        );
    }
    if let Some(notice) = &view.notice {
        let _ = write!(out, "\n! {notice}");
    }
    out
}

pub fn render_catalog(view: &AppViewModel) -> String {
    let current = view.selection.as_ref();
    let mut out = String::from("Domains:\n");
    for (index, domain) in view.domains.iter().enumerate() {
        let marker = marker(current.is_some_and(|s| &s.domain == domain));
        let _ = writeln!(out, "{marker} {}. {domain}", index + 1);
    }
    out.push_str(&render_queries(
        current.map(|s| s.domain.as_str()).unwrap_or_default(),
        &view.queries,
        current.map(|s| s.query.as_str()),
    ));
    out
}

/// Query list shown after the domain changes.
pub fn render_queries(domain: &str, queries: &[String], selected: Option<&str>) -> String {
    let mut out = format!("Queries for {domain}:\n");
    for (index, query) in queries.iter().enumerate() {
        let marker = marker(selected == Some(query.as_str()));
        let _ = writeln!(out, "{marker} {}. {query}", index + 1);
    }
    out
}

fn marker(selected: bool) -> char {
    if selected {
        '*'
    } else {
        ' '
    }
}

pub fn render_result(result: &PredictionView, settled_at: &str) -> String {
    let mut out = format!(
        "=== #{} {} / {} ({settled_at}) ===\n",
        result.request_id, result.domain, result.query
    );
    for fragment in &result.fragments {
        out.push_str(&render_fragment(fragment));
        if !out.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}

pub fn render_fragment(fragment: &RenderFragment) -> String {
    match fragment {
        RenderFragment::TextBlock(text) => text.clone(),
        RenderFragment::Table { rows, summary } => render_table(rows, summary),
        RenderFragment::ImageRef { path, alt_text } => format!("[image] {alt_text}: {path}"),
        RenderFragment::ListingCard(listing) => render_card(listing),
        RenderFragment::ErrorNote(message) => format!("error: {message}"),
    }
}

fn render_table(rows: &[Vec<String>], summary: &str) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|col| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for row in rows {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join(" | ");
        let _ = writeln!(out, "{}", line.trim_end());
    }
    if !summary.is_empty() {
        out.push_str(summary);
        out.push('\n');
    }
    out
}

fn render_card(listing: &JobListing) -> String {
    let title = if listing.title.is_empty() {
        "(untitled)"
    } else {
        listing.title.as_str()
    };
    let mut out = format!("* {title}\n");
    for (label, value) in [
        ("Company", &listing.company),
        ("Location", &listing.location),
        ("Salary", &listing.salary),
        ("URL", &listing.url),
    ] {
        if !value.is_empty() {
            let _ = writeln!(out, "{INDENT}{label}: {value}");
        }
    }
    for line in listing.description.lines() {
        let _ = writeln!(out, "{INDENT}{}", line.trim_end());
    }
    out
}
