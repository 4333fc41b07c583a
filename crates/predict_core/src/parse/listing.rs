use predict_logging::predict_debug;

use super::ParseOutcome;
use crate::response::JobListing;

pub const RECORD_DELIMITER: &str = "Job Title:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Url,
    Company,
    Location,
    Salary,
    Description,
}

const FIELD_KEYS: [(&str, Field); 5] = [
    ("URL:", Field::Url),
    ("Company:", Field::Company),
    ("Location:", Field::Location),
    ("Salary:", Field::Salary),
    ("Description:", Field::Description),
];

/// Job listings recovered from a text blob, plus any text before the first record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingBlob {
    /// Preamble such as a "Most Demand Skills: ..." summary.
    pub heading: Option<String>,
    pub outcome: ParseOutcome<JobListing>,
}

/// Splits a blob of `Job Title: ...` records into listings.
///
/// Fields may come in any order, separated by commas or line breaks. `Salary:`
/// closes the structured part: whatever follows it is the description, line
/// breaks included. Without a `Salary:`, free text after the last field becomes
/// the description. Records with nothing recognisable keep their title; only
/// records with neither title nor fields are skipped.
pub fn parse_job_listings(blob: &str) -> ListingBlob {
    let mut parts = blob.split(RECORD_DELIMITER);
    let preamble = parts.next().unwrap_or_default().trim();
    let heading = (!preamble.is_empty()).then(|| preamble.to_string());

    let mut records = Vec::new();
    let mut skipped = 0;
    for (index, segment) in parts.enumerate() {
        match parse_record(segment) {
            Some(listing) => {
                if listing.is_title_only() {
                    predict_debug!(
                        "listing record {} has no fields, keeping title {:?}",
                        index,
                        listing.title
                    );
                }
                records.push(listing);
            }
            None => {
                predict_debug!("listing record {} is empty, skipping", index);
                skipped += 1;
            }
        }
    }

    ListingBlob {
        heading,
        outcome: ParseOutcome::from_parts(records, skipped),
    }
}

fn parse_record(segment: &str) -> Option<JobListing> {
    let segment = segment.trim_start_matches([' ', '\t']);
    let (title_line, rest) = segment.split_once('\n').unwrap_or((segment, ""));
    let (title, inline_fields) = split_title(title_line);

    let mut listing = JobListing::titled(title);
    if !inline_fields.is_empty() {
        scan_fields(&mut listing, &format!("{inline_fields}\n{rest}"));
    } else {
        scan_fields(&mut listing, rest);
    }

    if listing.title.is_empty() && listing.is_title_only() {
        return None;
    }
    Some(listing)
}

/// Separates the title from fields that follow it on the same line
/// (`Title, URL: ..., Company: ...`).
fn split_title(line: &str) -> (&str, &str) {
    let cut = FIELD_KEYS
        .iter()
        .filter_map(|(key, _)| {
            line.match_indices(key)
                .map(|(idx, _)| idx)
                .find(|&idx| line[..idx].trim_end().ends_with(','))
        })
        .min();

    match cut {
        Some(idx) => (
            line[..idx].trim_end().trim_end_matches(',').trim(),
            &line[idx..],
        ),
        None => (line.trim(), ""),
    }
}

fn scan_fields(listing: &mut JobListing, body: &str) {
    let mut rest = body;
    loop {
        rest = rest.trim_start_matches(|c: char| c == ',' || c.is_whitespace());
        if rest.is_empty() {
            break;
        }
        match match_key(rest) {
            Some((Field::Salary, after_key)) => {
                let (value, remainder) = take_value(after_key);
                listing.salary = value.to_string();
                listing.description = description_from(remainder);
                break;
            }
            Some((Field::Description, after_key)) => {
                listing.description = after_key.trim().to_string();
                break;
            }
            Some((field, after_key)) => {
                let (value, remainder) = take_value(after_key);
                let slot = match field {
                    Field::Url => &mut listing.url,
                    Field::Company => &mut listing.company,
                    _ => &mut listing.location,
                };
                *slot = value.to_string();
                rest = remainder;
            }
            None => match next_key(rest) {
                Some(end) => {
                    predict_debug!("unrecognised listing segment {:?}", rest[..end].trim());
                    rest = &rest[end..];
                }
                None => {
                    // Nothing structured follows: the remainder is free text.
                    if listing.description.is_empty() {
                        listing.description = rest.trim().to_string();
                    }
                    break;
                }
            },
        }
    }
}

/// Offset of the first `,` or line break that is followed by a field key.
fn next_key(text: &str) -> Option<usize> {
    text.match_indices([',', '\n'])
        .map(|(idx, _)| idx)
        .find(|&idx| match_key(text[idx + 1..].trim_start()).is_some())
}

fn match_key(text: &str) -> Option<(Field, &str)> {
    FIELD_KEYS
        .iter()
        .find_map(|(key, field)| text.strip_prefix(key).map(|after| (*field, after)))
}

/// A value runs to the end of its line, or to a comma that starts another key.
/// Commas inside values (`$90,000`, `Springfield, IL`) are kept.
fn take_value(text: &str) -> (&str, &str) {
    let line_end = text.find('\n').unwrap_or(text.len());
    let end = text[..line_end]
        .match_indices(',')
        .map(|(idx, _)| idx)
        .find(|&idx| match_key(text[idx + 1..].trim_start_matches([' ', '\t'])).is_some())
        .unwrap_or(line_end);
    (text[..end].trim(), &text[end..])
}

fn description_from(remainder: &str) -> String {
    let text = remainder.trim_start_matches(|c: char| c == ',' || c.is_whitespace());
    let text = text.strip_prefix("Description:").unwrap_or(text);
    text.trim().to_string()
}
