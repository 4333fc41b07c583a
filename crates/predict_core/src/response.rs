use predict_logging::predict_debug;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Payload returned by the prediction backend for one (domain, query).
///
/// Every field is optional. The backend writes unset strings as `""` and unset
/// lists as `null`; both deserialize to `None` here, the same as a missing key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PredictionResponse {
    #[serde(
        default,
        alias = "predictionInfo",
        deserialize_with = "non_blank",
        skip_serializing_if = "Option::is_none"
    )]
    pub prediction_info: Option<String>,
    #[serde(
        default,
        alias = "imagePath",
        deserialize_with = "non_blank",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_path: Option<String>,
    #[serde(
        default,
        alias = "jobListings",
        deserialize_with = "non_empty_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub job_listings: Option<Vec<JobListing>>,
    #[serde(default, deserialize_with = "non_blank", skip_serializing_if = "Option::is_none")]
    pub skills: Option<String>,
    #[serde(
        default,
        alias = "specificJob",
        deserialize_with = "lenient_listing",
        skip_serializing_if = "Option::is_none"
    )]
    pub specific_job: Option<JobListing>,
    #[serde(
        default,
        alias = "inputData",
        deserialize_with = "non_blank",
        skip_serializing_if = "Option::is_none"
    )]
    pub input_data: Option<String>,
}

impl PredictionResponse {
    /// Text content, `None` when absent or whitespace only.
    pub fn info(&self) -> Option<&str> {
        self.prediction_info
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }

    pub fn image(&self) -> Option<&str> {
        self.image_path
            .as_deref()
            .map(str::trim)
            .filter(|path| !path.is_empty())
    }

    pub fn listings(&self) -> Option<&[JobListing]> {
        self.job_listings
            .as_deref()
            .filter(|listings| !listings.is_empty())
    }

    pub fn skills(&self) -> Option<&str> {
        self.skills.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// One job card. Fields the backend sends as `null` or leaves out are empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobListing {
    #[serde(deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub url: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub company: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub location: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub salary: String,
    /// May span several lines; line breaks are content, not formatting.
    #[serde(deserialize_with = "null_as_empty")]
    pub description: String,
}

impl JobListing {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// True when nothing beyond the title is known.
    pub fn is_title_only(&self) -> bool {
        self.url.is_empty()
            && self.company.is_empty()
            && self.location.is_empty()
            && self.salary.is_empty()
            && self.description.is_empty()
    }
}

fn non_blank<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

/// A listing entry that may not be a listing at all.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListingEntry {
    Listing(JobListing),
    Malformed(#[allow(dead_code)] IgnoredAny),
}

impl ListingEntry {
    fn into_listing(self) -> Option<JobListing> {
        match self {
            ListingEntry::Listing(listing) => {
                if listing.title.is_empty() && listing.is_title_only() {
                    predict_debug!("dropping empty job listing entry");
                    None
                } else {
                    Some(listing)
                }
            }
            ListingEntry::Malformed(_) => {
                predict_debug!("dropping malformed job listing entry");
                None
            }
        }
    }
}

/// Keeps the well-formed entries; a bad entry never rejects the whole response.
fn non_empty_list<'de, D>(deserializer: D) -> Result<Option<Vec<JobListing>>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries: Option<Vec<ListingEntry>> = Option::deserialize(deserializer)?;
    let listings: Vec<JobListing> = entries
        .unwrap_or_default()
        .into_iter()
        .filter_map(ListingEntry::into_listing)
        .collect();
    Ok((!listings.is_empty()).then_some(listings))
}

fn lenient_listing<'de, D>(deserializer: D) -> Result<Option<JobListing>, D::Error>
where
    D: Deserializer<'de>,
{
    let entry: Option<ListingEntry> = Option::deserialize(deserializer)?;
    Ok(entry.and_then(ListingEntry::into_listing))
}
