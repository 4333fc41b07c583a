use crate::response::JobListing;

pub const IMAGE_LOAD_ERROR: &str = "Error loading prediction image.";

/// One self-contained unit of rendered output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderFragment {
    TextBlock(String),
    /// Grid rows plus a summary line shown outside the grid. Rows may be ragged.
    Table {
        rows: Vec<Vec<String>>,
        summary: String,
    },
    ImageRef {
        path: String,
        alt_text: String,
    },
    ListingCard(JobListing),
    ErrorNote(String),
}

impl RenderFragment {
    pub fn text(text: impl Into<String>) -> Self {
        Self::TextBlock(text.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::ErrorNote(message.into())
    }

    pub fn is_primary(&self) -> bool {
        matches!(
            self,
            Self::TextBlock(_) | Self::Table { .. } | Self::ListingCard(_)
        )
    }

    pub fn image_path(&self) -> Option<&str> {
        match self {
            Self::ImageRef { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Replaces the image fragment for `path` with an error note, in place.
///
/// Returns false when no such image is displayed (already replaced, or the
/// fragments belong to a different response).
pub fn mark_image_failed(fragments: &mut [RenderFragment], path: &str) -> bool {
    match fragments.iter_mut().find(|f| f.image_path() == Some(path)) {
        Some(fragment) => {
            *fragment = RenderFragment::error(IMAGE_LOAD_ERROR);
            true
        }
        None => false,
    }
}
