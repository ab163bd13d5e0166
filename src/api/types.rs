//! Catalog data model and vendor wire formats.

use serde::Deserialize;

/// One chapter as reported by the remote catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterRecord {
    /// Opaque identifier used to resolve the archive location.
    pub chapter_id: String,
    /// Chapter label, usually numeric ("12", "12.5").
    pub label: String,
    /// Publication time in epoch seconds.
    pub publication_timestamp: i64,
    /// Whether the vendor marks the chapter as published.
    pub is_published: bool,
    /// Web price; empty means free.
    pub price: String,
    /// Title of the series the chapter belongs to.
    pub series_title: String,
}

impl ChapterRecord {
    /// Returns true when the chapter carries no price.
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.price.trim().is_empty()
    }
}

/// Chapters of one series, in the order the catalog returned them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterListing {
    /// Chapter records; empty when the series id is unassigned.
    pub chapters: Vec<ChapterRecord>,
}

impl ChapterListing {
    /// Returns true when the catalog had nothing for the series.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    /// Series title taken from the first chapter, if any.
    #[must_use]
    pub fn series_title(&self) -> Option<&str> {
        self.chapters
            .first()
            .map(|chapter| chapter.series_title.as_str())
            .filter(|title| !title.trim().is_empty())
    }
}

/// Resolved download location for a chapter archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveLocation {
    /// Archive can be fetched from this URL.
    Url(String),
    /// The account has no downloads left for now.
    Denied,
}

/// Marker the vendor returns in place of a URL when access is exhausted.
pub(crate) const DENIED_MARKER: &str = "no_auth";

// ==================== Wire formats ====================

#[derive(Debug, Deserialize)]
pub(crate) struct SeriesResponse {
    #[serde(default)]
    pub(crate) data: Option<Vec<MangaEnvelope>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MangaEnvelope {
    pub(crate) manga: MangaData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MangaData {
    #[serde(default)]
    pub(crate) chapter: String,
    #[serde(default)]
    pub(crate) manga_common_id: i64,
    #[serde(default)]
    pub(crate) epoch_pub_date: i64,
    #[serde(default)]
    pub(crate) publication_date: Option<String>,
    /// Absent means published; only an explicit `false` hides a chapter.
    #[serde(default = "published_when_absent")]
    pub(crate) published: bool,
    #[serde(default)]
    pub(crate) web_price: Option<String>,
    #[serde(default)]
    pub(crate) series_title: String,
}

fn published_when_absent() -> bool {
    true
}

impl MangaData {
    #[allow(clippy::cast_possible_truncation)]
    fn publication_timestamp(&self) -> i64 {
        if self.epoch_pub_date > 0 {
            return self.epoch_pub_date;
        }
        self.publication_date
            .as_deref()
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|value| value.is_finite())
            .map_or(0, |value| value as i64)
    }
}

impl From<MangaData> for ChapterRecord {
    fn from(data: MangaData) -> Self {
        let publication_timestamp = data.publication_timestamp();
        Self {
            chapter_id: data.manga_common_id.to_string(),
            label: data.chapter,
            publication_timestamp,
            is_published: data.published,
            price: data.web_price.unwrap_or_default(),
            series_title: data.series_title,
        }
    }
}

impl From<SeriesResponse> for ChapterListing {
    fn from(response: SeriesResponse) -> Self {
        Self {
            chapters: response
                .data
                .unwrap_or_default()
                .into_iter()
                .map(|envelope| ChapterRecord::from(envelope.manga))
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LocationResponse {
    #[serde(default)]
    pub(crate) data: Option<String>,
}
