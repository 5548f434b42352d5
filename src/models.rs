//! Core data models for the web-data build.
//!
//! Raw rows come in from the row source; everything else here is a
//! serialized output document.

use rustc_hash::FxHashMap;
use serde::Serialize;

// ============================================================================
// Input
// ============================================================================

/// Column names consumed from the library export. Unused columns are ignored.
pub mod columns {
    pub const NAME: &str = "Name";
    pub const ARTIST: &str = "Artist";
    pub const ALBUM: &str = "Album";
    pub const COMPOSER: &str = "Composer";
    pub const GENRE: &str = "Genre";
    pub const YEAR: &str = "Year";
    pub const SIZE: &str = "Size";
    pub const TIME: &str = "Time";
    pub const BIT_RATE: &str = "Bit Rate";
    pub const SAMPLE_RATE: &str = "Sample Rate";
    pub const TRACK_NUMBER: &str = "Track Number";
    pub const TRACK_COUNT: &str = "Track Count";
    pub const DISC_NUMBER: &str = "Disc Number";
    pub const DISC_COUNT: &str = "Disc Count";
    pub const PLAY_COUNT: &str = "Play Count";
    pub const MY_RATING: &str = "My Rating";
    pub const DATE_ADDED: &str = "Date Added";
    pub const DATE_MODIFIED: &str = "Date Modified";
    pub const LAST_PLAYED: &str = "Last Played";
    pub const LOCATION: &str = "Location";
    pub const KIND: &str = "Kind";
    pub const GROUPING: &str = "Grouping";
    pub const COMMENTS: &str = "Comments";
    pub const VOLUME_ADJUSTMENT: &str = "Volume Adjustment";
    pub const EQUALIZER: &str = "Equalizer";
}

/// One record from the row source: field name → raw string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawRow {
    fields: FxHashMap<String, String>,
}

impl RawRow {
    /// Raw value for a column; missing columns read as empty.
    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// ============================================================================
// Canonical Track
// ============================================================================

/// Canonical track written into chunk files.
///
/// Nullable numbers always serialize (as `null` when unknown); optional
/// strings are omitted when empty.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub artist_slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composer: Option<String>,
    pub album: String,
    pub album_slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grouping: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub size: i64,
    pub duration: i64,
    pub duration_formatted: String,
    pub bit_rate: Option<i64>,
    pub sample_rate: Option<i64>,
    pub track_number: Option<i64>,
    pub track_count: Option<i64>,
    pub disc_number: Option<i64>,
    pub disc_count: Option<i64>,
    pub play_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_played: Option<String>,
    pub rating: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_added: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub volume_adjustment: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equalizer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

// ============================================================================
// Web-data documents
// ============================================================================

/// One page of tracks (`chunks/tracks-NNN.json`).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackChunk<'a> {
    pub chunk: usize,
    pub total_chunks: usize,
    pub count: usize,
    pub tracks: &'a [Track],
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistIndexEntry {
    pub slug: String,
    pub name: String,
    pub album_count: usize,
    pub track_count: usize,
    pub albums: Vec<String>,
}

/// `artists-index.json`
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ArtistIndex {
    pub total: usize,
    pub artists: Vec<ArtistIndexEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumIndexEntry {
    pub slug: String,
    pub name: String,
    pub artist_count: usize,
    pub track_count: usize,
    pub artists: Vec<String>,
}

/// `albums-index.json`
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AlbumIndex {
    pub total: usize,
    pub albums: Vec<AlbumIndexEntry>,
}

/// Collection-wide statistics.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_size_bytes: i64,
    #[serde(rename = "totalSizeGB")]
    pub total_size_gb: f64,
    pub total_duration_seconds: i64,
    pub total_duration_hours: f64,
    pub total_duration_formatted: String,
    pub avg_bit_rate: f64,
    pub tracks_with_play_count: usize,
    pub tracks_with_rating: usize,
}

/// `metadata.json`
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub total_tracks: usize,
    pub total_artists: usize,
    pub total_albums: usize,
    pub genres: Vec<String>,
    pub years: Vec<i32>,
    pub stats: Stats,
}

// ============================================================================
// Simple extraction documents
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrackEntry {
    pub track: String,
    pub artist: String,
    pub album: String,
}

/// `data/tracks.json`
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TracksList {
    pub total_tracks: usize,
    pub tracks: Vec<TrackEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ArtistEntry {
    pub artist: String,
    pub albums: Vec<String>,
}

/// `data/artists.json`
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ArtistsList {
    pub total_artists: usize,
    pub artists: Vec<ArtistEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AlbumEntry {
    pub album: String,
    pub artists: Vec<String>,
}

/// `data/albums.json`
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AlbumsList {
    pub total_albums: usize,
    pub albums: Vec<AlbumEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_row_missing_column_is_empty() {
        let row: RawRow = [("Name", "Song")].into_iter().collect();
        assert_eq!(row.get(columns::NAME), "Song");
        assert_eq!(row.get(columns::ARTIST), "");
    }

    #[test]
    fn test_stats_field_names() {
        let json = serde_json::to_value(Stats::default()).unwrap();
        for key in [
            "totalSizeBytes",
            "totalSizeGB",
            "totalDurationSeconds",
            "totalDurationHours",
            "totalDurationFormatted",
            "avgBitRate",
            "tracksWithRating",
        ] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
    }
}
