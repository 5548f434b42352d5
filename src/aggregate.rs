//! Entity aggregation: folds canonical tracks into artist/album indexes,
//! global facets and running totals.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;

use crate::models::{
    AlbumIndex, AlbumIndexEntry, ArtistIndex, ArtistIndexEntry, Metadata, Stats, Track,
};

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;
const SECONDS_PER_HOUR: i64 = 3600;

/// Accumulated view of all tracks sharing one slug.
///
/// For an artist `members` holds album names; for an album it holds artist
/// names.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntityAggregate {
    /// First display name seen for the slug.
    pub name: String,
    pub members: BTreeSet<String>,
    pub track_ids: Vec<String>,
}

pub type ArtistAggregate = EntityAggregate;
pub type AlbumAggregate = EntityAggregate;

impl EntityAggregate {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    fn record(&mut self, member: &str, track_id: &str) {
        if !self.members.contains(member) {
            self.members.insert(member.to_string());
        }
        self.track_ids.push(track_id.to_string());
    }
}

/// Running numeric accumulators.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Totals {
    pub tracks: usize,
    pub size_bytes: i64,
    pub duration_seconds: i64,
    pub bit_rate_sum: i64,
    pub bit_rate_count: usize,
    pub rated: usize,
    pub played: usize,
}

/// Finalized, sorted output of an aggregation run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Collection {
    pub artists: ArtistIndex,
    pub albums: AlbumIndex,
    pub metadata: Metadata,
}

/// Aggregation state owned by the pipeline for one run.
#[derive(Debug, Default)]
pub struct Aggregator {
    artists: FxHashMap<String, ArtistAggregate>,
    albums: FxHashMap<String, AlbumAggregate>,
    genres: BTreeSet<String>,
    years: BTreeSet<i32>,
    totals: Totals,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, track: &Track) {
        self.artists
            .entry(track.artist_slug.clone())
            .or_insert_with(|| EntityAggregate::new(&track.artist))
            .record(&track.album, &track.id);

        self.albums
            .entry(track.album_slug.clone())
            .or_insert_with(|| EntityAggregate::new(&track.album))
            .record(&track.artist, &track.id);

        if let Some(genre) = &track.genre {
            if !self.genres.contains(genre) {
                self.genres.insert(genre.clone());
            }
        }
        if let Some(year) = track.year {
            self.years.insert(year);
        }

        // Sums saturate; one absurd row must not wrap the totals.
        let totals = &mut self.totals;
        totals.tracks += 1;
        totals.size_bytes = totals.size_bytes.saturating_add(track.size);
        totals.duration_seconds = totals.duration_seconds.saturating_add(track.duration);
        if let Some(bit_rate) = track.bit_rate {
            totals.bit_rate_sum = totals.bit_rate_sum.saturating_add(bit_rate);
            totals.bit_rate_count += 1;
        }
        if track.rating > 0 {
            totals.rated += 1;
        }
        if track.play_count > 0 {
            totals.played += 1;
        }
    }

    pub fn artist_count(&self) -> usize {
        self.artists.len()
    }

    pub fn album_count(&self) -> usize {
        self.albums.len()
    }

    pub fn genre_count(&self) -> usize {
        self.genres.len()
    }

    pub fn year_count(&self) -> usize {
        self.years.len()
    }

    /// Sort everything into its output order. Map iteration order never
    /// leaks into the result.
    pub fn finalize(self) -> Collection {
        let mut artists: Vec<ArtistIndexEntry> = self
            .artists
            .into_iter()
            .map(|(slug, agg)| ArtistIndexEntry {
                slug,
                name: agg.name,
                album_count: agg.members.len(),
                track_count: agg.track_ids.len(),
                albums: agg.members.into_iter().collect(),
            })
            .collect();
        artists.sort_by_cached_key(|a| display_order(&a.name, &a.slug));

        let mut albums: Vec<AlbumIndexEntry> = self
            .albums
            .into_iter()
            .map(|(slug, agg)| AlbumIndexEntry {
                slug,
                name: agg.name,
                artist_count: agg.members.len(),
                track_count: agg.track_ids.len(),
                artists: agg.members.into_iter().collect(),
            })
            .collect();
        albums.sort_by_cached_key(|a| display_order(&a.name, &a.slug));

        let metadata = Metadata {
            total_tracks: self.totals.tracks,
            total_artists: artists.len(),
            total_albums: albums.len(),
            genres: self.genres.into_iter().collect(),
            years: self.years.into_iter().collect(),
            stats: compute_stats(&self.totals),
        };

        Collection {
            artists: ArtistIndex {
                total: artists.len(),
                artists,
            },
            albums: AlbumIndex {
                total: albums.len(),
                albums,
            },
            metadata,
        }
    }
}

/// Case-insensitive display name, slug as tiebreaker.
fn display_order(name: &str, slug: &str) -> (String, String) {
    (name.to_lowercase(), slug.to_string())
}

/// Round half away from zero to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// "<hours>h <minutes>m" from whole seconds.
pub fn format_total_duration(seconds: i64) -> String {
    let hours = seconds / SECONDS_PER_HOUR;
    let minutes = (seconds % SECONDS_PER_HOUR) / 60;
    format!("{}h {}m", hours, minutes)
}

pub fn compute_stats(totals: &Totals) -> Stats {
    let avg_bit_rate = if totals.bit_rate_count > 0 {
        totals.bit_rate_sum as f64 / totals.bit_rate_count as f64
    } else {
        0.0
    };

    Stats {
        total_size_bytes: totals.size_bytes,
        total_size_gb: round_to(totals.size_bytes as f64 / BYTES_PER_GB, 2),
        total_duration_seconds: totals.duration_seconds,
        total_duration_hours: round_to(
            totals.duration_seconds as f64 / SECONDS_PER_HOUR as f64,
            1,
        ),
        total_duration_formatted: format_total_duration(totals.duration_seconds),
        avg_bit_rate: round_to(avg_bit_rate, 1),
        tracks_with_play_count: totals.played,
        tracks_with_rating: totals.rated,
    }
}
