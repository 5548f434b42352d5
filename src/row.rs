//! Row normalizer: one raw export row → one canonical [`Track`] or a drop.

use std::fmt;

use crate::models::{columns, RawRow, Track};
use crate::normalize::{
    format_duration, is_valid_name, non_zero, positive, safe_int, safe_str, sanitize_album_name,
    sanitize_artist_name, sanitize_genre, sanitize_year, slugify,
};

pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropReason {
    EmptyTrackName,
    InvalidArtist,
    InvalidAlbum,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            DropReason::EmptyTrackName => "empty track name",
            DropReason::InvalidArtist => "invalid artist name",
            DropReason::InvalidAlbum => "invalid album name",
        };
        f.write_str(reason)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum RowOutcome {
    Accepted(Track),
    Dropped(DropReason),
}

/// Track ids are assigned to accepted rows only, in input order.
pub fn format_track_id(index: usize) -> String {
    format!("track-{:05}", index)
}

/// Stateful only in its id counter; the same rows in the same order always
/// produce the same tracks.
///
/// Empty artist and album names become "Unknown Artist"/"Unknown Album"
/// before the validity check. The simple extraction paths in
/// [`crate::extract`] drop such rows instead.
#[derive(Debug)]
pub struct RowNormalizer {
    current_year: i32,
    next_id: usize,
}

impl RowNormalizer {
    /// `current_year` is the ceiling for accepted years.
    pub fn new(current_year: i32) -> Self {
        Self {
            current_year,
            next_id: 0,
        }
    }

    pub fn normalize(&mut self, row: &RawRow) -> RowOutcome {
        let name = row.get(columns::NAME).trim();
        if name.is_empty() {
            return RowOutcome::Dropped(DropReason::EmptyTrackName);
        }

        let artist = or_placeholder(sanitize_artist_name(row.get(columns::ARTIST)), UNKNOWN_ARTIST);
        if !is_valid_name(&artist) {
            return RowOutcome::Dropped(DropReason::InvalidArtist);
        }

        let album = or_placeholder(sanitize_album_name(row.get(columns::ALBUM)), UNKNOWN_ALBUM);
        if !is_valid_name(&album) {
            return RowOutcome::Dropped(DropReason::InvalidAlbum);
        }

        // Negative durations are corrupt data, not a length.
        let duration = safe_int(row.get(columns::TIME)).max(0);
        let track = Track {
            id: format_track_id(self.next_id),
            name: name.to_string(),
            artist_slug: slugify(&artist),
            artist,
            composer: safe_str(row.get(columns::COMPOSER)),
            album_slug: slugify(&album),
            album,
            grouping: safe_str(row.get(columns::GROUPING)),
            genre: sanitize_genre(row.get(columns::GENRE)),
            year: sanitize_year(row.get(columns::YEAR), self.current_year),
            size: safe_int(row.get(columns::SIZE)),
            duration,
            duration_formatted: format_duration(duration),
            bit_rate: positive(safe_int(row.get(columns::BIT_RATE))),
            sample_rate: positive(safe_int(row.get(columns::SAMPLE_RATE))),
            track_number: positive(safe_int(row.get(columns::TRACK_NUMBER))),
            track_count: positive(safe_int(row.get(columns::TRACK_COUNT))),
            disc_number: positive(safe_int(row.get(columns::DISC_NUMBER))),
            disc_count: positive(safe_int(row.get(columns::DISC_COUNT))),
            play_count: safe_int(row.get(columns::PLAY_COUNT)),
            last_played: safe_str(row.get(columns::LAST_PLAYED)),
            rating: safe_int(row.get(columns::MY_RATING)),
            date_added: safe_str(row.get(columns::DATE_ADDED)),
            date_modified: safe_str(row.get(columns::DATE_MODIFIED)),
            location: safe_str(row.get(columns::LOCATION)),
            kind: safe_str(row.get(columns::KIND)),
            volume_adjustment: non_zero(safe_int(row.get(columns::VOLUME_ADJUSTMENT))),
            equalizer: safe_str(row.get(columns::EQUALIZER)),
            comments: safe_str(row.get(columns::COMMENTS)),
        };

        self.next_id += 1;
        RowOutcome::Accepted(track)
    }
}

fn or_placeholder(name: String, placeholder: &str) -> String {
    if name.is_empty() {
        placeholder.to_string()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs.iter().copied().collect()
    }

    fn accepted(outcome: RowOutcome) -> Track {
        match outcome {
            RowOutcome::Accepted(track) => track,
            RowOutcome::Dropped(reason) => panic!("row dropped: {}", reason),
        }
    }

    #[test]
    fn test_basic_track() {
        let mut normalizer = RowNormalizer::new(2025);
        let track = accepted(normalizer.normalize(&row(&[
            ("Name", " Song A "),
            ("Artist", "Beatles, The"),
            ("Album", "Abbey Road"),
            ("Year", "1969"),
            ("Time", "180"),
            ("Genre", "Rock"),
        ])));

        assert_eq!(track.id, "track-00000");
        assert_eq!(track.name, "Song A");
        assert_eq!(track.artist, "The Beatles");
        assert_eq!(track.artist_slug, "the-beatles");
        assert_eq!(track.album_slug, "abbey-road");
        assert_eq!(track.year, Some(1969));
        assert_eq!(track.duration, 180);
        assert_eq!(track.duration_formatted, "3:00");
        assert_eq!(track.genre.as_deref(), Some("Rock"));
        assert_eq!(track.composer, None);
    }

    #[test]
    fn test_ids_count_accepted_rows_only() {
        let mut normalizer = RowNormalizer::new(2025);
        let a = accepted(normalizer.normalize(&row(&[
            ("Name", "A"),
            ("Artist", "X"),
            ("Album", "Y"),
        ])));
        assert_eq!(
            normalizer.normalize(&row(&[("Name", ""), ("Artist", "X"), ("Album", "Y")])),
            RowOutcome::Dropped(DropReason::EmptyTrackName)
        );
        let b = accepted(normalizer.normalize(&row(&[
            ("Name", "B"),
            ("Artist", "X"),
            ("Album", "Y"),
        ])));
        assert_eq!(a.id, "track-00000");
        assert_eq!(b.id, "track-00001");
    }

    #[test]
    fn test_substitute_policy_fills_unknown_names() {
        let mut normalizer = RowNormalizer::new(2025);
        let track = accepted(normalizer.normalize(&row(&[
            ("Name", "Song B"),
            ("Artist", "\"Weezer\""),
            ("Album", ""),
            ("Year", "2020.0"),
            ("Time", "0"),
        ])));
        assert_eq!(track.artist, "Weezer");
        assert_eq!(track.album, UNKNOWN_ALBUM);
        assert_eq!(track.album_slug, "unknown-album");
        assert_eq!(track.year, Some(2020));
        assert_eq!(track.duration_formatted, "0:00");

        let track = accepted(normalizer.normalize(&row(&[("Name", "Song C"), ("Album", "Z")])));
        assert_eq!(track.artist, UNKNOWN_ARTIST);
    }

    #[test]
    fn test_question_mark_names_dropped() {
        let mut normalizer = RowNormalizer::new(2025);
        assert_eq!(
            normalizer.normalize(&row(&[("Name", "Song"), ("Artist", "???"), ("Album", "Y")])),
            RowOutcome::Dropped(DropReason::InvalidArtist)
        );
        assert_eq!(
            normalizer.normalize(&row(&[("Name", "Song"), ("Artist", "X"), ("Album", "\"?\"")])),
            RowOutcome::Dropped(DropReason::InvalidAlbum)
        );
        let track = accepted(normalizer.normalize(&row(&[
            ("Name", "Song"),
            ("Artist", "X"),
            ("Album", "Y"),
        ])));
        assert_eq!(track.id, "track-00000");
    }

    #[test]
    fn test_negative_duration_clamped() {
        let mut normalizer = RowNormalizer::new(2025);
        let track = accepted(normalizer.normalize(&row(&[
            ("Name", "Song"),
            ("Artist", "X"),
            ("Album", "Y"),
            ("Time", "-115"),
        ])));
        assert_eq!(track.duration, 0);
        assert_eq!(track.duration_formatted, "0:00");
    }

    #[test]
    fn test_drop_order_checks_name_first() {
        let mut normalizer = RowNormalizer::new(2025);
        assert_eq!(
            normalizer.normalize(&row(&[("Name", " "), ("Artist", "?"), ("Album", "?")])),
            RowOutcome::Dropped(DropReason::EmptyTrackName)
        );
    }

    #[test]
    fn test_nullable_numeric_fields() {
        let mut normalizer = RowNormalizer::new(2025);
        let track = accepted(normalizer.normalize(&row(&[
            ("Name", "Song"),
            ("Artist", "X"),
            ("Album", "Y"),
            ("Bit Rate", "0"),
            ("Sample Rate", "44100"),
            ("Track Number", "-1"),
            ("Track Count", "12.0"),
            ("Disc Number", "abc"),
            ("Disc Count", ""),
            ("Volume Adjustment", "0"),
            ("My Rating", "0"),
            ("Size", "0"),
            ("Year", "3000"),
        ])));
        assert_eq!(track.bit_rate, None);
        assert_eq!(track.sample_rate, Some(44100));
        assert_eq!(track.track_number, None);
        assert_eq!(track.track_count, Some(12));
        assert_eq!(track.disc_number, None);
        assert_eq!(track.disc_count, None);
        assert_eq!(track.volume_adjustment, None);
        assert_eq!(track.rating, 0);
        assert_eq!(track.size, 0);
        assert_eq!(track.year, None);

        let json = serde_json::to_value(&track).unwrap();
        for key in ["bitRate", "trackNumber", "discNumber", "volumeAdjustment", "year"] {
            assert!(json.get(key).unwrap().is_null(), "{} should be null", key);
        }
        for key in ["composer", "genre", "location", "comments"] {
            assert!(json.get(key).is_none(), "{} should be omitted", key);
        }
    }

    #[test]
    fn test_optional_strings_trimmed() {
        let mut normalizer = RowNormalizer::new(2025);
        let track = accepted(normalizer.normalize(&row(&[
            ("Name", "Song"),
            ("Artist", "X"),
            ("Album", "Y"),
            ("Composer", "  Lennon/McCartney "),
            ("Date Added", " 2020-01-01 10:00 "),
            ("Kind", "   "),
            ("Volume Adjustment", "-25"),
            ("My Rating", "80"),
            ("Play Count", "3"),
        ])));
        assert_eq!(track.composer.as_deref(), Some("Lennon/McCartney"));
        assert_eq!(track.date_added.as_deref(), Some("2020-01-01 10:00"));
        assert_eq!(track.kind, None);
        assert_eq!(track.volume_adjustment, Some(-25));
        assert_eq!(track.rating, 80);
        assert_eq!(track.play_count, 3);
    }
}
