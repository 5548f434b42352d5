//! Simple extraction paths: flat track, artist and album lists.
//!
//! These never substitute "Unknown" names; rows with unusable names are
//! skipped outright, and lists are keyed by display name rather than slug.

use std::collections::{BTreeMap, BTreeSet};

use crate::models::{
    columns, AlbumEntry, AlbumsList, ArtistEntry, ArtistsList, RawRow, TrackEntry, TracksList,
};
use crate::normalize::{is_valid_name, sanitize_album_name, sanitize_artist_name};

/// Tracks with a name and a valid artist and album, in input order.
/// The album is only trimmed here, not quote-stripped.
pub fn extract_tracks(rows: &[RawRow]) -> TracksList {
    let tracks: Vec<TrackEntry> = rows
        .iter()
        .filter_map(|row| {
            let track = row.get(columns::NAME).trim();
            let artist = sanitize_artist_name(row.get(columns::ARTIST));
            let album = row.get(columns::ALBUM).trim();

            if !is_valid_name(&artist) || !is_valid_name(album) || track.is_empty() {
                return None;
            }
            Some(TrackEntry {
                track: track.to_string(),
                artist,
                album: album.to_string(),
            })
        })
        .collect();

    TracksList {
        total_tracks: tracks.len(),
        tracks,
    }
}

/// Every valid artist with the sorted set of its (trimmed, non-empty) albums.
pub fn extract_artists(rows: &[RawRow]) -> ArtistsList {
    let mut artists: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for row in rows {
        let artist = sanitize_artist_name(row.get(columns::ARTIST));
        if !is_valid_name(&artist) {
            continue;
        }
        let albums = artists.entry(artist).or_default();
        let album = row.get(columns::ALBUM).trim();
        if !album.is_empty() {
            albums.insert(album.to_string());
        }
    }

    let artists: Vec<ArtistEntry> = artists
        .into_iter()
        .map(|(artist, albums)| ArtistEntry {
            artist,
            albums: albums.into_iter().collect(),
        })
        .collect();

    ArtistsList {
        total_artists: artists.len(),
        artists,
    }
}

/// Every valid album with the sorted set of its (sanitized, non-empty) artists.
pub fn extract_albums(rows: &[RawRow]) -> AlbumsList {
    let mut albums: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for row in rows {
        let album = sanitize_album_name(row.get(columns::ALBUM));
        if !is_valid_name(&album) {
            continue;
        }
        let artists = albums.entry(album).or_default();
        let artist = sanitize_artist_name(row.get(columns::ARTIST));
        if !artist.is_empty() {
            artists.insert(artist);
        }
    }

    let albums: Vec<AlbumEntry> = albums
        .into_iter()
        .map(|(album, artists)| AlbumEntry {
            album,
            artists: artists.into_iter().collect(),
        })
        .collect();

    AlbumsList {
        total_albums: albums.len(),
        albums,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<RawRow> {
        vec![
            [("Name", "Come Together"), ("Artist", "Beatles, The"), ("Album", "Abbey Road")],
            [("Name", "Something"), ("Artist", "Beatles, The"), ("Album", " Abbey Road ")],
            [("Name", "Help!"), ("Artist", "Beatles, The"), ("Album", "Help!")],
            [("Name", "Buddy Holly"), ("Artist", "\"Weezer\""), ("Album", "")],
            [("Name", ""), ("Artist", "X"), ("Album", "Y")],
            [("Name", "Mystery"), ("Artist", "??"), ("Album", "Abbey Road")],
            [("Name", "Cover"), ("Artist", "abba"), ("Album", "\"Abbey Road\"")],
        ]
        .into_iter()
        .map(|pairs| pairs.into_iter().collect())
        .collect()
    }

    #[test]
    fn test_extract_tracks_drops_without_substitution() {
        let list = extract_tracks(&rows());
        let names: Vec<_> = list.tracks.iter().map(|t| t.track.as_str()).collect();
        assert_eq!(names, vec!["Come Together", "Something", "Help!", "Cover"]);
        assert_eq!(list.total_tracks, 4);
        assert_eq!(list.tracks[0].artist, "The Beatles");
        assert_eq!(list.tracks[1].album, "Abbey Road");
        // Album quotes are kept on this path
        assert_eq!(list.tracks[3].album, "\"Abbey Road\"");
    }

    #[test]
    fn test_extract_artists() {
        let list = extract_artists(&rows());
        let names: Vec<_> = list.artists.iter().map(|a| a.artist.as_str()).collect();
        // Case-sensitive ordering, "X" has a valid name even though its row has no track name
        assert_eq!(names, vec!["The Beatles", "Weezer", "X", "abba"]);
        assert_eq!(list.artists[0].albums, vec!["Abbey Road", "Help!"]);
        assert!(list.artists[1].albums.is_empty());
        assert_eq!(list.total_artists, 4);
    }

    #[test]
    fn test_extract_albums() {
        let list = extract_albums(&rows());
        let names: Vec<_> = list.albums.iter().map(|a| a.album.as_str()).collect();
        assert_eq!(names, vec!["Abbey Road", "Help!", "Y"]);
        assert_eq!(list.albums[0].artists, vec!["??", "The Beatles", "abba"]);
        assert_eq!(list.total_albums, 3);
    }

    #[test]
    fn test_serialized_keys() {
        let json = serde_json::to_value(extract_tracks(&rows())).unwrap();
        assert_eq!(json["total_tracks"], 4);
        assert_eq!(json["tracks"][0]["track"], "Come Together");
        let json = serde_json::to_value(extract_albums(&rows())).unwrap();
        assert!(json.get("total_albums").is_some());
    }
}
