//! Pipeline driver: load rows → normalize → aggregate → write artifacts.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::aggregate::{Aggregator, Collection};
use crate::chunks::{
    write_json, ChunkWriter, ALBUMS_INDEX_FILE, ARTISTS_INDEX_FILE, CHUNKS_DIR, METADATA_FILE,
};
use crate::config::{BuildConfig, ExtractConfig, ExtractKind};
use crate::extract::{extract_albums, extract_artists, extract_tracks};
use crate::models::{RawRow, Track};
use crate::normalize::current_year;
use crate::progress::{create_progress_bar, create_spinner, format_elapsed, log_progress, Phase};
use crate::row::{RowNormalizer, RowOutcome};
use crate::safety::{validate_output_dir, validate_output_file};
use crate::source::read_rows;

/// In-memory result of normalizing and aggregating a row set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BuiltLibrary {
    /// Accepted tracks in id order.
    pub tracks: Vec<Track>,
    pub collection: Collection,
    pub rows_read: usize,
    pub rows_dropped: usize,
}

/// What a finished build wrote.
#[derive(Clone, Debug)]
pub struct BuildReport {
    pub library: BuiltLibrary,
    pub chunks_written: usize,
    pub output_dir: PathBuf,
}

/// Normalize every row in order and fold the accepted tracks.
pub fn build_library(rows: &[RawRow], current_year: i32) -> BuiltLibrary {
    let mut normalizer = RowNormalizer::new(current_year);
    let mut aggregator = Aggregator::new();
    let mut tracks = Vec::new();
    let mut rows_dropped = 0;

    let total = rows.len() as u64;
    let pb = create_progress_bar(total, Phase::Normalize);
    for (i, row) in rows.iter().enumerate() {
        match normalizer.normalize(row) {
            RowOutcome::Accepted(track) => {
                aggregator.add(&track);
                tracks.push(track);
            }
            RowOutcome::Dropped(reason) => {
                rows_dropped += 1;
                log::debug!("Dropped row {}: {}", i + 1, reason);
            }
        }
        pb.inc(1);
        log_progress(Phase::Normalize, i as u64 + 1, total);
    }
    pb.finish_with_message(format!("Normalized {} tracks", tracks.len()));

    println!("Processed {} tracks", tracks.len());
    println!("Found {} unique artists", aggregator.artist_count());
    println!("Found {} unique albums", aggregator.album_count());
    println!("Found {} genres", aggregator.genre_count());
    println!("Found {} years\n", aggregator.year_count());

    BuiltLibrary {
        tracks,
        collection: aggregator.finalize(),
        rows_read: rows.len(),
        rows_dropped,
    }
}

/// Write chunks, both indexes and the metadata file for a built library.
pub fn write_library(
    library: &BuiltLibrary,
    output_dir: &Path,
    chunk_size: usize,
) -> Result<usize> {
    let writer = ChunkWriter::create(output_dir, chunk_size)?;
    let chunks_written = writer.write_chunks(&library.tracks)?;

    let collection = &library.collection;
    writer.write_artist_index(&collection.artists)?;
    println!("  Wrote {} artists to {}", collection.artists.total, ARTISTS_INDEX_FILE);
    writer.write_album_index(&collection.albums)?;
    println!("  Wrote {} albums to {}", collection.albums.total, ALBUMS_INDEX_FILE);
    writer.write_metadata(&collection.metadata)?;
    println!("  Wrote {}", METADATA_FILE);

    Ok(chunks_written)
}

/// Full web-data build from the configured export.
pub fn build_web_data(config: &BuildConfig) -> Result<BuildReport> {
    build_web_data_for_year(config, current_year())
}

/// Same as [`build_web_data`] with a pinned year ceiling.
pub fn build_web_data_for_year(config: &BuildConfig, current_year: i32) -> Result<BuildReport> {
    config.validate()?;
    validate_output_dir(&config.output_dir, &config.input)?;

    println!("Reading CSV from: {}", config.input.display());
    println!("Output directory: {}\n", config.output_dir.display());

    let spinner = create_spinner(Phase::Read);
    let rows = read_rows(&config.input)?;
    spinner.finish_with_message(format!("Read {} rows", rows.len()));

    let library = build_library(&rows, current_year);
    log::info!(
        "{} rows read, {} accepted, {} dropped",
        library.rows_read,
        library.tracks.len(),
        library.rows_dropped
    );

    let chunks_written = write_library(&library, &config.output_dir, config.chunk_size)?;

    Ok(BuildReport {
        library,
        chunks_written,
        output_dir: config.output_dir.clone(),
    })
}

/// Run one simple extraction and write its JSON document.
/// Returns the number of entries written.
pub fn run_extract(config: &ExtractConfig) -> Result<usize> {
    validate_output_file(&config.output, &config.input)?;
    if let Some(parent) = config.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
    }

    let rows = read_rows(&config.input)?;
    let written = match config.kind {
        ExtractKind::Tracks => {
            let list = extract_tracks(&rows);
            write_json(&config.output, &list)?;
            list.total_tracks
        }
        ExtractKind::Artists => {
            let list = extract_artists(&rows);
            write_json(&config.output, &list)?;
            list.total_artists
        }
        ExtractKind::Albums => {
            let list = extract_albums(&rows);
            write_json(&config.output, &list)?;
            list.total_albums
        }
    };

    println!(
        "Wrote {} {} to {}",
        written,
        config.kind.label(),
        config.output.display()
    );
    Ok(written)
}

/// Print the end-of-build summary.
pub fn print_summary(report: &BuildReport, started: Instant) {
    let metadata = &report.library.collection.metadata;
    let stats = &metadata.stats;

    println!("\n{:=<60}", "");
    println!("BUILD COMPLETE!");
    println!("{:=<60}", "");
    println!("Total Tracks:     {}", metadata.total_tracks);
    println!("Total Artists:    {}", metadata.total_artists);
    println!("Total Albums:     {}", metadata.total_albums);
    println!("Total Size:       {:.2} GB", stats.total_size_gb);
    println!("Total Duration:   {}", stats.total_duration_formatted);
    println!("Avg Bit Rate:     {:.1} kbps", stats.avg_bit_rate);
    println!("Tracks Played:    {}", stats.tracks_with_play_count);
    println!("Tracks Rated:     {}", stats.tracks_with_rating);
    println!("Rows Dropped:     {}", report.library.rows_dropped);
    println!("Elapsed:          {}", format_elapsed(started.elapsed()));
    println!("{:=<60}", "");

    let output =
        std::fs::canonicalize(&report.output_dir).unwrap_or_else(|_| report.output_dir.clone());
    println!("\nOutput directory: {}", output.display());
    println!(
        "Track chunks:     {} files in {}/",
        report.chunks_written,
        CHUNKS_DIR
    );
    println!(
        "Index files:      {}, {}, {}",
        ARTISTS_INDEX_FILE, ALBUMS_INDEX_FILE, METADATA_FILE
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_build_library_scenario() {
        let rows = vec![
            row(&[
                ("Name", "Song A"),
                ("Artist", "Beatles, The"),
                ("Album", "Abbey Road"),
                ("Year", "1969"),
                ("Time", "180"),
            ]),
            row(&[
                ("Name", "Song B"),
                ("Artist", "\"Weezer\""),
                ("Album", ""),
                ("Year", "2020.0"),
                ("Time", "0"),
            ]),
            row(&[("Name", ""), ("Artist", "X"), ("Album", "Y")]),
        ];
        let library = build_library(&rows, 2025);

        assert_eq!(library.rows_read, 3);
        assert_eq!(library.rows_dropped, 1);
        assert_eq!(library.tracks.len(), 2);

        let first = &library.tracks[0];
        assert_eq!(first.artist, "The Beatles");
        assert_eq!(first.year, Some(1969));
        assert_eq!(first.duration_formatted, "3:00");

        // The build path substitutes a placeholder album instead of dropping
        let second = &library.tracks[1];
        assert_eq!(second.id, "track-00001");
        assert_eq!(second.album, "Unknown Album");
        assert_eq!(second.year, Some(2020));

        let metadata = &library.collection.metadata;
        assert_eq!(metadata.total_tracks, 2);
        assert_eq!(metadata.years, vec![1969, 2020]);
        assert_eq!(metadata.total_artists, 2);
        assert_eq!(metadata.total_albums, 2);
    }

    #[test]
    fn test_absurd_numbers_do_not_abort_build() {
        let huge = [
            ("Name", "A"),
            ("Artist", "X"),
            ("Album", "Y"),
            ("Size", "1e19"),
            ("Bit Rate", "9e18"),
        ];
        let rows = vec![row(&huge), row(&huge)];
        let library = build_library(&rows, 2025);
        let stats = &library.collection.metadata.stats;
        assert_eq!(library.tracks.len(), 2);
        assert_eq!(stats.total_size_bytes, i64::MAX);
        assert!(stats.avg_bit_rate > 0.0);
    }

    #[test]
    fn test_build_library_empty() {
        let library = build_library(&[], 2025);
        assert!(library.tracks.is_empty());
        assert_eq!(library.collection.metadata.total_tracks, 0);
    }
}
