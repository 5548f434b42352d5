//! Chunk writer: paginates the track list and writes every web-data artifact.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::models::{AlbumIndex, ArtistIndex, Metadata, Track, TrackChunk};
use crate::progress::{create_progress_bar, log_progress, Phase};

pub const CHUNKS_DIR: &str = "chunks";
pub const ARTISTS_INDEX_FILE: &str = "artists-index.json";
pub const ALBUMS_INDEX_FILE: &str = "albums-index.json";
pub const METADATA_FILE: &str = "metadata.json";

/// Number of pages needed for `total` tracks.
pub fn chunk_count(total: usize, chunk_size: usize) -> usize {
    total.div_ceil(chunk_size.max(1))
}

/// `tracks-001.json`, `tracks-002.json`, ...
pub fn chunk_file_name(chunk: usize) -> String {
    format!("tracks-{:03}.json", chunk)
}

/// Split tracks into consecutive pages of at most `chunk_size`, numbered from 1.
pub fn paginate(tracks: &[Track], chunk_size: usize) -> Vec<TrackChunk<'_>> {
    let total_chunks = chunk_count(tracks.len(), chunk_size);
    tracks
        .chunks(chunk_size.max(1))
        .enumerate()
        .map(|(i, page)| TrackChunk {
            chunk: i + 1,
            total_chunks,
            count: page.len(),
            tracks: page,
        })
        .collect()
}

/// Write a value as pretty JSON (two-space indent, trailing newline).
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("Failed to write JSON to {}", path.display()))?;
    writer
        .write_all(b"\n")
        .with_context(|| format!("Failed to write {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;
    Ok(())
}

/// Writes one build's artifacts under an output directory.
#[derive(Debug)]
pub struct ChunkWriter {
    output_dir: PathBuf,
    chunks_dir: PathBuf,
    chunk_size: usize,
}

impl ChunkWriter {
    /// Create `output_dir/chunks`, clearing chunk files left by a previous run.
    pub fn create(output_dir: &Path, chunk_size: usize) -> Result<Self> {
        let chunks_dir = output_dir.join(CHUNKS_DIR);
        fs::create_dir_all(&chunks_dir).with_context(|| {
            format!("Failed to create output directory {}", chunks_dir.display())
        })?;

        let removed = remove_stale_chunks(&chunks_dir)?;
        if removed > 0 {
            log::info!("Removed {} chunk files from a previous build", removed);
        }

        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            chunks_dir,
            chunk_size,
        })
    }

    /// Write every page; returns the number of chunk files written.
    pub fn write_chunks(&self, tracks: &[Track]) -> Result<usize> {
        let pages = paginate(tracks, self.chunk_size);
        let total = pages.len() as u64;
        println!("Creating {} track chunks...", total);

        let pb = create_progress_bar(total, Phase::Chunks);
        for page in &pages {
            let path = self.chunks_dir.join(chunk_file_name(page.chunk));
            write_json(&path, page)?;
            pb.inc(1);
            log_progress(Phase::Chunks, page.chunk as u64, total);
        }
        pb.finish_with_message(format!("Wrote {} chunks", total));

        Ok(pages.len())
    }

    pub fn write_artist_index(&self, index: &ArtistIndex) -> Result<PathBuf> {
        let path = self.output_dir.join(ARTISTS_INDEX_FILE);
        write_json(&path, index)?;
        Ok(path)
    }

    pub fn write_album_index(&self, index: &AlbumIndex) -> Result<PathBuf> {
        let path = self.output_dir.join(ALBUMS_INDEX_FILE);
        write_json(&path, index)?;
        Ok(path)
    }

    pub fn write_metadata(&self, metadata: &Metadata) -> Result<PathBuf> {
        let path = self.output_dir.join(METADATA_FILE);
        write_json(&path, metadata)?;
        Ok(path)
    }
}

fn is_chunk_file(name: &str) -> bool {
    name.starts_with("tracks-") && name.ends_with(".json")
}

fn remove_stale_chunks(chunks_dir: &Path) -> Result<usize> {
    let mut removed = 0;
    let entries = fs::read_dir(chunks_dir)
        .with_context(|| format!("Failed to list {}", chunks_dir.display()))?;
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        if name.to_str().is_some_and(is_chunk_file) && entry.path().is_file() {
            fs::remove_file(entry.path())
                .with_context(|| format!("Failed to remove {}", entry.path().display()))?;
            removed += 1;
        }
    }
    Ok(removed)
}
