//! Run configuration, independent of the command line.

use anyhow::{bail, Result};
use std::path::PathBuf;

pub const DEFAULT_INPUT: &str = "archive/compiled_itunes_library.csv";
pub const DEFAULT_OUTPUT_DIR: &str = "web-data";
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

pub const DEFAULT_TRACKS_OUTPUT: &str = "data/tracks.json";
pub const DEFAULT_ARTISTS_OUTPUT: &str = "data/artists.json";
pub const DEFAULT_ALBUMS_OUTPUT: &str = "data/albums.json";

/// Settings for a full web-data build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildConfig {
    /// Tabular library export (CSV with a header row).
    pub input: PathBuf,
    /// Directory receiving `chunks/`, the indexes and `metadata.json`.
    pub output_dir: PathBuf,
    /// Maximum tracks per chunk file.
    pub chunk_size: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl BuildConfig {
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            bail!("chunk size must be at least 1");
        }
        Ok(())
    }
}

/// Which simple extraction to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtractKind {
    Tracks,
    Artists,
    Albums,
}

impl ExtractKind {
    pub fn default_output(self) -> &'static str {
        match self {
            ExtractKind::Tracks => DEFAULT_TRACKS_OUTPUT,
            ExtractKind::Artists => DEFAULT_ARTISTS_OUTPUT,
            ExtractKind::Albums => DEFAULT_ALBUMS_OUTPUT,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExtractKind::Tracks => "tracks",
            ExtractKind::Artists => "artists",
            ExtractKind::Albums => "albums",
        }
    }
}

/// Settings for one simple extraction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractConfig {
    pub kind: ExtractKind,
    pub input: PathBuf,
    pub output: PathBuf,
}

impl ExtractConfig {
    pub fn new(kind: ExtractKind) -> Self {
        Self {
            kind,
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(kind.default_output()),
        }
    }
}
