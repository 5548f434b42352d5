use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;

use itunes_web_data::config::{BuildConfig, ExtractConfig, ExtractKind, DEFAULT_CHUNK_SIZE};
use itunes_web_data::pipeline::{build_web_data, print_summary, run_extract};
use itunes_web_data::progress::set_log_only;

#[derive(Parser)]
#[command(name = "itunes-web-data")]
#[command(about = "Build browsable web data from a music library export")]
struct Args {
    /// Hide progress bars and print periodic progress lines instead
    #[arg(long, global = true)]
    log_only: bool,

    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build chunked tracks, artist/album indexes and metadata
    Build {
        /// Library export CSV
        #[arg(long)]
        input: Option<PathBuf>,

        /// Output directory (overwritten)
        #[arg(long)]
        output: Option<PathBuf>,

        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,
    },
    /// Extract a flat track list
    ExtractTracks {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Extract artists with their albums
    ExtractArtists {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Extract albums with their artists
    ExtractAlbums {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn extract_config(
    kind: ExtractKind,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
) -> ExtractConfig {
    let defaults = ExtractConfig::new(kind);
    ExtractConfig {
        kind,
        input: input.unwrap_or(defaults.input),
        output: output.unwrap_or(defaults.output),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    set_log_only(args.log_only);
    let start = Instant::now();

    match args.command {
        Command::Build {
            input,
            output,
            chunk_size,
        } => {
            let defaults = BuildConfig::default();
            let config = BuildConfig {
                input: input.unwrap_or(defaults.input),
                output_dir: output.unwrap_or(defaults.output_dir),
                chunk_size,
            };
            let report = build_web_data(&config)?;
            print_summary(&report, start);
        }
        Command::ExtractTracks { input, output } => {
            run_extract(&extract_config(ExtractKind::Tracks, input, output))?;
        }
        Command::ExtractArtists { input, output } => {
            run_extract(&extract_config(ExtractKind::Artists, input, output))?;
        }
        Command::ExtractAlbums { input, output } => {
            run_extract(&extract_config(ExtractKind::Albums, input, output))?;
        }
    }

    Ok(())
}
