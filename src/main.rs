//! # favshuffle
//!
//! Reorders a playlist so that favorites come round more often and further
//! apart, then writes the new order back.
//!
//! ## Usage
//!
//! ```bash
//! # Shuffle with the playlist names from settings.json
//! favshuffle shuffle
//!
//! # Try a different source without touching anything
//! favshuffle shuffle --source "Road Trip" --dry-run --preview 30
//!
//! # See what the library holds
//! favshuffle playlists
//! ```

use anyhow::Result;
use clap::{CommandFactory, Parser};
use favshuffle::config::{self, Settings};
use favshuffle::library::JsonLibrary;
use favshuffle::rng::{RandomSource, RngSource};
use favshuffle::service::{self, PlaylistService};
use favshuffle::shuffle::{self, ShuffleRequest};
use favshuffle::{cli, completion};
use log::{debug, info};

/// Main entry point for favshuffle.
///
/// Initializes logging, parses command-line arguments, and routes commands.
///
/// # Logging
///
/// Initializes environment logger which can be controlled via `RUST_LOG`:
/// - `RUST_LOG=debug favshuffle shuffle` - Enable debug logging
/// - `RUST_LOG=favshuffle::sampler=trace favshuffle shuffle` - Every draw
fn main() -> Result<()> {
    env_logger::init();

    let args = cli::Args::parse();

    let settings_path = match &args.config {
        Some(path) => path.clone(),
        None => config::get_settings_path()?,
    };
    let settings = Settings::load(&settings_path)?;

    match args.command {
        cli::Command::Shuffle {
            source,
            favorites,
            double,
            output,
            min_gap,
            redistribute,
            seed,
            preview,
            dry_run,
        } => {
            let mut request = ShuffleRequest::from_settings(&settings);
            if let Some(source) = source {
                request.source = source;
            }
            if let Some(favorites) = favorites {
                request.favorites = favorites;
            }
            if let Some(double) = double {
                request.double = double;
            }
            if output.is_some() {
                request.output = output;
            }
            if let Some(min_gap) = min_gap {
                request.config.min_repeat_gap = min_gap;
            }
            request.redistribute |= redistribute;
            request.dry_run = dry_run;

            let mut library = open_library(args.library.as_ref(), &settings)?;
            let user = library.current_user()?;
            println!("Authenticated as: {}", user.display_name);

            let mut rng: Box<dyn RandomSource> = match seed {
                Some(seed) => {
                    debug!("Using seed {seed}");
                    Box::new(RngSource::seeded(seed))
                }
                None => Box::new(RngSource::thread()),
            };

            let outcome = shuffle::run_shuffle(&mut library, &request, rng.as_mut())?;

            println!("Main playlist: {} tracks", outcome.source_entries);
            println!("Favorites: {} tracks", outcome.favorite_ids);
            if outcome.double_ids > 0 {
                println!("Favorite (2x): {} tracks", outcome.double_ids);
            }

            println!("\nShuffled order: {} tracks", outcome.items.len());
            let preview = preview.unwrap_or(settings.preview);
            for line in shuffle::preview_lines(&outcome.items, preview) {
                println!("{line}");
            }
            if outcome.residual_conflicts > 0 {
                info!(
                    "{} repeats closer than {} tracks could not be avoided",
                    outcome.residual_conflicts, request.config.min_repeat_gap
                );
            }

            if outcome.written {
                println!("\nDone. Playlist reordered.");
            } else {
                println!("\nDry run, nothing written.");
            }
        }
        cli::Command::Playlists => {
            let library = open_library(args.library.as_ref(), &settings)?;
            println!("Your playlists:");
            for playlist in service::list_playlists(&library)? {
                println!("  - '{}'", playlist.name);
            }
        }
        cli::Command::Completion { shell } => {
            let mut cmd = cli::Args::command();
            completion::generate_completions(
                completion::shell_to_completion_shell(shell),
                &mut cmd,
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

/// Open the library from the CLI flag, then settings, then the default path.
fn open_library(flag: Option<&std::path::PathBuf>, settings: &Settings) -> Result<JsonLibrary> {
    let path = match flag.or(settings.library_path.as_ref()) {
        Some(path) => path.clone(),
        None => config::get_library_path()?,
    };
    info!("Using library {}", path.display());
    JsonLibrary::open(&path)
}
