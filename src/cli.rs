//! # Command-Line Interface Module
//!
//! Defines the command-line interface for favshuffle using Clap derive macros.
//!
//! ## Commands
//!
//! - `shuffle`: Reorder a playlist so favorites come round more often
//! - `playlists`: List every playlist in the library
//! - `completion`: Generate shell completion scripts
//!
//! ## Examples
//!
//! ```bash
//! favshuffle shuffle
//! favshuffle shuffle --source "Road Trip" --redistribute --min-gap 4
//! favshuffle --library ~/music/library.json playlists
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

/// Main application arguments structure.
#[derive(Parser, Debug)]
#[command(name = "favshuffle")]
#[command(about = "favshuffle: weighted playlist shuffle that favours your favourites")]
#[command(version)]
pub struct Args {
    /// Playlist library file (defaults to the platform data directory)
    #[arg(long, global = true, env = "FAVSHUFFLE_LIBRARY", value_hint = clap::ValueHint::FilePath)]
    pub library: Option<PathBuf>,

    /// Settings file (defaults to the platform config directory)
    #[arg(long, global = true, env = "FAVSHUFFLE_CONFIG", value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Enumeration of all available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Shuffle a playlist, weighting favorites
    ///
    /// Every track of the source playlist appears at least once (unless the
    /// shuffle runs out of tracks it may play), while tracks from the
    /// favorites playlist come back about twice more and tracks from the 2x
    /// playlist come back more often still. The same track never plays
    /// again within `--min-gap` positions where that can be avoided.
    ///
    /// Without `--output` the source playlist is reordered in place.
    Shuffle {
        /// Playlist to shuffle
        #[arg(long)]
        source: Option<String>,

        /// Playlist whose tracks are favorites
        #[arg(long)]
        favorites: Option<String>,

        /// Playlist whose tracks are 2x favorites (optional)
        #[arg(long)]
        double: Option<String>,

        /// Write into this playlist (created if needed) instead of the source
        #[arg(long)]
        output: Option<String>,

        /// Minimum distance between repeats of the same track
        #[arg(long)]
        min_gap: Option<usize>,

        /// Spread each favorite's repeats evenly over the whole playlist
        #[arg(long)]
        redistribute: bool,

        /// Seed for a reproducible shuffle
        #[arg(long)]
        seed: Option<u64>,

        /// Number of tracks to preview after shuffling
        #[arg(long)]
        preview: Option<usize>,

        /// Show the result without writing it
        #[arg(long)]
        dry_run: bool,
    },

    /// List every playlist in the library
    Playlists,

    /// Generate shell completions
    ///
    /// Usage: favshuffle completion bash > ~/.local/share/bash-completion/completions/favshuffle
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}
