//! # Shuffle Run
//!
//! One complete shuffle against a [`PlaylistService`]:
//!
//! ```text
//! find source, favorites, 2x favorites → extract ids → sample
//!     → redistribute (optional) / gap pass → write back
//! ```
//!
//! All reads happen before the core runs and the single write happens after
//! it, so a run that fails on a missing playlist never touches anything.

use crate::config::{Settings, ShuffleConfig};
use crate::gap::{count_violations, enforce_item_gap};
use crate::redistribute::redistribute_favorites;
use crate::rng::RandomSource;
use crate::sampler::{SampleStats, WeightedSampler};
use crate::service::{
    create_or_get_playlist, find_playlist_by_name, find_playlist_id, replace_contents,
    PlaylistService,
};
use crate::track::{extract_identifiers, Item};
use anyhow::{bail, Result};
use log::{debug, info, warn};
use std::collections::HashSet;

/// What to shuffle and where to put it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShuffleRequest {
    pub source: String,
    pub favorites: String,
    pub double: String,
    /// `None` reorders the source playlist in place
    pub output: Option<String>,
    pub redistribute: bool,
    /// Compute everything but write nothing
    pub dry_run: bool,
    pub config: ShuffleConfig,
}

impl ShuffleRequest {
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            source: settings.source_playlist.clone(),
            favorites: settings.favorites_playlist.clone(),
            double: settings.double_playlist.clone(),
            output: settings.output_playlist.clone(),
            redistribute: settings.redistribute,
            dry_run: false,
            config: settings.shuffle_config(),
        }
    }
}

/// Result of [`run_shuffle`].
#[derive(Debug, Clone)]
pub struct ShuffleOutcome {
    /// Playlist the order was (or would have been) written to. A dry run
    /// with an output playlist that does not exist yet holds its name.
    pub playlist_id: String,
    /// Raw entries in the source playlist, including empty slots
    pub source_entries: usize,
    pub favorite_ids: usize,
    pub double_ids: usize,
    pub items: Vec<Item>,
    pub stats: SampleStats,
    /// Repeat gap violations left after the gap pass
    pub residual_conflicts: usize,
    pub written: bool,
}

impl ShuffleOutcome {
    #[must_use]
    pub fn uris(&self) -> Vec<String> {
        self.items.iter().map(|item| item.uri.clone()).collect()
    }
}

/// Run one shuffle.
///
/// # Errors
///
/// Returns an error if the source or favorites playlist cannot be found, or
/// if the service fails. Nothing is written in either case.
pub fn run_shuffle<S, R>(
    service: &mut S,
    request: &ShuffleRequest,
    rng: &mut R,
) -> Result<ShuffleOutcome>
where
    S: PlaylistService + ?Sized,
    R: RandomSource + ?Sized,
{
    let Some((source_id, source_tracks)) = find_playlist_by_name(service, &request.source)? else {
        bail!("Could not find playlist: '{}'", request.source);
    };
    info!("Main playlist: {} tracks", source_tracks.len());

    let Some((_, favorite_tracks)) = find_playlist_by_name(service, &request.favorites)? else {
        bail!("Could not find playlist: '{}'", request.favorites);
    };
    let favorite_ids = extract_identifiers(&favorite_tracks);
    if favorite_ids.is_empty() {
        warn!("Favorites playlist '{}' is empty, shuffling without favorites", request.favorites);
    }
    info!("Favorites: {} tracks", favorite_ids.len());

    let double_ids = match find_playlist_by_name(service, &request.double)? {
        Some((_, tracks)) => extract_identifiers(&tracks),
        None => {
            debug!("No 2x playlist '{}', using single-tier weighting", request.double);
            HashSet::new()
        }
    };
    if !double_ids.is_empty() {
        info!("Favorite (2x): {} tracks", double_ids.len());
    }

    let sample = WeightedSampler::new(request.config).sample(
        &source_tracks,
        &favorite_ids,
        &double_ids,
        rng,
    );
    let stats = sample.stats;
    let min_gap = request.config.min_repeat_gap;

    let items = if request.redistribute {
        redistribute_favorites(sample.items, min_gap)
    } else {
        let mut items = sample.items;
        enforce_item_gap(&mut items, min_gap);
        items
    };
    let residual_conflicts = count_violations(&items, min_gap, |item| item.id.as_str());
    info!(
        "Shuffled order: {} tracks (target {}, {:?})",
        items.len(),
        stats.target_length,
        stats.stop
    );

    let playlist_id = match &request.output {
        Some(name) if request.dry_run => find_playlist_id(&*service, name)?.unwrap_or_else(|| {
            info!("Would create playlist '{}'", name.trim());
            name.trim().to_string()
        }),
        Some(name) => {
            let user = service.current_user()?;
            create_or_get_playlist(service, &user.id, name)?
        }
        None => source_id,
    };

    let mut outcome = ShuffleOutcome {
        playlist_id,
        source_entries: source_tracks.len(),
        favorite_ids: favorite_ids.len(),
        double_ids: double_ids.len(),
        items,
        stats,
        residual_conflicts,
        written: false,
    };

    if request.dry_run {
        info!("Dry run, leaving playlist {} untouched", outcome.playlist_id);
    } else {
        replace_contents(service, &outcome.playlist_id, &outcome.uris())?;
        outcome.written = true;
    }

    Ok(outcome)
}

/// Numbered preview of the first `count` items with `(2x)`/`(1x)` markers.
#[must_use]
pub fn preview_lines(items: &[Item], count: usize) -> Vec<String> {
    items
        .iter()
        .take(count)
        .enumerate()
        .map(|(i, item)| {
            format!("  {}. {} {}", i + 1, item.name, item.marker())
                .trim_end()
                .to_string()
        })
        .collect()
}
