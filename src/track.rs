//! # Track Model
//!
//! Plain data types shared by the shuffle core and the playlist service:
//!
//! - [`Track`] - one playable track as the service describes it
//! - [`PlaylistEntry`] - a raw playlist slot, which may not hold a track at all
//!   (local files, tracks removed from the catalogue)
//! - [`Item`] - one occurrence of a track in the shuffle pool or output
//!
//! [`extract_identifiers`] turns a raw track list into a membership set for
//! the favorite and double-weight lookups.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A playable track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Stable unique identifier
    pub id: String,
    /// Opaque playable reference handed back to the service on write
    pub uri: String,
    /// Display label
    pub name: String,
}

impl Track {
    #[must_use]
    pub fn new(id: &str, uri: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            uri: uri.to_string(),
            name: name.to_string(),
        }
    }
}

/// A raw slot in a playlist. `track` is `None` when the service has no
/// playable track behind the slot; such entries are skipped everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlaylistEntry {
    #[serde(default)]
    pub track: Option<Track>,
}

impl From<Track> for PlaylistEntry {
    fn from(track: Track) -> Self {
        Self { track: Some(track) }
    }
}

/// One occurrence of a track inside the shuffle.
///
/// `weight` belongs to the pool entry, not to the track: the same track can
/// sit in the pool twice with different weights once a favorite is re-queued.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: String,
    pub uri: String,
    pub name: String,
    pub is_favorite: bool,
    /// Implies `is_favorite`
    pub is_double: bool,
    pub weight: f64,
}

impl Item {
    /// Build an occurrence from a track and the two membership sets.
    /// Membership in `double_weight_ids` alone is enough to make a favorite.
    #[must_use]
    pub fn from_track(
        track: &Track,
        favorite_ids: &HashSet<String>,
        double_weight_ids: &HashSet<String>,
    ) -> Self {
        let is_double = double_weight_ids.contains(&track.id);
        let is_favorite = is_double || favorite_ids.contains(&track.id);

        Self {
            id: track.id.clone(),
            uri: track.uri.clone(),
            name: track.name.clone(),
            is_favorite,
            is_double,
            weight: 1.0,
        }
    }

    /// Fresh pool entry for the same track carrying `weight`.
    #[must_use]
    pub fn requeued(&self, weight: f64) -> Self {
        Self {
            weight,
            ..self.clone()
        }
    }

    /// Short marker used in previews: `(2x)`, `(1x)` or nothing.
    #[must_use]
    pub fn marker(&self) -> &'static str {
        match (self.is_double, self.is_favorite) {
            (true, _) => "(2x)",
            (false, true) => "(1x)",
            _ => "",
        }
    }
}

/// Collect the identifiers of every present track in `entries`.
///
/// Entries without a track are skipped; duplicates collapse.
#[must_use]
pub fn extract_identifiers(entries: &[PlaylistEntry]) -> HashSet<String> {
    entries
        .iter()
        .filter_map(|entry| entry.track.as_ref())
        .map(|track| track.id.clone())
        .collect()
}
