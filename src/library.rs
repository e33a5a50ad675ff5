//! # JSON Playlist Library
//!
//! A [`PlaylistService`] backed by a single JSON file, so the whole shuffle
//! can run offline. The document looks like:
//!
//! ```json
//! {
//!   "user": { "id": "me", "display_name": "Me" },
//!   "playlists": [
//!     {
//!       "id": "pl-1",
//!       "name": "Allstars",
//!       "owner_id": "me",
//!       "public": false,
//!       "tracks": [
//!         { "track": { "id": "t1", "uri": "track:t1", "name": "Song" } },
//!         { "track": null }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Listings are served in pages like a remote API would, appends over
//! [`MAX_BATCH`] are rejected, and every mutation is written straight back to
//! the file.

use crate::service::{Page, PlaylistService, PlaylistSummary, User, MAX_BATCH};
use crate::track::{PlaylistEntry, Track};
use anyhow::{anyhow, bail, ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// A stored playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPlaylist {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub tracks: Vec<PlaylistEntry>,
}

/// The whole library file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryDocument {
    pub user: User,
    #[serde(default)]
    pub playlists: Vec<StoredPlaylist>,
}

impl Default for LibraryDocument {
    fn default() -> Self {
        Self {
            user: User {
                id: "local".to_string(),
                display_name: "Local user".to_string(),
            },
            playlists: Vec::new(),
        }
    }
}

/// File-backed playlist library.
#[derive(Debug)]
pub struct JsonLibrary {
    path: Option<PathBuf>,
    document: LibraryDocument,
    /// Every track seen in any playlist, by uri. Appends resolve uris
    /// through this so clearing a playlist does not forget its tracks.
    catalogue: HashMap<String, Track>,
    page_size: usize,
}

impl JsonLibrary {
    /// Load the library at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable or not a valid
    /// library document.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!(
                "Library file not found at {}. Create it or pass --library.",
                path.display()
            );
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read library file {}", path.display()))?;
        let document: LibraryDocument = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid library file {}", path.display()))?;

        log::info!(
            "Loaded library {} ({} playlists)",
            path.display(),
            document.playlists.len()
        );
        let mut library = Self::in_memory(document);
        library.path = Some(path.to_path_buf());
        Ok(library)
    }

    /// A library that is never written to disk.
    #[must_use]
    pub fn in_memory(document: LibraryDocument) -> Self {
        let catalogue = document
            .playlists
            .iter()
            .flat_map(|playlist| playlist.tracks.iter())
            .filter_map(|entry| entry.track.clone())
            .map(|track| (track.uri.clone(), track))
            .collect();

        Self {
            path: None,
            document,
            catalogue,
            page_size: usize::MAX,
        }
    }

    /// Serve listings in pages of at most `page_size` items.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    #[must_use]
    pub fn document(&self) -> &LibraryDocument {
        &self.document
    }

    /// Write the document back to its file, if it has one.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let raw = serde_json::to_string_pretty(&self.document)
            .context("Failed to serialize library")?;
        fs::write(path, raw)
            .with_context(|| format!("Failed to write library file {}", path.display()))?;
        log::trace!("Saved library to {}", path.display());
        Ok(())
    }

    fn playlist(&self, playlist_id: &str) -> Result<&StoredPlaylist> {
        self.document
            .playlists
            .iter()
            .find(|playlist| playlist.id == playlist_id)
            .ok_or_else(|| anyhow!("No playlist with id {playlist_id}"))
    }

    fn playlist_mut(&mut self, playlist_id: &str) -> Result<&mut StoredPlaylist> {
        self.document
            .playlists
            .iter_mut()
            .find(|playlist| playlist.id == playlist_id)
            .ok_or_else(|| anyhow!("No playlist with id {playlist_id}"))
    }

    fn next_playlist_id(&self) -> String {
        (self.document.playlists.len() + 1..)
            .map(|n| format!("pl-{n}"))
            .find(|id| self.playlist(id).is_err())
            .unwrap_or_else(|| "pl-new".to_string())
    }
}

impl PlaylistService for JsonLibrary {
    fn current_user(&self) -> Result<User> {
        Ok(self.document.user.clone())
    }

    fn playlists_page(&self, offset: usize, limit: usize) -> Result<Page<PlaylistSummary>> {
        let summaries: Vec<PlaylistSummary> = self
            .document
            .playlists
            .iter()
            .map(|playlist| PlaylistSummary {
                id: playlist.id.clone(),
                name: playlist.name.clone(),
                owner_id: playlist.owner_id.clone(),
            })
            .collect();
        Ok(Page::slice(&summaries, offset, limit.min(self.page_size)))
    }

    fn tracks_page(
        &self,
        playlist_id: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Page<PlaylistEntry>> {
        let playlist = self.playlist(playlist_id)?;
        Ok(Page::slice(&playlist.tracks, offset, limit.min(self.page_size)))
    }

    fn create_playlist(&mut self, owner_id: &str, name: &str, public: bool) -> Result<String> {
        let id = self.next_playlist_id();
        self.document.playlists.push(StoredPlaylist {
            id: id.clone(),
            name: name.to_string(),
            owner_id: owner_id.to_string(),
            public,
            tracks: Vec::new(),
        });
        self.save()?;
        Ok(id)
    }

    fn clear_playlist(&mut self, playlist_id: &str) -> Result<()> {
        self.playlist_mut(playlist_id)?.tracks.clear();
        self.save()
    }

    fn append_tracks(&mut self, playlist_id: &str, uris: &[String]) -> Result<()> {
        ensure!(
            uris.len() <= MAX_BATCH,
            "Cannot append {} tracks in one call (limit {MAX_BATCH})",
            uris.len()
        );

        let entries = uris
            .iter()
            .map(|uri| {
                self.catalogue
                    .get(uri)
                    .cloned()
                    .map(PlaylistEntry::from)
                    .ok_or_else(|| anyhow!("Unknown track uri {uri}"))
            })
            .collect::<Result<Vec<_>>>()?;

        self.playlist_mut(playlist_id)?.tracks.extend(entries);
        self.save()
    }
}
