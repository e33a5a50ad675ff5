//! # Playlist Service
//!
//! The seam between the shuffle and wherever playlists actually live.
//!
//! A backend implements the small set of paged primitives in
//! [`PlaylistService`]. The operations the shuffle needs are built on top of
//! them as free functions so every backend gets the same paging, name
//! matching and batching rules:
//!
//! - [`find_playlist_by_name`] - trimmed, case-insensitive exact match; walks
//!   every page of playlists and every page of tracks
//! - [`create_or_get_playlist`] - idempotent, new playlists are private
//! - [`replace_contents`] - clear, then append in batches of [`MAX_BATCH`]
//! - [`list_playlists`] - every playlist summary
//!
//! Identifier extraction lives with the track model in
//! [`crate::track::extract_identifiers`].

use crate::track::PlaylistEntry;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Largest number of tracks a single append call may carry.
pub const MAX_BATCH: usize = 100;

/// Page size used when walking playlists.
pub const PLAYLIST_PAGE: usize = 50;

/// Page size used when walking tracks.
pub const TRACK_PAGE: usize = 100;

/// The account the service acts for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub display_name: String,
}

/// A playlist without its tracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub owner_id: String,
}

/// One page of a paged listing. `next` is the offset of the following page,
/// `None` on the last one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<usize>,
}

impl<T> Page<T> {
    /// Cut a page out of a full listing.
    #[must_use]
    pub fn slice(all: &[T], offset: usize, limit: usize) -> Self
    where
        T: Clone,
    {
        let start = offset.min(all.len());
        let end = offset.saturating_add(limit.max(1)).min(all.len());
        Self {
            items: all[start..end].to_vec(),
            next: (end < all.len()).then_some(end),
        }
    }
}

/// Paged primitives a playlist backend provides.
pub trait PlaylistService {
    /// The account playlists are created for.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot identify the user.
    fn current_user(&self) -> Result<User>;

    /// # Errors
    ///
    /// Returns an error if the backend cannot list playlists.
    fn playlists_page(&self, offset: usize, limit: usize) -> Result<Page<PlaylistSummary>>;

    /// # Errors
    ///
    /// Returns an error if the playlist does not exist or cannot be read.
    fn tracks_page(
        &self,
        playlist_id: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Page<PlaylistEntry>>;

    /// Create a playlist and return its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the playlist cannot be created.
    fn create_playlist(&mut self, owner_id: &str, name: &str, public: bool) -> Result<String>;

    /// Remove every track from the playlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the playlist does not exist or cannot be written.
    fn clear_playlist(&mut self, playlist_id: &str) -> Result<()>;

    /// Append `uris` in order. Backends may reject more than [`MAX_BATCH`]
    /// uris per call.
    ///
    /// # Errors
    ///
    /// Returns an error if the playlist does not exist or cannot be written.
    fn append_tracks(&mut self, playlist_id: &str, uris: &[String]) -> Result<()>;
}

fn names_match(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Every playlist visible to the service, across all pages.
///
/// # Errors
///
/// Propagates backend errors.
pub fn list_playlists<S: PlaylistService + ?Sized>(service: &S) -> Result<Vec<PlaylistSummary>> {
    let mut playlists = Vec::new();
    let mut offset = Some(0);
    while let Some(current) = offset {
        let page = service
            .playlists_page(current, PLAYLIST_PAGE)
            .context("Failed to list playlists")?;
        playlists.extend(page.items);
        offset = page.next;
    }
    Ok(playlists)
}

/// Every entry of a playlist, across all pages.
///
/// # Errors
///
/// Propagates backend errors.
pub fn fetch_all_tracks<S: PlaylistService + ?Sized>(
    service: &S,
    playlist_id: &str,
) -> Result<Vec<PlaylistEntry>> {
    let mut tracks = Vec::new();
    let mut offset = Some(0);
    while let Some(current) = offset {
        let page = service
            .tracks_page(playlist_id, current, TRACK_PAGE)
            .with_context(|| format!("Failed to fetch tracks of playlist {playlist_id}"))?;
        tracks.extend(page.items);
        offset = page.next;
    }
    Ok(tracks)
}

/// Find a playlist by name and fetch all of its entries.
///
/// Names are compared trimmed and case-insensitively. Returns `None` when no
/// playlist matches; the first match wins.
///
/// # Errors
///
/// Propagates backend errors.
pub fn find_playlist_by_name<S: PlaylistService + ?Sized>(
    service: &S,
    name: &str,
) -> Result<Option<(String, Vec<PlaylistEntry>)>> {
    let Some(playlist) = list_playlists(service)?
        .into_iter()
        .find(|playlist| names_match(&playlist.name, name))
    else {
        log::debug!("No playlist named '{}'", name.trim());
        return Ok(None);
    };

    let tracks = fetch_all_tracks(service, &playlist.id)?;
    log::debug!("Playlist '{}' ({}) has {} entries", playlist.name, playlist.id, tracks.len());
    Ok(Some((playlist.id, tracks)))
}

/// Id of the first playlist named `name`, without fetching its tracks.
///
/// # Errors
///
/// Propagates backend errors.
pub fn find_playlist_id<S: PlaylistService + ?Sized>(
    service: &S,
    name: &str,
) -> Result<Option<String>> {
    Ok(list_playlists(service)?
        .into_iter()
        .find(|playlist| names_match(&playlist.name, name))
        .map(|playlist| playlist.id))
}

/// Id of the playlist named `name`, creating a private one owned by
/// `owner_id` if none exists.
///
/// # Errors
///
/// Propagates backend errors.
pub fn create_or_get_playlist<S: PlaylistService + ?Sized>(
    service: &mut S,
    owner_id: &str,
    name: &str,
) -> Result<String> {
    if let Some(existing) = find_playlist_id(&*service, name)? {
        log::debug!("Reusing playlist {existing} for '{}'", name.trim());
        return Ok(existing);
    }

    let id = service
        .create_playlist(owner_id, name.trim(), false)
        .with_context(|| format!("Failed to create playlist '{}'", name.trim()))?;
    log::info!("Created playlist '{}' ({id})", name.trim());
    Ok(id)
}

/// Replace the playlist's contents with `uris`, preserving their order.
///
/// # Errors
///
/// Propagates backend errors. A failure part-way leaves the playlist holding
/// the batches written so far.
pub fn replace_contents<S: PlaylistService + ?Sized>(
    service: &mut S,
    playlist_id: &str,
    uris: &[String],
) -> Result<()> {
    service
        .clear_playlist(playlist_id)
        .with_context(|| format!("Failed to clear playlist {playlist_id}"))?;

    for (index, batch) in uris.chunks(MAX_BATCH).enumerate() {
        log::trace!("Appending batch {index} ({} tracks)", batch.len());
        service
            .append_tracks(playlist_id, batch)
            .with_context(|| format!("Failed to append batch {index} to playlist {playlist_id}"))?;
    }

    log::debug!("Wrote {} tracks to playlist {playlist_id}", uris.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::{extract_identifiers, Track};

    #[derive(Debug, PartialEq)]
    enum Call {
        Clear(String),
        Append(String, Vec<String>),
        Create(String, String, bool),
    }

    /// Records mutations and serves tiny pages so paging is exercised.
    #[derive(Default)]
    struct Recorder {
        playlists: Vec<(PlaylistSummary, Vec<PlaylistEntry>)>,
        calls: Vec<Call>,
        page_size: usize,
    }

    impl Recorder {
        fn with_playlists(names: &[&str], page_size: usize) -> Self {
            let playlists = names
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let tracks = (0..7)
                        .map(|t| {
                            PlaylistEntry::from(Track::new(
                                &format!("{i}-{t}"),
                                &format!("uri:{i}-{t}"),
                                "t",
                            ))
                        })
                        .collect();
                    (
                        PlaylistSummary {
                            id: format!("pl{i}"),
                            name: name.to_string(),
                            owner_id: "me".into(),
                        },
                        tracks,
                    )
                })
                .collect();
            Self { playlists, calls: Vec::new(), page_size }
        }
    }

    impl PlaylistService for Recorder {
        fn current_user(&self) -> Result<User> {
            Ok(User { id: "me".into(), display_name: "Me".into() })
        }

        fn playlists_page(&self, offset: usize, limit: usize) -> Result<Page<PlaylistSummary>> {
            let all: Vec<PlaylistSummary> = self.playlists.iter().map(|(p, _)| p.clone()).collect();
            Ok(Page::slice(&all, offset, limit.min(self.page_size)))
        }

        fn tracks_page(
            &self,
            playlist_id: &str,
            offset: usize,
            limit: usize,
        ) -> Result<Page<PlaylistEntry>> {
            let (_, tracks) = self
                .playlists
                .iter()
                .find(|(p, _)| p.id == playlist_id)
                .ok_or_else(|| anyhow::anyhow!("no playlist {playlist_id}"))?;
            Ok(Page::slice(tracks, offset, limit.min(self.page_size)))
        }

        fn create_playlist(&mut self, owner_id: &str, name: &str, public: bool) -> Result<String> {
            self.calls.push(Call::Create(owner_id.into(), name.into(), public));
            let id = format!("pl{}", self.playlists.len());
            self.playlists.push((
                PlaylistSummary { id: id.clone(), name: name.into(), owner_id: owner_id.into() },
                Vec::new(),
            ));
            Ok(id)
        }

        fn clear_playlist(&mut self, playlist_id: &str) -> Result<()> {
            self.calls.push(Call::Clear(playlist_id.into()));
            Ok(())
        }

        fn append_tracks(&mut self, playlist_id: &str, uris: &[String]) -> Result<()> {
            anyhow::ensure!(uris.len() <= MAX_BATCH, "batch too large");
            self.calls.push(Call::Append(playlist_id.into(), uris.to_vec()));
            Ok(())
        }
    }

    #[test]
    fn test_page_slice() {
        let all = vec![1, 2, 3, 4, 5];
        assert_eq!(Page::slice(&all, 0, 2), Page { items: vec![1, 2], next: Some(2) });
        assert_eq!(Page::slice(&all, 4, 2), Page { items: vec![5], next: None });
        assert_eq!(Page::slice(&all, 9, 2), Page { items: Vec::<i32>::new(), next: None });
    }

    #[test]
    fn test_find_playlist_beyond_first_page() {
        let service = Recorder::with_playlists(&["One", "Two", "Three", "  favorites "], 2);

        let (id, tracks) = find_playlist_by_name(&service, "FAVORITES").unwrap().unwrap();

        assert_eq!(id, "pl3");
        assert_eq!(tracks.len(), 7);
        assert_eq!(extract_identifiers(&tracks).len(), 7);
    }

    #[test]
    fn test_find_playlist_missing() {
        let service = Recorder::with_playlists(&["One"], 2);
        assert!(find_playlist_by_name(&service, "Two").unwrap().is_none());
        assert!(find_playlist_by_name(&service, "On").unwrap().is_none());
    }

    #[test]
    fn test_find_playlist_id_is_read_only() {
        let service = Recorder::with_playlists(&["One", "Two", " Three"], 1);

        assert_eq!(find_playlist_id(&service, "three ").unwrap().as_deref(), Some("pl2"));
        assert_eq!(find_playlist_id(&service, "Four").unwrap(), None);
        assert!(service.calls.is_empty());
    }

    #[test]
    fn test_create_or_get_is_idempotent() {
        let mut service = Recorder::with_playlists(&["One"], 2);

        let created = create_or_get_playlist(&mut service, "me", " Shuffled ").unwrap();
        let again = create_or_get_playlist(&mut service, "me", "shuffled").unwrap();
        let existing = create_or_get_playlist(&mut service, "me", "one").unwrap();

        assert_eq!(created, again);
        assert_eq!(existing, "pl0");
        assert_eq!(service.calls, vec![Call::Create("me".into(), "Shuffled".into(), false)]);
    }

    #[test]
    fn test_replace_contents_clears_then_batches() {
        let mut service = Recorder::with_playlists(&["One"], 2);
        let uris: Vec<String> = (0..250).map(|i| format!("uri:{i}")).collect();

        replace_contents(&mut service, "pl0", &uris).unwrap();

        assert_eq!(service.calls.len(), 4);
        assert_eq!(service.calls[0], Call::Clear("pl0".into()));
        let mut written = Vec::new();
        for call in &service.calls[1..] {
            match call {
                Call::Append(id, batch) => {
                    assert_eq!(id, "pl0");
                    assert!(batch.len() <= MAX_BATCH);
                    written.extend(batch.iter().cloned());
                }
                other => panic!("unexpected call {other:?}"),
            }
        }
        assert_eq!(written, uris);
    }

    #[test]
    fn test_replace_with_nothing_only_clears() {
        let mut service = Recorder::with_playlists(&["One"], 2);
        replace_contents(&mut service, "pl0", &[]).unwrap();
        assert_eq!(service.calls, vec![Call::Clear("pl0".into())]);
    }
}
