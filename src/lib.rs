//! Weighted playlist shuffle that favours your favourites.
//!
//! Core modules:
//! - [`sampler`] - Favorite-weighted draw with re-queuing
//! - [`gap`] - Minimum repeat gap enforcement
//! - [`redistribute`] - Even spacing of favorite repeats
//! - [`track`] - Track model and identifier extraction
//! - [`rng`] - Injectable random source
//!
//! ### Supporting Modules
//!
//! - [`service`] - Playlist service seam (paging, name lookup, batched writes)
//! - [`library`] - JSON file playlist library
//! - [`shuffle`] - One complete shuffle run
//! - [`config`] - Settings and data directory management
//! - [`cli`] - Command-line interface definitions with clap integration
//! - [`completion`] - Shell completion generation
//!
//! ## Quick Start Example
//!
//! ```
//! use favshuffle::config::ShuffleConfig;
//! use favshuffle::rng::RngSource;
//! use favshuffle::sampler::WeightedSampler;
//! use favshuffle::track::{PlaylistEntry, Track};
//! use std::collections::HashSet;
//!
//! let tracks: Vec<PlaylistEntry> = ["a", "b", "c", "d"]
//!     .iter()
//!     .map(|id| PlaylistEntry::from(Track::new(id, &format!("track:{id}"), id)))
//!     .collect();
//! let favorites: HashSet<String> = ["a".to_string()].into();
//!
//! let sample = WeightedSampler::new(ShuffleConfig::default())
//!     .sample(&tracks, &favorites, &HashSet::new(), &mut RngSource::seeded(1));
//!
//! assert!(sample.items.len() >= 4);
//! assert!(sample.items.len() <= 4 + 2);
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! tracks → extract ids → sampler → [redistribute] → gap pass → write back
//! ```
//!
//! The sampler gives every track one pool entry of weight 1.0. A favorite
//! that gets drawn is put back into the pool (weight 2.0 for 2x favorites),
//! so favorites keep coming round until the target length
//! `unique + 2 * favorites` is reached. Recently emitted tracks are deferred
//! rather than repeated.
//!
//! ## Error Handling
//!
//! Fallible functions return `anyhow::Result`. A missing source or
//! favorites playlist aborts the run before anything is written; the core
//! algorithms themselves never fail.

pub mod cli;
pub mod completion;
pub mod config;
pub mod gap;
pub mod library;
pub mod redistribute;
pub mod rng;
pub mod sampler;
pub mod service;
pub mod shuffle;
pub mod track;
