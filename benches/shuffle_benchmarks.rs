//! # favshuffle Performance Benchmarks
//!
//! Benchmarks for the shuffle core: sampling, the gap pass and
//! redistribution, over playlists of realistic sizes.
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//!
//! # Run a specific group
//! cargo bench sampler
//! cargo bench gap
//! ```

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use favshuffle::config::ShuffleConfig;
use favshuffle::gap::enforce_item_gap;
use favshuffle::redistribute::redistribute_favorites;
use favshuffle::rng::RngSource;
use favshuffle::sampler::WeightedSampler;
use favshuffle::track::{extract_identifiers, Item, PlaylistEntry, Track};
use std::collections::HashSet;
use std::hint::black_box;

/// Playlist of `count` tracks; every 10th is a favorite, every 40th a 2x one.
fn create_test_playlist(count: usize) -> (Vec<PlaylistEntry>, HashSet<String>, HashSet<String>) {
    let tracks: Vec<PlaylistEntry> = (0..count)
        .map(|i| {
            PlaylistEntry::from(Track::new(
                &format!("t{i:05}"),
                &format!("track:t{i:05}"),
                &format!("Song {i:05}"),
            ))
        })
        .collect();
    let favorites: Vec<PlaylistEntry> = tracks.iter().step_by(10).cloned().collect();
    let doubles: Vec<PlaylistEntry> = tracks.iter().step_by(40).cloned().collect();

    let favorite_ids = extract_identifiers(&favorites);
    let double_ids = extract_identifiers(&doubles);
    (tracks, favorite_ids, double_ids)
}

fn sampled(count: usize) -> Vec<Item> {
    let (tracks, favorites, doubles) = create_test_playlist(count);
    WeightedSampler::default()
        .sample(&tracks, &favorites, &doubles, &mut RngSource::seeded(1))
        .items
}

/// Benchmark the weighted sampler
fn benchmark_sampler(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampler");
    let sampler = WeightedSampler::new(ShuffleConfig::default());

    for size in [50, 200, 1000].iter() {
        let playlist = create_test_playlist(*size);

        group.bench_with_input(
            BenchmarkId::new("sample", size),
            &playlist,
            |b, (tracks, favorites, doubles)| {
                let mut rng = RngSource::seeded(7);
                b.iter(|| sampler.sample(black_box(tracks), favorites, doubles, &mut rng))
            },
        );
    }

    group.finish();
}

/// Benchmark the gap pass and redistribution on sampler output
fn benchmark_placement(c: &mut Criterion) {
    let mut group = c.benchmark_group("gap");

    for size in [200, 1000].iter() {
        let items = sampled(*size);

        group.bench_with_input(BenchmarkId::new("enforce", size), &items, |b, items| {
            b.iter_batched(
                || items.clone(),
                |mut items| enforce_item_gap(black_box(&mut items), 3),
                BatchSize::SmallInput,
            )
        });

        group.bench_with_input(BenchmarkId::new("redistribute", size), &items, |b, items| {
            b.iter_batched(
                || items.clone(),
                |items| redistribute_favorites(black_box(items), 3),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_sampler, benchmark_placement);

criterion_main!(benches);
