use std::{
    cmp::Reverse,
    collections::{HashMap, HashSet},
    ops::RangeInclusive,
    sync::Arc,
};

use log::{debug, info, warn};

use crate::clients::{
    MusicService,
    entities::{CreatedPlaylist, TimeRange, Track},
    errors::{Error, Result},
};

/// Allowed number of tracks in the created playlist
pub const TRACK_LIMIT_RANGE: RangeInclusive<u32> = 10..=100;
/// Allowed number of top tracks used as seeds
pub const SEED_LIMIT_RANGE: RangeInclusive<u32> = 5..=20;

/// Name suggested in the form
pub const DEFAULT_PLAYLIST_NAME: &str = "Recommended by Bot";
/// Playlist length suggested in the form
pub const DEFAULT_TRACK_LIMIT: u32 = 30;
/// Seed count suggested in the form
pub const DEFAULT_SEED_LIMIT: u32 = 10;
/// Search hits kept per seed
pub const DEFAULT_PER_SEED: u32 = 3;
/// Albums and singles read per seed artist
pub const DEFAULT_ALBUMS_PER_ARTIST: u32 = 3;
/// Description of every created playlist
pub const DEFAULT_DESCRIPTION: &str = "Generated by rplaylist";

// Spotify accepts at most 100 items per add request
const MAX_ITEMS_PER_REQUEST: usize = 100;

/// Candidate tracks keyed by id, in discovery order.
///
/// Inserting a track whose id is already present replaces the stored track
/// but keeps the position of the first discovery.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CandidatePool {
    tracks: Vec<Track>,
    positions: HashMap<String, usize>,
}

impl CandidatePool {
    /// Empty pool
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a track or replace the one with the same id
    pub fn insert(&mut self, track: Track) {
        if let Some(&position) = self.positions.get(&track.id) {
            self.tracks[position] = track;
        } else {
            self.positions.insert(track.id.clone(), self.tracks.len());
            self.tracks.push(track);
        }
    }

    /// Number of unique candidates
    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether nothing was collected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Candidates in discovery order
    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }
}

impl Extend<Track> for CandidatePool {
    fn extend<I: IntoIterator<Item = Track>>(&mut self, iter: I) {
        for track in iter {
            self.insert(track);
        }
    }
}

impl FromIterator<Track> for CandidatePool {
    fn from_iter<I: IntoIterator<Item = Track>>(iter: I) -> Self {
        let mut pool = CandidatePool::new();
        pool.extend(iter);
        pool
    }
}

impl IntoIterator for CandidatePool {
    type Item = Track;
    type IntoIter = std::vec::IntoIter<Track>;

    fn into_iter(self) -> Self::IntoIter {
        self.tracks.into_iter()
    }
}

/// Fetch the user's long-term top tracks
pub async fn load_seeds<S: MusicService>(service: &S, count: u32) -> Result<Vec<Track>> {
    debug!("Fetching {count} long-term top tracks ...");
    let mut seeds = service.top_tracks(count, TimeRange::LongTerm).await?;
    seeds.truncate(count as usize);
    Ok(seeds)
}

/// Collect candidates around every seed: search matches for "artist title"
/// plus all tracks from a few albums and singles of the seed's primary artist.
///
/// Calls are issued one after another; any remote error aborts the expansion.
pub async fn expand_candidates<S: MusicService>(
    service: &S,
    seeds: &[Track],
    per_seed: u32,
    albums_per_artist: u32,
) -> Result<CandidatePool> {
    let mut pool = CandidatePool::new();

    for seed in seeds {
        let Some(artist) = seed.primary_artist() else {
            debug!("Seed {} has no artist, skipping", seed.id);
            continue;
        };

        let query = format!("{} {}", artist.name, seed.name);
        let found = service.search_tracks(&query, per_seed).await?;
        debug!("Search '{query}' returned {} tracks", found.len());
        pool.extend(found.into_iter().take(per_seed as usize));

        let Some(artist_id) = artist.id.as_deref() else {
            debug!("Artist '{}' has no id, skipping albums", artist.name);
            continue;
        };

        let albums = service.artist_albums(artist_id, albums_per_artist).await?;
        for album in albums.iter().take(albums_per_artist as usize) {
            let track_ids = service.album_track_ids(&album.id).await?;
            debug!("Album '{}' has {} tracks", album.name, track_ids.len());
            for track_id in track_ids {
                pool.insert(service.track(&track_id).await?);
            }
        }
    }

    Ok(pool)
}

/// Drop seeds from the candidates, order by popularity (highest first) and
/// keep at most `max_count` tracks. Equal popularity keeps discovery order.
#[must_use]
pub fn filter_and_rank(pool: CandidatePool, seeds: &[Track], max_count: usize) -> Vec<Track> {
    let seed_ids: HashSet<&str> = seeds.iter().map(|t| t.id.as_str()).collect();
    let mut ranked: Vec<Track> = pool
        .into_iter()
        .filter(|c| !seed_ids.contains(c.id.as_str()))
        .collect();
    // stable sort
    ranked.sort_by_key(|t| Reverse(t.popularity));
    ranked.truncate(max_count);
    ranked
}

/// Create a private playlist for the current user and add the tracks to it.
///
/// A playlist that was created before adding its tracks failed is not removed.
pub async fn publish_playlist<S: MusicService>(
    service: &S,
    name: &str,
    tracks: &[Track],
    description: &str,
) -> Result<CreatedPlaylist> {
    let user = service.current_user().await?;
    let playlist = service
        .create_playlist(&user.id, name, false, description)
        .await?;
    info!("Created private playlist '{}' ({})", playlist.name, playlist.id);

    let uris: Vec<String> = tracks.iter().map(|t| t.uri.clone()).collect();
    for chunk in uris.chunks(MAX_ITEMS_PER_REQUEST) {
        if let Err(e) = service.add_tracks(&playlist.id, chunk).await {
            warn!(
                "Adding tracks failed, playlist {} is left incomplete on Spotify: {e}",
                playlist.id
            );
            return Err(e);
        }
    }
    debug!("Added {} tracks to playlist {}", uris.len(), playlist.id);

    Ok(playlist)
}

/// Parameters chosen by the user for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistRequest {
    /// Name of the new playlist
    pub name: String,
    /// Maximum number of tracks in the playlist
    pub track_limit: u32,
    /// Number of top tracks used as seeds
    pub seed_limit: u32,
}

impl Default for PlaylistRequest {
    fn default() -> Self {
        PlaylistRequest {
            name: DEFAULT_PLAYLIST_NAME.to_string(),
            track_limit: DEFAULT_TRACK_LIMIT,
            seed_limit: DEFAULT_SEED_LIMIT,
        }
    }
}

impl PlaylistRequest {
    /// Reject a blank name and limits outside the allowed ranges
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::ValidationError(
                "Enter a name for the playlist.".into(),
            ));
        }
        if !TRACK_LIMIT_RANGE.contains(&self.track_limit) {
            return Err(Error::ValidationError(format!(
                "Number of recommended tracks must be between {} and {}.",
                TRACK_LIMIT_RANGE.start(),
                TRACK_LIMIT_RANGE.end()
            )));
        }
        if !SEED_LIMIT_RANGE.contains(&self.seed_limit) {
            return Err(Error::ValidationError(format!(
                "Number of top tracks used for inspiration must be between {} and {}.",
                SEED_LIMIT_RANGE.start(),
                SEED_LIMIT_RANGE.end()
            )));
        }
        Ok(())
    }
}

/// What was created, shown to the user afterwards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistSummary {
    /// Spotify id of the created playlist
    pub id: String,
    /// Name as stored by Spotify
    pub name: String,
    /// Tracks added to the playlist
    pub track_count: usize,
    /// Link to open.spotify.com
    pub url: Option<String>,
    /// Seeds that were actually loaded
    pub seed_count: usize,
    /// Unique candidates before filtering
    pub candidate_count: usize,
}

/// Result of a run that didn't fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Playlist created and filled
    Created(PlaylistSummary),
    /// Every candidate was a seed or nothing was found; no playlist was created
    NoNewTracks {
        /// Seeds that were loaded
        seed_count: usize,
        /// Unique candidates before filtering
        candidate_count: usize,
    },
}

/// Configuration for the Recommender struct
#[derive(Debug, Clone)]
pub struct Config {
    /// Search hits kept per seed
    pub per_seed: u32,
    /// Albums and singles read per seed artist
    pub albums_per_artist: u32,
    /// Description of the created playlist
    pub description: String,
}

/// Builder for [`Config`], unset values fall back to the defaults
#[derive(Default)]
pub struct ConfigBuilder {
    per_seed: Option<u32>,
    albums_per_artist: Option<u32>,
    description: Option<String>,
}

impl ConfigBuilder {
    /// Builder with every value unset
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Search hits kept per seed
    #[must_use]
    pub fn per_seed(mut self, per_seed: u32) -> Self {
        self.per_seed = Some(per_seed);
        self
    }

    /// Albums and singles read per seed artist
    #[must_use]
    pub fn albums_per_artist(mut self, albums_per_artist: u32) -> Self {
        self.albums_per_artist = Some(albums_per_artist);
        self
    }

    /// Description of created playlists
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Fill unset values with the defaults
    #[must_use]
    pub fn build(self) -> Config {
        Config {
            per_seed: self.per_seed.unwrap_or(DEFAULT_PER_SEED),
            albums_per_artist: self.albums_per_artist.unwrap_or(DEFAULT_ALBUMS_PER_ARTIST),
            description: self
                .description
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        }
    }
}

/// Runs the whole seed -> candidates -> ranking -> playlist pipeline
pub struct Recommender<S> {
    service: Arc<S>,
    config: Config,
}

impl<S: MusicService> Recommender<S> {
    /// Create a recommender over an authorized service
    pub fn new(service: Arc<S>, config: Config) -> Self {
        Recommender { service, config }
    }

    /// The remote service the stages run against
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Validate the request and run all stages one after another
    pub async fn run(&self, request: &PlaylistRequest) -> Result<Outcome> {
        request.validate()?;
        // Sent as typed, validation only rejects blank names
        let name = request.name.as_str();
        info!("Starting recommendation run for playlist '{name}' ...");

        let seeds = load_seeds(self.service(), request.seed_limit).await?;
        info!(
            "Loaded {} top tracks as seeds, looking for similar candidates ...",
            seeds.len()
        );

        let pool = expand_candidates(
            self.service(),
            &seeds,
            self.config.per_seed,
            self.config.albums_per_artist,
        )
        .await?;
        let candidate_count = pool.len();
        info!("Found {candidate_count} unique candidates");

        let selected = filter_and_rank(pool, &seeds, request.track_limit as usize);
        if selected.is_empty() {
            info!("No new recommended tracks found, playlist not created");
            return Ok(Outcome::NoNewTracks {
                seed_count: seeds.len(),
                candidate_count,
            });
        }

        let playlist =
            publish_playlist(self.service(), name, &selected, &self.config.description).await?;
        info!(
            "Playlist '{}' created with {} tracks",
            playlist.name,
            selected.len()
        );

        Ok(Outcome::Created(PlaylistSummary {
            id: playlist.id,
            name: playlist.name,
            track_count: selected.len(),
            url: playlist.url,
            seed_count: seeds.len(),
            candidate_count,
        }))
    }
}
