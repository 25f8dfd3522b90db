use std::future::Future;

use crate::clients::{
    entities::{Album, CreatedPlaylist, TimeRange, Track, UserProfile},
    errors::Result,
};

/// Remote music service capabilities the recommender depends on.
///
/// `SpotifyClient` is the production implementation. Every call maps to a
/// single remote request; implementations must not retry.
pub trait MusicService: Send + Sync {
    /// Whether an access token is available for user-scoped calls
    fn is_authorized(&self) -> impl Future<Output = bool> + Send;

    /// URL the user has to visit to grant access
    fn authorize_url(&self) -> Result<String>;

    /// Exchange the code received on the redirect for a token and cache it
    fn complete_authorization(
        &self,
        code: &str,
        state: &str,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Profile of the authorized user
    fn current_user(&self) -> impl Future<Output = Result<UserProfile>> + Send;

    /// The user's most played tracks over `range`
    fn top_tracks(
        &self,
        limit: u32,
        range: TimeRange,
    ) -> impl Future<Output = Result<Vec<Track>>> + Send;

    /// Track search with a free text query
    fn search_tracks(&self, query: &str, limit: u32)
    -> impl Future<Output = Result<Vec<Track>>> + Send;

    /// Albums and singles released by the artist
    fn artist_albums(
        &self,
        artist_id: &str,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<Album>>> + Send;

    /// Ids of the tracks on the album
    fn album_track_ids(&self, album_id: &str) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Full track, including its popularity
    fn track(&self, track_id: &str) -> impl Future<Output = Result<Track>> + Send;

    /// New playlist owned by `user_id`
    fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        public: bool,
        description: &str,
    ) -> impl Future<Output = Result<CreatedPlaylist>> + Send;

    /// Append tracks by URI, at most 100 per call
    fn add_tracks(
        &self,
        playlist_id: &str,
        uris: &[String],
    ) -> impl Future<Output = Result<()>> + Send;
}
