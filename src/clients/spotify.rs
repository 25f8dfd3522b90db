use std::path::PathBuf;

use log::debug;

use crate::clients::{
    entities::{Album, Artist, CreatedPlaylist, TimeRange, Track, UserProfile},
    errors::{Error, Result},
    service::MusicService,
};
use rspotify::{
    AuthCodeSpotify, Config, Credentials, OAuth,
    model::{
        AlbumId, AlbumType, ArtistId, FullTrack, PlayableId, PlaylistId, SearchResult, SearchType,
        TimeRange as SpotifyTimeRange, TrackId, UserId,
    },
    prelude::*,
    scopes,
};

// Album listings are read from the first page only
const ALBUM_TRACKS_PAGE_SIZE: u32 = 50;

impl TryFrom<FullTrack> for Track {
    type Error = Error;

    fn try_from(f: FullTrack) -> Result<Track> {
        let id = f
            .id
            .ok_or_else(|| Error::ParseError(format!("Track '{}' has no Spotify id", f.name)))?;
        Ok(Track {
            uri: id.uri(),
            id: id.id().to_string(),
            name: f.name,
            artists: f
                .artists
                .into_iter()
                .map(|a| Artist {
                    id: a.id.map(|id| id.id().to_string()),
                    name: a.name,
                })
                .collect(),
            popularity: f.popularity,
            url: f.external_urls.get("spotify").cloned(),
        })
    }
}

impl From<TimeRange> for SpotifyTimeRange {
    fn from(range: TimeRange) -> Self {
        match range {
            TimeRange::ShortTerm => SpotifyTimeRange::ShortTerm,
            TimeRange::MediumTerm => SpotifyTimeRange::MediumTerm,
            TimeRange::LongTerm => SpotifyTimeRange::LongTerm,
        }
    }
}

// Local files and other unplayable items come back without an id
fn into_tracks(items: Vec<FullTrack>) -> Vec<Track> {
    items
        .into_iter()
        .filter_map(|item| match Track::try_from(item) {
            Ok(track) => Some(track),
            Err(e) => {
                debug!("Skipping track: {e}");
                None
            }
        })
        .collect()
}

/// Spotify Web API client authorized with the authorization code flow
pub struct SpotifyClient {
    /// Underlying rspotify client, owns the token
    pub spotify: AuthCodeSpotify,
}

impl SpotifyClient {
    /// Authorize the Spotify client via CLI prompt and OAuth flow
    /// This function requires the `cli` feature enabled.
    pub async fn authorize_client(&self) -> Result<()> {
        debug!("Starting Spotify authorization ...");
        let url = self.spotify.get_authorize_url(false)?;
        // Reuses the cached token when there is one
        self.spotify.prompt_for_token(&url).await?;
        let user = self.spotify.me().await?;
        debug!("Authenticated as user: {:?}", user.display_name);
        Ok(())
    }

    /// Load a previously cached token so the web flow doesn't ask for a login on every start.
    /// Expired tokens are accepted, rspotify refreshes them on the first request.
    pub async fn restore_cached_token(&self) -> Result<bool> {
        let token = match self.spotify.read_token_cache(true).await {
            Ok(Some(token)) => token,
            Ok(None) => {
                debug!("No cached Spotify token found");
                return Ok(false);
            }
            Err(e) => {
                debug!("Failed to read cached Spotify token: {e}");
                return Ok(false);
            }
        };
        *self
            .spotify
            .token
            .lock()
            .await
            .map_err(|_| Error::AuthorizationError("token store is unavailable".into()))? =
            Some(token);
        debug!("Restored cached Spotify token");
        Ok(true)
    }

    /// Create a SpotifyClient from environment variables or raise a configuration error
    pub fn try_default() -> Result<Self> {
        let creds = Credentials::from_env()
        .ok_or_else(|| Error::ConfigurationError("Missing Spotify credentials in environment variables (RSPOTIFY_CLIENT_ID, RSPOTIFY_CLIENT_SECRET).".into()))?;
        let oauth = OAuth::from_env(scopes!(
            "user-library-read",
            "user-top-read",
            "playlist-modify-private"
        ))
        .ok_or_else(|| Error::ConfigurationError("Missing Spotify OAuth configuration in environment variables (RSPOTIFY_REDIRECT_URI).".into()))?;

        // Set up token caching in a default cache directory
        let cache_path = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp")) // Fallback to /tmp if cache directory can't be determined
            .join(".rplaylist_cache");

        let spotify = AuthCodeSpotify::with_config(
            creds,
            oauth,
            Config {
                token_cached: true,
                token_refreshing: true,
                cache_path,
                ..Default::default()
            },
        );

        Ok(Self { spotify })
    }
}

impl MusicService for SpotifyClient {
    async fn is_authorized(&self) -> bool {
        match self.spotify.token.lock().await {
            Ok(token) => token.is_some(),
            Err(_) => false,
        }
    }

    fn authorize_url(&self) -> Result<String> {
        Ok(self.spotify.get_authorize_url(false)?)
    }

    async fn complete_authorization(&self, code: &str, state: &str) -> Result<()> {
        if state != self.spotify.oauth.state {
            return Err(Error::AuthorizationError(
                "state returned by Spotify does not match this session".into(),
            ));
        }
        // Also writes the token cache
        self.spotify.request_token(code).await?;
        let user = self.spotify.me().await?;
        debug!("Authenticated as user: {:?}", user.display_name);
        Ok(())
    }

    async fn current_user(&self) -> Result<UserProfile> {
        let user = self.spotify.me().await?;
        Ok(UserProfile {
            id: user.id.id().to_string(),
            display_name: user.display_name,
        })
    }

    async fn top_tracks(&self, limit: u32, range: TimeRange) -> Result<Vec<Track>> {
        let page = self
            .spotify
            .current_user_top_tracks_manual(Some(range.into()), Some(limit), None)
            .await?;
        Ok(into_tracks(page.items))
    }

    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<Track>> {
        let result = self
            .spotify
            .search(query, SearchType::Track, None, None, Some(limit), None)
            .await?;
        match result {
            SearchResult::Tracks(page) => Ok(into_tracks(page.items)),
            _ => Ok(Vec::new()),
        }
    }

    async fn artist_albums(&self, artist_id: &str, limit: u32) -> Result<Vec<Album>> {
        let artist_id = ArtistId::from_id(artist_id)?;
        let page = self
            .spotify
            .artist_albums_manual(
                artist_id,
                [AlbumType::Album, AlbumType::Single],
                None,
                Some(limit),
                None,
            )
            .await?;
        Ok(page
            .items
            .into_iter()
            .filter_map(|album| {
                Some(Album {
                    id: album.id?.id().to_string(),
                    name: album.name,
                })
            })
            .collect())
    }

    async fn album_track_ids(&self, album_id: &str) -> Result<Vec<String>> {
        let album_id = AlbumId::from_id(album_id)?;
        let page = self
            .spotify
            .album_track_manual(album_id, None, Some(ALBUM_TRACKS_PAGE_SIZE), None)
            .await?;
        Ok(page
            .items
            .into_iter()
            .filter_map(|t| t.id.map(|id| id.id().to_string()))
            .collect())
    }

    async fn track(&self, track_id: &str) -> Result<Track> {
        let track_id = TrackId::from_id(track_id)?;
        let track = self.spotify.track(track_id, None).await?;
        Track::try_from(track)
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        public: bool,
        description: &str,
    ) -> Result<CreatedPlaylist> {
        let user_id = UserId::from_id(user_id)?;
        let playlist = self
            .spotify
            .user_playlist_create(user_id, name, Some(public), Some(false), Some(description))
            .await?;
        Ok(CreatedPlaylist {
            id: playlist.id.id().to_string(),
            name: playlist.name,
            url: playlist.external_urls.get("spotify").cloned(),
        })
    }

    async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<()> {
        let playlist_id = PlaylistId::from_id(playlist_id)?;
        let items = uris
            .iter()
            .map(|uri| TrackId::from_uri(uri).map(PlayableId::Track))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        self.spotify
            .playlist_add_items(playlist_id, items, None)
            .await?;
        Ok(())
    }
}
