use std::{collections::HashMap, sync::Mutex};

use crate::clients::{
    entities::{Album, Artist, CreatedPlaylist, TimeRange, Track, UserProfile},
    errors::{Error, Result},
    service::MusicService,
};

/// In-memory music service used by unit tests. Records every remote call.
#[derive(Default)]
pub(crate) struct FakeService {
    pub authorized: bool,
    pub top: Vec<Track>,
    pub search_results: HashMap<String, Vec<Track>>,
    pub albums: HashMap<String, Vec<Album>>,
    pub album_tracks: HashMap<String, Vec<String>>,
    pub catalog: HashMap<String, Track>,
    pub fail_top_tracks: bool,
    pub fail_add_tracks: bool,
    pub calls: Mutex<Vec<String>>,
    pub playlists: Mutex<Vec<(String, bool, String)>>,
    pub added: Mutex<Vec<(String, Vec<String>)>>,
}

pub(crate) fn track(id: &str, artist_id: &str, popularity: u32) -> Track {
    Track {
        id: id.to_string(),
        name: format!("Song {id}"),
        artists: vec![Artist {
            id: Some(artist_id.to_string()),
            name: format!("Artist {artist_id}"),
        }],
        popularity,
        uri: format!("spotify:track:{id}"),
        url: Some(format!("https://open.spotify.com/track/{id}")),
    }
}

impl FakeService {
    pub fn authorized() -> Self {
        FakeService {
            authorized: true,
            ..Default::default()
        }
    }

    pub fn with_search(mut self, query: &str, tracks: Vec<Track>) -> Self {
        self.search_results.insert(query.to_string(), tracks);
        self
    }

    // Registers an album of the artist and puts its tracks into the catalog
    pub fn with_album(mut self, artist_id: &str, album_id: &str, tracks: Vec<Track>) -> Self {
        self.albums
            .entry(artist_id.to_string())
            .or_default()
            .push(Album {
                id: album_id.to_string(),
                name: format!("Album {album_id}"),
            });
        self.album_tracks.insert(
            album_id.to_string(),
            tracks.iter().map(|t| t.id.clone()).collect(),
        );
        for t in tracks {
            self.catalog.insert(t.id.clone(), t);
        }
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn failure(reason: &str) -> Error {
        Error::IoError(std::io::Error::other(reason.to_string()))
    }
}

impl MusicService for FakeService {
    async fn is_authorized(&self) -> bool {
        self.authorized
    }

    fn authorize_url(&self) -> Result<String> {
        Ok("https://accounts.example.com/authorize?state=fake".to_string())
    }

    async fn complete_authorization(&self, code: &str, state: &str) -> Result<()> {
        self.record(format!("authorize {code}"));
        if state == "fake" {
            Ok(())
        } else {
            Err(Error::AuthorizationError("state mismatch".into()))
        }
    }

    async fn current_user(&self) -> Result<UserProfile> {
        self.record("me".to_string());
        if !self.authorized {
            return Err(Error::Unauthorized);
        }
        Ok(UserProfile {
            id: "listener".to_string(),
            display_name: Some("Listener".to_string()),
        })
    }

    async fn top_tracks(&self, limit: u32, range: TimeRange) -> Result<Vec<Track>> {
        self.record(format!("top_tracks {limit} {range:?}"));
        if self.fail_top_tracks {
            return Err(Self::failure("connection reset"));
        }
        Ok(self.top.iter().take(limit as usize).cloned().collect())
    }

    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<Track>> {
        self.record(format!("search {query} {limit}"));
        Ok(self
            .search_results
            .get(query)
            .map(|tracks| tracks.iter().take(limit as usize).cloned().collect())
            .unwrap_or_default())
    }

    async fn artist_albums(&self, artist_id: &str, limit: u32) -> Result<Vec<Album>> {
        self.record(format!("artist_albums {artist_id} {limit}"));
        Ok(self
            .albums
            .get(artist_id)
            .map(|albums| albums.iter().take(limit as usize).cloned().collect())
            .unwrap_or_default())
    }

    async fn album_track_ids(&self, album_id: &str) -> Result<Vec<String>> {
        self.record(format!("album_tracks {album_id}"));
        Ok(self.album_tracks.get(album_id).cloned().unwrap_or_default())
    }

    async fn track(&self, track_id: &str) -> Result<Track> {
        self.record(format!("track {track_id}"));
        self.catalog
            .get(track_id)
            .cloned()
            .ok_or_else(|| Error::ParseError(format!("unknown track {track_id}")))
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        public: bool,
        description: &str,
    ) -> Result<CreatedPlaylist> {
        self.record(format!("create_playlist {user_id} {name}"));
        let mut playlists = self.playlists.lock().unwrap();
        playlists.push((name.to_string(), public, description.to_string()));
        let id = format!("playlist{}", playlists.len());
        Ok(CreatedPlaylist {
            url: Some(format!("https://open.spotify.com/playlist/{id}")),
            id,
            name: name.to_string(),
        })
    }

    async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<()> {
        self.record(format!("add_tracks {playlist_id} {}", uris.len()));
        if self.fail_add_tracks {
            return Err(Self::failure("rate limited"));
        }
        self.added
            .lock()
            .unwrap()
            .push((playlist_id.to_string(), uris.to_vec()));
        Ok(())
    }
}
