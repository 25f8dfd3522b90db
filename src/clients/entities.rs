/// Credited artist of a track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artist {
    /// Missing for artists of local files
    pub id: Option<String>,
    /// Display name
    pub name: String,
}

/// Spotify track with the fields the recommender works with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    /// Spotify id, unique per track
    pub id: String,
    /// Track title
    pub name: String,
    /// Credited artists, primary first
    pub artists: Vec<Artist>,
    /// Spotify popularity score, 0 to 100
    pub popularity: u32,
    /// `spotify:track:<id>`, used when adding to a playlist
    pub uri: String,
    /// Link to open.spotify.com
    pub url: Option<String>,
}

impl Track {
    /// First credited artist, the one used for search queries and album lookups
    #[must_use]
    pub fn primary_artist(&self) -> Option<&Artist> {
        self.artists.first()
    }
}

/// Album or single of an artist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Album {
    /// Spotify id
    pub id: String,
    /// Album title
    pub name: String,
}

/// The logged in user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    /// Spotify user id, owner of created playlists
    pub id: String,
    /// Name shown in the GUI, falls back to the id when unset
    pub display_name: Option<String>,
}

/// Playlist returned by Spotify after creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPlaylist {
    /// Spotify id
    pub id: String,
    /// Name as stored by Spotify
    pub name: String,
    /// Link to open.spotify.com
    pub url: Option<String>,
}

/// Listening history window for the top tracks endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeRange {
    /// About the last 4 weeks
    ShortTerm,
    /// About the last 6 months
    MediumTerm,
    /// Several years of history
    #[default]
    LongTerm,
}
