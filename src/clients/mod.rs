/// Data entities for tracks, albums, users and playlists
pub mod entities;
/// Error types and result aliases
pub mod errors;
/// Capability trait over the remote music service
pub mod service;
/// Spotify API client
pub mod spotify;

#[cfg(test)]
pub(crate) mod fake;

pub use service::MusicService;
pub use spotify::SpotifyClient;
