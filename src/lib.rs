//! Rplaylist - Create a Spotify playlist recommended from your top tracks
//!
//! Your long-term top tracks are used as seeds. Similar tracks are collected
//! from search results and from albums of the seed artists, ranked by
//! popularity and saved as a new private playlist.

/// Client modules for interacting with the music service
pub mod clients;
/// Seed, candidate, ranking and publishing pipeline
pub mod recommender;
/// Web GUI served with axum
pub mod web;
