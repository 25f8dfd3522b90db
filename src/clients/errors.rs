use rspotify::{ClientError, http::HttpError, model::IdError};
use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors of the clients and the recommendation pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// Remote data that can't be used, e.g. a track without id
    #[error("Failed to parse transmit data, error: {0}")]
    ParseError(String),

    /// Any failed Spotify request
    #[error("Spotify error: {0}")]
    SpotifyError(#[from] ClientError),

    /// Malformed Spotify id or URI
    #[error("Invalid Spotify id: {0}")]
    InvalidId(#[from] IdError),

    /// No token is available yet
    #[error("Not authorized with Spotify, log in first")]
    Unauthorized,

    /// OAuth flow failed or was rejected
    #[error("Authorization failed: {0}")]
    AuthorizationError(String),

    /// Missing or invalid environment configuration
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// User input rejected before any remote call
    #[error("{0}")]
    ValidationError(String),

    /// Binding or serving the web listener failed
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl Error {
    /// Whether the user has to (re-)authorize before trying again
    #[must_use]
    pub fn is_authorization(&self) -> bool {
        match self {
            Error::Unauthorized | Error::AuthorizationError(_) => true,
            Error::SpotifyError(ClientError::InvalidToken) => true,
            Error::SpotifyError(ClientError::Http(err)) => match err.as_ref() {
                HttpError::StatusCode(response) => response.status().as_u16() == 401,
                _ => false,
            },
            _ => false,
        }
    }
}
