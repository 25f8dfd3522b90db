//! Form based web GUI: authorize, choose parameters, press one button.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use log::info;
use tokio::sync::Mutex;

use crate::{
    clients::{MusicService, errors::Result},
    recommender::Recommender,
};

mod handlers;
mod page;

/// Shared state of the web server. The recommender (and the authorized
/// client inside it) is created once and reused for the process lifetime.
pub struct AppState<S> {
    recommender: Arc<Recommender<S>>,
    // Only one pipeline run at a time
    run_lock: Arc<Mutex<()>>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        AppState {
            recommender: Arc::clone(&self.recommender),
            run_lock: Arc::clone(&self.run_lock),
        }
    }
}

impl<S: MusicService> AppState<S> {
    /// Wrap the recommender for sharing between requests
    pub fn new(recommender: Recommender<S>) -> Self {
        AppState {
            recommender: Arc::new(recommender),
            run_lock: Arc::new(Mutex::new(())),
        }
    }
}

/// Routes of the GUI plus the OAuth redirect target
pub fn router<S: MusicService + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/", get(handlers::index::<S>))
        .route("/generate", post(handlers::generate::<S>))
        .route("/login", get(handlers::login::<S>))
        .route("/callback", get(handlers::callback::<S>))
        .route("/health", get(handlers::health))
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped
pub async fn serve<S: MusicService + 'static>(state: AppState<S>, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Playlist generator is running on http://{addr}");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
