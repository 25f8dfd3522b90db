use std::{net::SocketAddr, sync::Arc};

use clap::{Parser, Subcommand};
use log::{info, warn};
use rplaylist::{
    clients::{SpotifyClient, errors::Result},
    recommender::{
        ConfigBuilder, DEFAULT_PLAYLIST_NAME, DEFAULT_SEED_LIMIT, DEFAULT_TRACK_LIMIT, Outcome,
        PlaylistRequest, Recommender,
    },
    web::{self, AppState},
};

#[derive(Parser)]
#[command(name = "rplaylist")]
#[command(version, about = "Create a Spotify playlist recommended from your top tracks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web GUI
    Serve {
        #[arg(long, env = "RPLAYLIST_ADDR", default_value = "127.0.0.1:8888")]
        addr: SocketAddr,
    },
    /// Create one playlist from the terminal
    Create {
        #[arg(long, default_value = DEFAULT_PLAYLIST_NAME)]
        name: String,
        /// Number of recommended tracks
        #[arg(long, default_value_t = DEFAULT_TRACK_LIMIT, value_parser = clap::value_parser!(u32).range(10..=100))]
        tracks: u32,
        /// Number of top tracks used as seeds
        #[arg(long, default_value_t = DEFAULT_SEED_LIMIT, value_parser = clap::value_parser!(u32).range(5..=20))]
        seeds: u32,
    },
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { addr } => serve(addr).await,
        Commands::Create {
            name,
            tracks,
            seeds,
        } => {
            create_playlist(PlaylistRequest {
                name,
                track_limit: tracks,
                seed_limit: seeds,
            })
            .await
        }
    }
}

async fn serve(addr: SocketAddr) -> Result<()> {
    let spotify = SpotifyClient::try_default()?;
    if spotify.restore_cached_token().await? {
        info!("Restored cached Spotify token");
    } else {
        info!("No cached Spotify token, log in from the web page");
    }
    let recommender = Recommender::new(Arc::new(spotify), ConfigBuilder::new().build());
    web::serve(AppState::new(recommender), addr).await
}

async fn create_playlist(request: PlaylistRequest) -> Result<()> {
    // Validate before any prompt is shown
    request.validate()?;
    let spotify = SpotifyClient::try_default()?;
    info!("Authorizing Spotify client ...");
    // CLI prompt may be shown here
    spotify.authorize_client().await?;

    let recommender = Recommender::new(Arc::new(spotify), ConfigBuilder::new().build());
    match recommender.run(&request).await? {
        Outcome::Created(summary) => {
            println!(
                "Playlist '{}' with {} tracks was created on Spotify!",
                summary.name, summary.track_count
            );
            if let Some(url) = summary.url {
                println!("Link: {url}");
            }
        }
        Outcome::NoNewTracks { seed_count, .. } => {
            warn!(
                "No new recommended track was found from {seed_count} seeds. Try increasing the number of seeds."
            );
        }
    }
    Ok(())
}
