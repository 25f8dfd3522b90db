use axum::{
    Form, Json,
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use log::{debug, warn};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    clients::MusicService,
    recommender::{Outcome, PlaylistRequest},
    web::{
        AppState,
        page::{self, Notice, Page},
    },
};

/// Fields posted by the generate form
#[derive(Debug, Deserialize)]
pub struct PlaylistForm {
    #[serde(default)]
    pub name: String,
    pub track_limit: u32,
    pub seed_limit: u32,
}

impl From<PlaylistForm> for PlaylistRequest {
    fn from(form: PlaylistForm) -> Self {
        PlaylistRequest {
            name: form.name,
            track_limit: form.track_limit,
            seed_limit: form.seed_limit,
        }
    }
}

/// Query of the OAuth redirect
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

const LOGIN_REQUIRED: &str = "You are not logged in to Spotify.";

pub async fn index<S: MusicService + 'static>(State(state): State<AppState<S>>) -> Html<String> {
    let mut page = Page::new(PlaylistRequest::default());
    let service = state.recommender.service();

    if service.is_authorized().await {
        match service.current_user().await {
            Ok(user) => page.user = Some(user.display_name.unwrap_or(user.id)),
            Err(e) => {
                warn!("Failed to load current user: {e}");
                page = page.notice(Notice::Login(format!("Authorization failed: {e}.")));
            }
        }
    } else {
        page = page.notice(Notice::Login(LOGIN_REQUIRED.to_string()));
    }

    Html(page::render(&page))
}

pub async fn generate<S: MusicService + 'static>(
    State(state): State<AppState<S>>,
    Form(form): Form<PlaylistForm>,
) -> Html<String> {
    let request = PlaylistRequest::from(form);
    let page = Page::new(request.clone());

    // Validation problems never reach Spotify
    if let Err(e) = request.validate() {
        return Html(page::render(&page.notice(Notice::Warning(e.to_string()))));
    }

    if !state.recommender.service().is_authorized().await {
        return Html(page::render(
            &page.notice(Notice::Login(LOGIN_REQUIRED.to_string())),
        ));
    }

    let Ok(_running) = state.run_lock.try_lock() else {
        debug!("Rejected generate request, another run is in progress");
        return Html(page::render(&page.notice(Notice::Warning(
            "A playlist is already being generated. Wait for it to finish.".to_string(),
        ))));
    };

    let page = match state.recommender.run(&request).await {
        Ok(Outcome::Created(summary)) => page
            .notice(Notice::Info(format!(
                "Loaded {} of your top tracks for inspiration and found {} candidates.",
                summary.seed_count, summary.candidate_count
            )))
            .notice(Notice::Success {
                name: summary.name,
                track_count: summary.track_count,
                url: summary.url,
            }),
        Ok(Outcome::NoNewTracks { seed_count, .. }) => page
            .notice(Notice::Info(format!(
                "Loaded {seed_count} of your top tracks for inspiration."
            )))
            .notice(Notice::Warning(
                "No new recommended track was found. Try increasing the number of seeds."
                    .to_string(),
            )),
        Err(e) if e.is_authorization() => {
            warn!("Playlist generation needs a new login: {e}");
            page.notice(Notice::Login(format!("Authorization failed: {e}.")))
        }
        Err(e) => {
            warn!("Playlist generation failed: {e}");
            page.notice(Notice::Error(format!(
                "An error occurred while generating the playlist: {e}"
            )))
        }
    };

    Html(page::render(&page))
}

pub async fn login<S: MusicService + 'static>(State(state): State<AppState<S>>) -> Response {
    match state.recommender.service().authorize_url() {
        Ok(url) => Redirect::to(&url).into_response(),
        Err(e) => {
            warn!("Failed to build authorization URL: {e}");
            let page = Page::new(PlaylistRequest::default())
                .notice(Notice::Error(format!("Cannot start Spotify login: {e}")));
            Html(page::render(&page)).into_response()
        }
    }
}

pub async fn callback<S: MusicService + 'static>(
    State(state): State<AppState<S>>,
    Query(params): Query<CallbackParams>,
) -> Response {
    let page = Page::new(PlaylistRequest::default());

    if let Some(error) = params.error {
        return Html(page::render(&page.notice(Notice::Login(format!(
            "Spotify authorization was not granted ({error})."
        )))))
        .into_response();
    }

    let (Some(code), Some(oauth_state)) = (params.code, params.state) else {
        return Html(page::render(&page.notice(Notice::Login(
            "Spotify did not return an authorization code.".to_string(),
        ))))
        .into_response();
    };

    match state
        .recommender
        .service()
        .complete_authorization(&code, &oauth_state)
        .await
    {
        Ok(()) => Redirect::to("/").into_response(),
        Err(e) => {
            warn!("Token exchange failed: {e}");
            Html(page::render(
                &page.notice(Notice::Login(format!("Login failed: {e}."))),
            ))
            .into_response()
        }
    }
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
