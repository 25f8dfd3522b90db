use crate::recommender::{PlaylistRequest, SEED_LIMIT_RANGE, TRACK_LIMIT_RANGE};

/// Message banner shown above the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Success {
        name: String,
        track_count: usize,
        url: Option<String>,
    },
    Warning(String),
    Error(String),
    /// Authorization is missing or expired
    Login(String),
}

#[derive(Debug, Clone)]
pub struct Page {
    pub request: PlaylistRequest,
    pub user: Option<String>,
    pub notices: Vec<Notice>,
}

impl Page {
    pub fn new(request: PlaylistRequest) -> Self {
        Page {
            request,
            user: None,
            notices: Vec::new(),
        }
    }

    #[must_use]
    pub fn notice(mut self, notice: Notice) -> Self {
        self.notices.push(notice);
        self
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn render_notice(notice: &Notice) -> String {
    match notice {
        Notice::Info(message) => format!(r#"<div class="notice info">{}</div>"#, escape(message)),
        Notice::Success {
            name,
            track_count,
            url,
        } => {
            let link = url.as_deref().map_or_else(String::new, |url| {
                let url = escape(url);
                format!(r#"<p>Link: <a href="{url}" target="_blank">{url}</a></p>"#)
            });
            format!(
                r#"<div class="notice success"><p>Playlist <strong>{}</strong> with {track_count} tracks was created on Spotify!</p>{link}</div>"#,
                escape(name)
            )
        }
        Notice::Warning(message) => {
            format!(r#"<div class="notice warning">{}</div>"#, escape(message))
        }
        Notice::Error(message) => format!(r#"<div class="notice error">{}</div>"#, escape(message)),
        Notice::Login(message) => format!(
            r#"<div class="notice warning">{} <a href="/login">Log in with Spotify</a></div>"#,
            escape(message)
        ),
    }
}

pub fn render(page: &Page) -> String {
    let mut html = String::from(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>rplaylist</title>
  <style>
    body { font-family: sans-serif; max-width: 40rem; margin: 2rem auto; color: #222; }
    label { display: block; margin-top: 1rem; }
    input[type=text] { width: 100%; }
    .notice { padding: .75rem 1rem; margin: 1rem 0; border-radius: 6px; }
    .info { background: #e7f0fb; }
    .success { background: #e3f6e8; }
    .warning { background: #fff4d6; }
    .error { background: #fde2e1; }
    #busy { display: none; }
  </style>
</head>
<body>
  <h1>Playlist Generator</h1>
"#,
    );

    if let Some(user) = &page.user {
        html.push_str(&format!(
            "  <p><strong>Logged in as:</strong> {}</p>\n",
            escape(user)
        ));
    }

    for notice in &page.notices {
        html.push_str("  ");
        html.push_str(&render_notice(notice));
        html.push('\n');
    }

    html.push_str(&format!(
        r#"  <form method="post" action="/generate" onsubmit="document.getElementById('submit').disabled = true; document.getElementById('busy').style.display = 'block';">
    <label>Name of the new playlist:
      <input type="text" name="name" value="{name}">
    </label>
    <label>Number of recommended tracks: <output id="track_value">{track_limit}</output>
      <input type="range" name="track_limit" min="{track_min}" max="{track_max}" step="5" value="{track_limit}" oninput="document.getElementById('track_value').value = this.value">
    </label>
    <label>Number of your top tracks used for inspiration (seeds): <output id="seed_value">{seed_limit}</output>
      <input type="range" name="seed_limit" min="{seed_min}" max="{seed_max}" step="1" value="{seed_limit}" oninput="document.getElementById('seed_value').value = this.value">
    </label>
    <p><button id="submit" type="submit">Create playlist!</button></p>
    <p id="busy">Working... loading and filtering tracks, this may take a while.</p>
  </form>
</body>
</html>
"#,
        name = escape(&page.request.name),
        track_limit = page.request.track_limit,
        track_min = TRACK_LIMIT_RANGE.start(),
        track_max = TRACK_LIMIT_RANGE.end(),
        seed_limit = page.request.seed_limit,
        seed_min = SEED_LIMIT_RANGE.start(),
        seed_max = SEED_LIMIT_RANGE.end(),
    ));

    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape(r#"<b>"Rock" & 'Roll'</b>"#),
            "&lt;b&gt;&quot;Rock&quot; &amp; &#39;Roll&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_render_keeps_form_values() {
        let page = Page::new(PlaylistRequest {
            name: "Late <night>".to_string(),
            track_limit: 45,
            seed_limit: 7,
        });

        let html = render(&page);

        assert!(html.contains(r#"value="Late &lt;night&gt;""#));
        assert!(html.contains(r#"name="track_limit" min="10" max="100" step="5" value="45""#));
        assert!(html.contains(r#"name="seed_limit" min="5" max="20" step="1" value="7""#));
    }

    #[test]
    fn test_render_success_notice_with_link() {
        let page = Page::new(PlaylistRequest::default()).notice(Notice::Success {
            name: "Mix".to_string(),
            track_count: 12,
            url: Some("https://open.spotify.com/playlist/abc".to_string()),
        });

        let html = render(&page);

        assert!(html.contains("<strong>Mix</strong> with 12 tracks"));
        assert!(html.contains(r#"href="https://open.spotify.com/playlist/abc""#));
    }

    #[test]
    fn test_render_login_notice_links_to_login() {
        let page = Page::new(PlaylistRequest::default())
            .notice(Notice::Login("Authorization failed.".to_string()));

        assert!(render(&page).contains(r#"<a href="/login">Log in with Spotify</a>"#));
    }
}
