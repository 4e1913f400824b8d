use async_trait::async_trait;
use rand::Rng;
use rand::distr::Alphanumeric;
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, info, warn};
use url::Url;

use crate::assembler::{PlaylistService, TrackCatalog};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::spotify::models::{
    ApiPlaylist, AppTokenResponse, CatalogTrack, CreatePlaylistRequest, RemotePlaylist,
    SearchResponse, UserProfile, UserToken,
};
use crate::spotify::session::{AccessToken, CatalogSession};

const SPOTIFY_API_BASE: &str = "https://api.spotify.com/v1";
const SPOTIFY_ACCOUNTS_BASE: &str = "https://accounts.spotify.com";

const EXPORT_SCOPES: &[&str] = &[
    "playlist-modify-public",
    "playlist-modify-private",
    "user-read-email",
    "user-read-private",
];

const STATE_LENGTH: usize = 13;

pub struct SpotifyClient {
    http_client: Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    api_base: String,
    accounts_base: String,
}

impl SpotifyClient {
    pub fn new(config: &Config) -> Result<Self> {
        if !config.validate_spotify_config() {
            return Err(AppError::Config(
                "SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET must be set".into(),
            ));
        }

        Ok(Self {
            http_client: Client::new(),
            client_id: config.spotify_client_id.clone(),
            client_secret: config.spotify_client_secret.clone(),
            redirect_uri: config.spotify_redirect_uri.clone(),
            api_base: SPOTIFY_API_BASE.to_string(),
            accounts_base: SPOTIFY_ACCOUNTS_BASE.to_string(),
        })
    }

    /// Point the client at other Web API and accounts hosts.
    pub fn with_base_urls(mut self, api_base: &str, accounts_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self.accounts_base = accounts_base.trim_end_matches('/').to_string();
        self
    }

    fn token_url(&self) -> String {
        format!("{}/api/token", self.accounts_base)
    }

    async fn request_app_token(&self) -> Result<AccessToken> {
        let response = self
            .http_client
            .post(self.token_url())
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Auth(format!(
                "Client credentials grant failed: {}",
                error_text
            )));
        }

        let token: AppTokenResponse = response.json().await?;
        debug!("Obtained catalog token valid for {}s", token.expires_in);

        Ok(AccessToken::new(token.access_token, token.expires_in))
    }

    /// Best-effort lookup: any failure is logged and reported as no match.
    pub async fn search_track(
        &self,
        session: &CatalogSession,
        name: &str,
        artist: &str,
    ) -> Option<CatalogTrack> {
        match self.find_track(session, name, artist).await {
            Ok(found) => found,
            Err(e) => {
                warn!("Spotify search failed for {} by {}: {}", name, artist, e);
                None
            }
        }
    }

    async fn find_track(
        &self,
        session: &CatalogSession,
        name: &str,
        artist: &str,
    ) -> Result<Option<CatalogTrack>> {
        let token = session.bearer(|| self.request_app_token()).await?;
        let query = format!("track:\"{}\" artist:\"{}\"", name, artist);

        let response = self
            .http_client
            .get(format!("{}/search", self.api_base))
            .bearer_auth(&token)
            .query(&[("q", query.as_str()), ("type", "track"), ("limit", "1")])
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            // Revoked before its expiry; the next lookup fetches a new one.
            session.invalidate().await;
        }

        let response = check_response(response, "search").await?;
        let search: SearchResponse = response.json().await?;

        let found = search
            .tracks
            .and_then(|page| page.items.into_iter().next())
            .and_then(|track| track.into_catalog_track());

        if found.is_none() {
            debug!("No Spotify match for {} by {}", name, artist);
        }

        Ok(found)
    }

    /// URL the user visits to grant playlist access, with a random `state`.
    pub fn authorize_url(&self) -> Result<String> {
        let state: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(STATE_LENGTH)
            .map(char::from)
            .collect();

        self.authorize_url_with_state(&state)
    }

    pub fn authorize_url_with_state(&self, state: &str) -> Result<String> {
        let scope = EXPORT_SCOPES.join(" ");
        let url = Url::parse_with_params(
            &format!("{}/authorize", self.accounts_base),
            &[
                ("response_type", "code"),
                ("client_id", self.client_id.as_str()),
                ("scope", scope.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("state", state),
            ],
        )?;

        Ok(url.to_string())
    }

    /// Pull the authorization code out of the URL the user was redirected to.
    pub fn parse_redirect_code(redirect_url: &str) -> Result<String> {
        let url = Url::parse(redirect_url.trim())?;

        if let Some((_, error)) = url.query_pairs().find(|(k, _)| k == "error") {
            return Err(AppError::Auth(format!("Authorization denied: {}", error)));
        }

        url.query_pairs()
            .find(|(k, _)| k == "code")
            .map(|(_, v)| v.into_owned())
            .filter(|code| !code.is_empty())
            .ok_or_else(|| AppError::Auth("Redirect URL has no authorization code".into()))
    }

    pub async fn exchange_code(&self, code: &str) -> Result<UserToken> {
        let response = self
            .http_client
            .post(self.token_url())
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Auth(format!(
                "Failed to exchange code for token: {}",
                error_text
            )));
        }

        let token: UserToken = response.json().await?;
        info!("Spotify account authorized (scope: {})", token.scope.as_deref().unwrap_or("-"));
        Ok(token)
    }

    /// New access token for a stored refresh token. The response may omit the
    /// refresh token, in which case the old one stays valid.
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<UserToken> {
        let response = self
            .http_client
            .post(self.token_url())
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            if status == StatusCode::BAD_REQUEST && error_text.contains("invalid_grant") {
                warn!("Refresh token rejected: {}", error_text);
                return Err(AppError::ReauthRequired);
            }
            return Err(AppError::SpotifyApi {
                status,
                message: format!("Failed to refresh access token: {}", error_text),
            });
        }

        let mut token: UserToken = response.json().await?;
        if token.refresh_token.is_none() {
            token.refresh_token = Some(refresh_token.to_string());
        }
        Ok(token)
    }

    /// Refresh a stored user token. A token without a refresh token can only
    /// be replaced by authorizing again.
    pub async fn refresh_user_token(&self, token: &UserToken) -> Result<UserToken> {
        match token.refresh_token.as_deref() {
            Some(refresh_token) => self.refresh_access_token(refresh_token).await,
            None => Err(AppError::ReauthRequired),
        }
    }

    pub async fn get_user_profile(&self, access_token: &str) -> Result<UserProfile> {
        let response = self
            .http_client
            .get(format!("{}/me", self.api_base))
            .bearer_auth(access_token)
            .send()
            .await?;

        let response = check_response(response, "get user profile").await?;
        Ok(response.json().await?)
    }

    pub async fn create_empty_playlist(
        &self,
        access_token: &str,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> Result<RemotePlaylist> {
        let url = format!("{}/users/{}/playlists", self.api_base, user_id);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(access_token)
            .json(&CreatePlaylistRequest {
                name,
                description,
                public: false,
            })
            .send()
            .await?;

        let response = check_response(response, "create playlist").await?;
        let api_playlist: ApiPlaylist = response.json().await?;

        info!("Created Spotify playlist: {}", api_playlist.name);

        Ok(RemotePlaylist {
            id: api_playlist.id,
            name: api_playlist.name,
            url: api_playlist.external_urls.spotify,
            tracks_added: 0,
        })
    }

    pub async fn add_tracks(
        &self,
        access_token: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<()> {
        let url = format!("{}/playlists/{}/tracks", self.api_base, playlist_id);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(access_token)
            .json(&serde_json::json!({ "uris": uris }))
            .send()
            .await?;

        check_response(response, "add tracks").await?;
        info!("Added {} tracks to playlist", uris.len());
        Ok(())
    }
}

/// Map a Web API response to an error: 401 means the user has to reconnect.
async fn check_response(response: Response, context: &str) -> Result<Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::UNAUTHORIZED {
        warn!("Spotify rejected the access token during {}", context);
        return Err(AppError::ReauthRequired);
    }

    let error_text = response.text().await.unwrap_or_default();
    Err(AppError::SpotifyApi {
        status,
        message: format!("Failed to {}: {}", context, error_text),
    })
}

#[async_trait]
impl TrackCatalog for SpotifyClient {
    async fn lookup(
        &self,
        session: &CatalogSession,
        name: &str,
        artist: &str,
    ) -> Result<Option<CatalogTrack>> {
        Ok(self.search_track(session, name, artist).await)
    }
}

#[async_trait]
impl PlaylistService for SpotifyClient {
    async fn current_user(&self, access_token: &str) -> Result<UserProfile> {
        self.get_user_profile(access_token).await
    }

    async fn create_playlist(
        &self,
        access_token: &str,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> Result<RemotePlaylist> {
        self.create_empty_playlist(access_token, user_id, name, description)
            .await
    }

    async fn add_tracks(&self, access_token: &str, playlist_id: &str, uris: &[String]) -> Result<()> {
        SpotifyClient::add_tracks(self, access_token, playlist_id, uris).await
    }
}
