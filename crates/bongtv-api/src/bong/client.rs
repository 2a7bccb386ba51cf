//! `BongClient` - bong.tv API client implementation.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use regex::Regex;
use reqwest::header::{self, HeaderMap};
use reqwest::{Client, Method};
use tokio::sync::Mutex;
use tracing::instrument;
use url::Url;

use super::api::LocalBongApi;
use super::error::{self, Error, Result};
use super::rate_limiter::BongRateLimiter;
use super::session::{Auth, Session};
use super::types::{
    AccountPayload, BroadcastDetailsPayload, BroadcastPayload, ChannelPayload, RecordingPayload,
};

/// Default provider host.
const DEFAULT_HOST: &str = "bong.tv";

/// Default timeout applied to every provider call.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Accept header sent with every request.
const ACCEPT_VALUE: &str = "text/plain,application/json";

/// Login endpoint (form-encoded request, cookie response).
const LOGIN_PATH: &str = "/api/v1/user_sessions.json";
/// Recordings collection.
const RECORDINGS_PATH: &str = "/api/v1/recordings.json";
/// Channels collection.
const CHANNELS_PATH: &str = "/api/v1/channels.json";
/// Broadcasts collection.
const BROADCASTS_PATH: &str = "/api/v1/broadcasts.json";
/// Broadcast search.
const BROADCAST_SEARCH_PATH: &str = "/api/v1/broadcasts/search.json";

/// bong.tv API client.
///
/// Owns the HTTP transport, the session state (cookie plus on-disk cache)
/// and the process-wide rate limiter. All facade operations go through
/// [`Self::authorized`], the single authenticated-call primitive.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct BongClient {
    /// HTTP client (reqwest, gzip enabled).
    http_client: Client,
    /// Base URL, overridable for tests.
    base_url: Url,
    /// Provider host used for derived image URLs.
    host: String,
    /// Rate limiter, shared across everything this client spawns.
    rate_limiter: Arc<Mutex<BongRateLimiter>>,
    /// Session state.
    session: Arc<Mutex<Session>>,
    /// Optional well-known series title pattern.
    tvshow_pattern: Option<Regex>,
}

/// Builder for `BongClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct BongClientBuilder {
    base_url: Option<Url>,
    host: Option<String>,
    user_agent: Option<String>,
    auth: Option<Auth>,
    timeout: Option<Duration>,
    min_interval: Option<Duration>,
    cookie_dir: Option<PathBuf>,
    tvshow_pattern: Option<Regex>,
}

impl BongClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            host: None,
            user_agent: None,
            auth: None,
            timeout: None,
            min_interval: None,
            cookie_dir: None,
            tvshow_pattern: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Overrides the provider host (default: `bong.tv`).
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Authenticates with username and password.
    ///
    /// Mutually exclusive with [`Self::session_cookie`]; the later call wins.
    #[must_use]
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some(Auth::Credentials {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    /// Authenticates with an externally obtained session cookie.
    #[must_use]
    pub fn session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.auth = Some(Auth::Cookie(cookie.into()));
        self
    }

    /// Sets the default per-call timeout (default: 10s).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the minimum interval between provider calls (default: 1s).
    #[must_use]
    pub const fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = Some(interval);
        self
    }

    /// Sets the session-cookie cache directory.
    ///
    /// Defaults to the per-user cache directory of the platform.
    #[must_use]
    pub fn cookie_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cookie_dir = Some(dir.into());
        self
    }

    /// Sets a pattern matching titles of well-known series the provider
    /// ships without season/episode numbering.
    #[must_use]
    pub fn tvshow_title_pattern(mut self, pattern: Regex) -> Self {
        self.tvshow_pattern = Some(pattern);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `user_agent` is not set.
    /// - Neither credentials nor a session cookie are set, or the
    ///   credentials are empty.
    /// - No cookie cache directory can be determined.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<BongClient> {
        let user_agent = self.user_agent.ok_or_else(|| Error::Config {
            message: String::from("user_agent is required"),
        })?;
        let auth = self.auth.ok_or_else(|| Error::Config {
            message: String::from("credentials or a session cookie are required"),
        })?;
        if let Auth::Credentials { username, password } = &auth
            && (username.is_empty() || password.is_empty())
        {
            return Err(Error::Config {
                message: String::from("username and password must be non-empty"),
            });
        }

        let host = self.host.unwrap_or_else(|| String::from(DEFAULT_HOST));
        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(&format!("http://{host}")).map_err(|e| Error::Config {
                message: format!("invalid provider host {host}: {e}"),
            })?,
        };

        let cookie_dir = match self.cookie_dir {
            Some(dir) => dir,
            None => match &auth {
                Auth::Credentials { .. } => {
                    default_cookie_dir().ok_or_else(|| Error::Config {
                        message: String::from("cannot determine a cookie cache directory"),
                    })?
                }
                // An external cookie is never cached.
                Auth::Cookie(_) => PathBuf::new(),
            },
        };

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .map_err(|e| Error::Config {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        let rate_limiter = self
            .min_interval
            .map_or_else(BongRateLimiter::default_interval, BongRateLimiter::new);

        Ok(BongClient {
            http_client,
            base_url,
            host,
            rate_limiter: Arc::new(Mutex::new(rate_limiter)),
            session: Arc::new(Mutex::new(Session::new(auth, cookie_dir))),
            tvshow_pattern: self.tvshow_pattern,
        })
    }
}

/// Per-user cache directory for session cookies.
fn default_cookie_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("tv", "bong", "bongtv-api")
        .map(|dirs| dirs.cache_dir().join("cookies"))
}

/// Maps a transport failure, keeping timeouts distinct from other I/O errors.
fn classify_send_error(source: reqwest::Error) -> Error {
    if source.is_timeout() {
        Error::Timeout { source }
    } else {
        Error::Transport { source }
    }
}

impl BongClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> BongClientBuilder {
        BongClientBuilder::new()
    }

    /// Serializes params as an URL-encoded form body.
    fn encode_form(params: &[(&str, String)]) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params)
            .finish()
    }

    /// Builds one provider request without sending it.
    fn build_request(
        &self,
        method: &Method,
        path: &str,
        params: &[(&str, String)],
        cookie: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<reqwest::RequestBuilder> {
        let url = self.base_url.join(path).map_err(|e| Error::Config {
            message: format!("invalid request path {path}: {e}"),
        })?;

        let mut builder = if *method == Method::GET {
            let builder = self.http_client.get(url);
            if params.is_empty() {
                builder
            } else {
                builder.query(params)
            }
        } else if *method == Method::POST {
            self.http_client
                .post(url)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Self::encode_form(params))
        } else if *method == Method::DELETE {
            // Params travel in the body, without a content-type override.
            let builder = self.http_client.delete(url);
            if params.is_empty() {
                builder
            } else {
                builder.body(Self::encode_form(params))
            }
        } else {
            return Err(Error::Config {
                message: format!("unsupported HTTP method {method}"),
            });
        };

        builder = builder.header(header::ACCEPT, ACCEPT_VALUE);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(builder)
    }

    /// Issues one rate-limited transport call.
    ///
    /// The rate limiter lock is held across the call, serializing all
    /// provider traffic in the process; the completion time is recorded
    /// whether the call failed or not. No retries happen at this layer.
    async fn request(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
        cookie: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<(u16, String, HeaderMap)> {
        let builder = self.build_request(&method, path, params, cookie, timeout)?;

        let mut limiter = self.rate_limiter.lock().await;
        limiter.wait().await;
        tracing::debug!(%method, path, "provider request");
        let outcome = Self::execute(builder).await;
        limiter.record();
        outcome
    }

    /// Sends the request and reads the body.
    async fn execute(builder: reqwest::RequestBuilder) -> Result<(u16, String, HeaderMap)> {
        let response = builder.send().await.map_err(classify_send_error)?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(classify_send_error)?;
        tracing::trace!(status, body_len = body.len(), "provider response");
        Ok((status, body, headers))
    }

    /// Returns the session cookie, logging in when nothing usable is held.
    async fn ensure_cookie(&self) -> Result<String> {
        {
            let mut session = self.session.lock().await;
            if let Some(cookie) = session.ensure_cached()? {
                return Ok(cookie);
            }
        }
        self.login_internal().await?;
        let session = self.session.lock().await;
        session
            .held()
            .map(str::to_owned)
            .ok_or(Error::MissingSessionCookie)
    }

    /// Performs the login handshake and caches the session cookie.
    async fn login_internal(&self) -> Result<AccountPayload> {
        let (username, password) = {
            let session = self.session.lock().await;
            match session.auth() {
                Auth::Credentials { username, password } => (username.clone(), password.clone()),
                Auth::Cookie(_) => {
                    return Err(Error::Config {
                        message: String::from("login requires user credentials"),
                    });
                }
            }
        };

        let params = [("login", username), ("password", password)];
        let (status, body, headers) = self
            .request(Method::POST, LOGIN_PATH, &params, None, None)
            .await?;
        error::check_status(status)?;

        let cookie = headers
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
            .ok_or(Error::MissingSessionCookie)?;

        {
            let mut session = self.session.lock().await;
            session.store(cookie)?;
        }
        tracing::debug!("logged in");

        if body.trim().is_empty() {
            return Ok(AccountPayload::default());
        }
        serde_json::from_str(&body).map_err(|e| Error::Decode {
            message: format!("invalid login payload: {e}"),
        })
    }

    /// Single authenticated-call primitive behind every facade operation.
    ///
    /// A 401 answer resets the session (held cookie and cache file) so the
    /// next call logs in again; the error still propagates, whether to
    /// retry with fresh credentials is the caller's decision.
    async fn authorized(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<String> {
        let cookie = self.ensure_cookie().await?;
        let (status, body, _headers) = self
            .request(method, path, params, Some(&cookie), None)
            .await?;
        if status == 401 {
            self.session.lock().await.invalidate();
            return Err(Error::Authentication);
        }
        error::check_status(status)?;
        Ok(body)
    }

    /// Decodes a JSON body and extracts one top-level field.
    fn decode_field<T: serde::de::DeserializeOwned>(body: &str, field: &str) -> Result<T> {
        let value: serde_json::Value = serde_json::from_str(body).map_err(|e| Error::Decode {
            message: format!("invalid JSON: {e}"),
        })?;
        let Some(field_value) = value.get(field) else {
            return Err(Error::Decode {
                message: format!("missing field `{field}`"),
            });
        };
        serde_json::from_value(field_value.clone()).map_err(|e| Error::Decode {
            message: format!("invalid `{field}` payload: {e}"),
        })
    }
}

impl LocalBongApi for BongClient {
    fn host(&self) -> &str {
        &self.host
    }

    fn tvshow_title_pattern(&self) -> Option<&Regex> {
        self.tvshow_pattern.as_ref()
    }

    #[instrument(skip_all)]
    async fn login(&self) -> Result<AccountPayload> {
        self.login_internal().await
    }

    #[instrument(skip_all)]
    async fn list_recordings(&self) -> Result<Vec<RecordingPayload>> {
        let body = self.authorized(Method::GET, RECORDINGS_PATH, &[]).await?;
        Self::decode_field(&body, "recordings")
    }

    #[instrument(skip_all)]
    async fn create_recording(&self, broadcast_id: u64) -> Result<RecordingPayload> {
        let params = [("broadcast_id", broadcast_id.to_string())];
        let body = self
            .authorized(Method::POST, RECORDINGS_PATH, &params)
            .await?;
        Self::decode_field(&body, "recording")
    }

    #[instrument(skip_all)]
    async fn delete_recording(&self, recording_id: u64) -> Result<()> {
        let path = format!("/api/v1/recordings/{recording_id}.json");
        self.authorized(Method::DELETE, &path, &[]).await?;
        Ok(())
    }

    #[instrument(skip_all)]
    async fn list_channels(&self) -> Result<Vec<ChannelPayload>> {
        let body = self.authorized(Method::GET, CHANNELS_PATH, &[]).await?;
        Self::decode_field(&body, "channels")
    }

    #[instrument(skip_all)]
    async fn list_broadcasts(
        &self,
        channel_id: u64,
        date: NaiveDate,
    ) -> Result<Vec<BroadcastPayload>> {
        let params = [
            ("channel_id", channel_id.to_string()),
            ("date", date.format("%d-%m-%Y").to_string()),
        ];
        let body = self.authorized(Method::GET, BROADCASTS_PATH, &params).await?;
        Self::decode_field(&body, "broadcasts")
    }

    #[instrument(skip_all)]
    async fn broadcast_details(&self, broadcast_id: u64) -> Result<BroadcastDetailsPayload> {
        let path = format!("/api/v1/broadcasts/{broadcast_id}.json");
        let body = self.authorized(Method::GET, &path, &[]).await?;
        Self::decode_field(&body, "broadcast")
    }

    #[instrument(skip_all)]
    async fn search_broadcasts(&self, query: &str) -> Result<Vec<BroadcastPayload>> {
        let params = [("query", query.to_owned())];
        let body = self
            .authorized(Method::GET, BROADCAST_SEARCH_PATH, &params)
            .await?;
        Self::decode_field(&body, "broadcasts")
    }
}
