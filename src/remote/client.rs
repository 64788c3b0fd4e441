//! HTTP Store
//!
//! `RemoteStore` over the hosted service's REST (`/rest/v1`) and auth
//! (`/auth/v1`) endpoints.

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::auth::{Credential, Session, User};
use crate::catalog::{Game, GameId, GamePatch};

use super::{RemoteError, RemoteResult, RemoteStore};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for the hosted service
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub api_url: Url,
    pub anon_key: String,
    pub table: String,
}

pub struct HttpStore {
    http: Client,
    base: Url,
    anon_key: String,
    table: String,
    session: RwLock<Option<Session>>,
}

impl HttpStore {
    pub fn new(config: StoreConfig) -> RemoteResult<Self> {
        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("games-admin/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let mut base = config.api_url;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            http,
            base,
            anon_key: config.anon_key,
            table: config.table,
            session: RwLock::new(None),
        })
    }

    fn endpoint(&self, path: &str) -> RemoteResult<Url> {
        self.base
            .join(path)
            .map_err(|e| RemoteError::Decode(format!("invalid endpoint {}: {}", path, e)))
    }

    /// The signed-in user's token while it is valid, else the anon key.
    fn bearer(&self) -> String {
        let session = self.session.read().unwrap_or_else(|e| e.into_inner());
        match session.as_ref() {
            Some(session) if !session.is_expired() => format!("Bearer {}", session.access_token.expose_secret()),
            Some(_) => {
                debug!("session expired, falling back to the anon key");
                format!("Bearer {}", self.anon_key)
            }
            None => format!("Bearer {}", self.anon_key),
        }
    }

    fn headers(&self) -> RemoteResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert("apikey", header_value(&self.anon_key)?);
        headers.insert(AUTHORIZATION, header_value(&self.bearer())?);
        Ok(headers)
    }

    fn table_request(&self, method: Method, query: &[(&str, String)]) -> RemoteResult<RequestBuilder> {
        let url = self.endpoint(&format!("rest/v1/{}", self.table))?;
        debug!(%method, table = %self.table, ?query, "table request");
        Ok(self.http.request(method, url).headers(self.headers()?).query(query))
    }

    fn store_session(&self, session: &Session) {
        let kept = Session {
            access_token: SecretString::from(session.access_token.expose_secret().to_string()),
            expires_at: session.expires_at,
            user: session.user.clone(),
        };
        let mut slot = self.session.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(kept);
    }
}

fn header_value(value: &str) -> RemoteResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| RemoteError::Decode(format!("invalid header value: {}", e)))
}

fn id_filter(id: &GameId) -> (&'static str, String) {
    ("game_id", format!("eq.{}", id))
}

/// Error body shapes of the table and auth endpoints
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.message
            .or(self.msg)
            .or(self.error_description)
            .or(self.error)
            .filter(|m| !m.trim().is_empty())
    }
}

/// Maps non-success responses to `RemoteError::Api`.
async fn check(response: Response) -> RemoteResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(ErrorBody::into_message)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());

    Err(RemoteError::Api { status: status.as_u16(), message })
}

async fn decode<T: for<'de> Deserialize<'de>>(response: Response) -> RemoteResult<T> {
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| RemoteError::Decode(e.to_string()))
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
    user: User,
}

impl From<TokenResponse> for Session {
    fn from(token: TokenResponse) -> Self {
        Self {
            access_token: SecretString::from(token.access_token),
            expires_at: Utc::now() + chrono::Duration::seconds(token.expires_in),
            user: token.user,
        }
    }
}

#[async_trait]
impl RemoteStore for HttpStore {
    async fn list_games(&self) -> RemoteResult<Vec<Game>> {
        let request = self.table_request(
            Method::GET,
            &[("select", "*".to_string()), ("order", "game_id.asc".to_string())],
        )?;
        decode(check(request.send().await?).await?).await
    }

    async fn delete_game(&self, id: &GameId) -> RemoteResult<()> {
        let request = self.table_request(Method::DELETE, &[id_filter(id)])?;
        check(request.send().await?).await?;
        Ok(())
    }

    async fn update_game(&self, id: &GameId, patch: &GamePatch) -> RemoteResult<Vec<Game>> {
        let request = self
            .table_request(Method::PATCH, &[id_filter(id), ("select", "*".to_string())])?
            .header("Prefer", "return=representation")
            .json(patch);
        decode(check(request.send().await?).await?).await
    }

    async fn sign_in_with_password(&self, credential: Credential) -> RemoteResult<Session> {
        let url = self.endpoint("auth/v1/token")?;
        debug!(email = %credential.email, "password sign-in");

        let response = self
            .http
            .post(url)
            .query(&[("grant_type", "password")])
            .header("apikey", header_value(&self.anon_key)?)
            .json(&json!({
                "email": credential.email,
                "password": credential.password().expose_secret(),
            }))
            .send()
            .await?;

        let token: TokenResponse = decode(check(response).await?).await?;
        let session = Session::from(token);
        self.store_session(&session);
        Ok(session)
    }
}
