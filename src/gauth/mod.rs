//! Access token sources for Google APIs.
//!
//! The client only needs a bearer token per request. Providers here obtain one
//! from a service account key, from gcloud user credentials, from the compute
//! metadata server, or from a fixed string, and cache it until shortly before
//! it expires.

use std::{
    env,
    ffi::OsString,
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use reqwest::Client;
use serde_derive::Deserialize;
use tokio::sync::Mutex;

use self::jwt::{JwtAssertion, Token};
use crate::utils::timestamp;

pub use self::errors::{GAuthError, Result};
pub use self::jwt::ServiceAccountKey;

mod errors;
mod jwt;

/// OAuth 2.0 scope granting access to all Google Cloud APIs, Chronicle included.
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

const CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";
const WELL_KNOWN_CREDENTIALS: &str = ".config/gcloud/application_default_credentials.json";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const METADATA_ENDPOINT: &str = "http://metadata.google.internal";
const METADATA_TOKEN_PATH: &str = "computeMetadata/v1/instance/service-accounts/default/token";
/// Seconds subtracted from `expires_in` so a cached token is never used at the edge of expiry.
const EXPIRY_MARGIN: u64 = 30;

/// Source of OAuth 2.0 access tokens attached to every API call.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Returns a currently valid access token (without the `Bearer ` prefix).
    async fn access_token(&self) -> Result<String>;

    /// Project billed for quota, sent as `x-goog-user-project`.
    fn quota_project(&self) -> Option<&str> {
        None
    }
}

/// Always returns the same token, e.g. the output of `gcloud auth print-access-token`.
#[derive(Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticTokenProvider").finish_non_exhaustive()
    }
}

#[async_trait]
impl AccessTokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}

#[derive(Default)]
struct TokenCache {
    access_token: Option<String>,
    expires_at: Option<u64>,
}

impl TokenCache {
    fn get(&self) -> Result<Option<String>> {
        match (self.access_token.as_ref(), self.expires_at) {
            (Some(access_token), Some(expires_at)) if expires_at > timestamp()? => {
                Ok(Some(access_token.clone()))
            }
            _ => Ok(None),
        }
    }

    fn store(&mut self, token: Token) -> Result<String> {
        let lifetime = token.expires_in.saturating_sub(EXPIRY_MARGIN);
        self.expires_at = Some(timestamp()?.saturating_add(lifetime));
        self.access_token = Some(token.access_token.clone());

        Ok(token.access_token)
    }
}

async fn read_token(response: reqwest::Response) -> Result<Token> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await?;
        return Err(GAuthError::TokenExchange { status, body });
    }

    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Exchanges a self-signed service account JWT for access tokens.
pub struct ServiceAccountTokenProvider {
    key: ServiceAccountKey,
    scopes: String,
    subject: Option<String>,
    cache: Mutex<TokenCache>,
    http_client: Client,
}

impl ServiceAccountTokenProvider {
    pub fn new(key: ServiceAccountKey, scopes: &[&str]) -> Self {
        Self {
            key,
            scopes: scopes.join(" "),
            subject: None,
            cache: Mutex::default(),
            http_client: Client::new(),
        }
    }

    pub fn from_bytes(bytes: &[u8], scopes: &[&str]) -> Result<Self> {
        Ok(Self::new(ServiceAccountKey::from_bytes(bytes)?, scopes))
    }

    /// Requests tokens on behalf of `subject` (domain-wide delegation).
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    fn assertion(&self) -> Result<JwtAssertion> {
        let assertion = JwtAssertion::new(&self.key, self.scopes.clone())?;

        Ok(match self.subject {
            Some(ref subject) => assertion.subject(subject.clone()),
            None => assertion,
        })
    }

    async fn exchange(&self, assertion: JwtAssertion) -> Result<Token> {
        let encoded = assertion.encode()?;
        let response = self
            .http_client
            .post(assertion.token_uri())
            .form(&[
                ("grant_type", JWT_BEARER_GRANT),
                ("assertion", encoded.as_str()),
            ])
            .send()
            .await?;

        read_token(response).await
    }
}

impl fmt::Debug for ServiceAccountTokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountTokenProvider")
            .field("key", &self.key)
            .field("scopes", &self.scopes)
            .field("subject", &self.subject)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl AccessTokenProvider for ServiceAccountTokenProvider {
    async fn access_token(&self) -> Result<String> {
        let mut cache = self.cache.lock().await;
        if let Some(access_token) = cache.get()? {
            return Ok(access_token);
        }

        tracing::debug!(
            client_email = %self.key.client_email,
            "requesting service account access token"
        );
        let token = self.exchange(self.assertion()?).await?;

        cache.store(token)
    }
}

/// gcloud user credentials (`"type": "authorized_user"`).
#[derive(Clone, Deserialize)]
pub struct AuthorizedUserCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    #[serde(default)]
    pub quota_project_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_owned()
}

impl fmt::Debug for AuthorizedUserCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizedUserCredentials")
            .field("client_id", &self.client_id)
            .field("quota_project_id", &self.quota_project_id)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

/// Redeems a gcloud refresh token for access tokens.
pub struct AuthorizedUserTokenProvider {
    credentials: AuthorizedUserCredentials,
    cache: Mutex<TokenCache>,
    http_client: Client,
}

impl AuthorizedUserTokenProvider {
    pub fn new(credentials: AuthorizedUserCredentials) -> Self {
        Self {
            credentials,
            cache: Mutex::default(),
            http_client: Client::new(),
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self::new(serde_json::from_slice(bytes)?))
    }
}

impl fmt::Debug for AuthorizedUserTokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizedUserTokenProvider")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl AccessTokenProvider for AuthorizedUserTokenProvider {
    async fn access_token(&self) -> Result<String> {
        let mut cache = self.cache.lock().await;
        if let Some(access_token) = cache.get()? {
            return Ok(access_token);
        }

        tracing::debug!("refreshing authorized user access token");
        let response = self
            .http_client
            .post(&self.credentials.token_uri)
            .form(&[
                ("grant_type", "refresh_token"),
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("refresh_token", self.credentials.refresh_token.as_str()),
            ])
            .send()
            .await?;

        cache.store(read_token(response).await?)
    }

    fn quota_project(&self) -> Option<&str> {
        self.credentials.quota_project_id.as_deref()
    }
}

/// Fetches tokens for the attached service account from the GCE / Cloud Run
/// metadata server.
pub struct MetadataServerTokenProvider {
    endpoint: String,
    scopes: String,
    cache: Mutex<TokenCache>,
    http_client: Client,
}

impl MetadataServerTokenProvider {
    pub fn new(scopes: &[&str]) -> Self {
        Self {
            endpoint: METADATA_ENDPOINT.to_owned(),
            scopes: scopes.join(","),
            cache: Mutex::default(),
            http_client: Client::new(),
        }
    }

    /// Overrides `http://metadata.google.internal`, e.g. with `GCE_METADATA_HOST`.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_owned();
        self
    }
}

impl fmt::Debug for MetadataServerTokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataServerTokenProvider")
            .field("endpoint", &self.endpoint)
            .field("scopes", &self.scopes)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl AccessTokenProvider for MetadataServerTokenProvider {
    async fn access_token(&self) -> Result<String> {
        let mut cache = self.cache.lock().await;
        if let Some(access_token) = cache.get()? {
            return Ok(access_token);
        }

        tracing::debug!(endpoint = %self.endpoint, "requesting metadata server access token");
        let mut request = self
            .http_client
            .get(format!("{}/{METADATA_TOKEN_PATH}", self.endpoint))
            .header("Metadata-Flavor", "Google");
        if !self.scopes.is_empty() {
            request = request.query(&[("scopes", self.scopes.as_str())]);
        }

        cache.store(read_token(request.send().await?).await?)
    }
}

#[derive(Deserialize)]
struct CredentialKind {
    r#type: String,
}

/// Builds a provider from the bytes of a credentials JSON file,
/// dispatching on its `type` field.
pub fn provider_from_bytes(
    bytes: &[u8],
    scopes: &[&str],
) -> Result<Arc<dyn AccessTokenProvider>> {
    let CredentialKind { r#type } = serde_json::from_slice(bytes)?;

    match r#type.as_str() {
        "service_account" => Ok(Arc::new(ServiceAccountTokenProvider::from_bytes(
            bytes, scopes,
        )?)),
        "authorized_user" => Ok(Arc::new(AuthorizedUserTokenProvider::from_bytes(bytes)?)),
        other => Err(GAuthError::UnsupportedCredential(other.to_owned())),
    }
}

/// Reads a credentials JSON file and builds the matching provider.
pub fn provider_from_file(
    path: impl AsRef<Path>,
    scopes: &[&str],
) -> Result<Arc<dyn AccessTokenProvider>> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|err| GAuthError::ReadKey(format!("{}: {}", err, path.display())))?;

    provider_from_bytes(&bytes, scopes)
}

/// Picks the credentials file: the `GOOGLE_APPLICATION_CREDENTIALS` value when
/// set and non-empty, otherwise the gcloud file under `home` if it exists.
fn credentials_path(env_value: Option<OsString>, home: Option<OsString>) -> Result<PathBuf> {
    if let Some(path) = env_value.filter(|path| !path.is_empty()) {
        return Ok(PathBuf::from(path));
    }

    let home = home
        .filter(|home| !home.is_empty())
        .ok_or(GAuthError::MissingCredentials)?;
    let path = PathBuf::from(home).join(WELL_KNOWN_CREDENTIALS);
    if !path.is_file() {
        return Err(GAuthError::MissingCredentials);
    }

    Ok(path)
}

/// Resolves Application Default Credentials.
///
/// Looks at `GOOGLE_APPLICATION_CREDENTIALS` first (an empty value counts as
/// unset), then at the file written by `gcloud auth application-default login`.
///
/// The compute metadata server is not probed: on GCE, GKE or Cloud Run build a
/// [`MetadataServerTokenProvider`] explicitly.
pub fn application_default_credentials(
    scopes: &[&str],
) -> Result<Arc<dyn AccessTokenProvider>> {
    let path = credentials_path(env::var_os(CREDENTIALS_ENV), env::var_os("HOME"))?;

    tracing::debug!(path = %path.display(), "loading application default credentials");
    provider_from_file(&path, scopes)
}
