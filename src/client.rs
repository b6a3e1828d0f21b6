use std::sync::Arc;

use reqwest::Client;

use crate::config::ClientConfig;
use crate::error::{ChronicleError, Result};
use crate::gauth::{AccessTokenProvider, CLOUD_PLATFORM_SCOPE, application_default_credentials};
use crate::paths::ResourceIdentity;
use crate::requests::{
    ActivateParserExtensionRequest, ActivateParserRequest, ApiRequest,
    CreateParserExtensionRequest, CreateParserRequest, DeactivateParserRequest,
    DeleteParserExtensionRequest, DeleteParserRequest, GetParserRequest, ListLogTypesRequest,
    ListParsersRequest, RunParserRequest,
};
use crate::resources::{
    ListLogTypesResult, ListParsersResult, Parser, ParserExtension, RunParserResult,
};

const QUOTA_PROJECT_HEADER: &str = "x-goog-user-project";

/// Client for a single Chronicle instance.
///
/// Cloning is cheap: the HTTP connection pool and the token provider are shared.
#[derive(Clone)]
pub struct ChronicleClient {
    identity: ResourceIdentity,
    base_url: Arc<str>,
    tokens: Arc<dyn AccessTokenProvider>,
    http_client: Client,
}

impl std::fmt::Debug for ChronicleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChronicleClient")
            .field("identity", &self.identity)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ChronicleClient {
    /// Creates a client that authenticates every call with tokens from `tokens`.
    pub fn new(config: ClientConfig, tokens: Arc<dyn AccessTokenProvider>) -> Result<Self> {
        let http_client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            identity: config.identity(),
            base_url: Arc::from(config.base_url()),
            tokens,
            http_client,
        })
    }

    /// Creates a client authenticated with Application Default Credentials.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let tokens = application_default_credentials(&[CLOUD_PLATFORM_SCOPE])?;

        Self::new(config, tokens)
    }

    #[inline]
    pub fn identity(&self) -> &ResourceIdentity {
        &self.identity
    }

    #[inline]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends `request` and decodes the response body into its output type.
    pub async fn execute<R: ApiRequest>(&self, request: &R) -> Result<R::Output> {
        let url = format!("{}/{}", self.base_url, request.path());
        let method = request.method();
        let access_token = self.tokens.access_token().await?;

        tracing::debug!(%method, %url, "sending chronicle request");

        let mut builder = self
            .http_client
            .request(method.clone(), &url)
            .bearer_auth(access_token);

        if let Some(project) = self.tokens.quota_project() {
            builder = builder.header(QUOTA_PROJECT_HEADER, project);
        }

        let query = request.query();
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        if let Some(body) = request.body() {
            builder = builder.json(&body);
        }

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await?;
            tracing::warn!(%method, %url, %status, "chronicle request failed");
            return Err(ChronicleError::Response { status, body });
        }

        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::from_slice(b"{}")?);
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn list_log_types(&self, request: &ListLogTypesRequest) -> Result<ListLogTypesResult> {
        self.execute(request).await
    }

    pub async fn run_parser(&self, request: &RunParserRequest) -> Result<RunParserResult> {
        self.execute(request).await
    }

    pub async fn activate_parser(&self, request: &ActivateParserRequest) -> Result<()> {
        self.execute(request).await.map(drop)
    }

    pub async fn create_parser(&self, request: &CreateParserRequest) -> Result<Parser> {
        self.execute(request).await
    }

    pub async fn deactivate_parser(&self, request: &DeactivateParserRequest) -> Result<()> {
        self.execute(request).await.map(drop)
    }

    pub async fn delete_parser(&self, request: &DeleteParserRequest) -> Result<()> {
        self.execute(request).await.map(drop)
    }

    pub async fn get_parser(&self, request: &GetParserRequest) -> Result<Parser> {
        self.execute(request).await
    }

    pub async fn list_parsers(&self, request: &ListParsersRequest) -> Result<ListParsersResult> {
        self.execute(request).await
    }

    pub async fn activate_parser_extension(
        &self,
        request: &ActivateParserExtensionRequest,
    ) -> Result<()> {
        self.execute(request).await.map(drop)
    }

    pub async fn create_parser_extension(
        &self,
        request: &CreateParserExtensionRequest,
    ) -> Result<ParserExtension> {
        self.execute(request).await
    }

    pub async fn delete_parser_extension(
        &self,
        request: &DeleteParserExtensionRequest,
    ) -> Result<()> {
        self.execute(request).await.map(drop)
    }
}
