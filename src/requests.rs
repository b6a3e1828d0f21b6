//! Request objects, one per API method.
//!
//! Every request is built by a pure constructor from the instance identity and
//! the raw caller inputs. Binary payloads are base64 encoded at construction
//! time, so a request only ever holds wire-ready values.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

use crate::encoding::{encode_blob, encode_logs};
use crate::paths::{OperationSuffix, ResourceIdentity};
use crate::resources::{
    Empty, ListLogTypesResult, ListParsersResult, Parser, ParserExtension, RunParserResult,
};

/// A single call against the Chronicle API.
///
/// The client sends `method()` to `path()` with the query pairs and the
/// optional JSON body, then decodes a successful response into `Output`.
pub trait ApiRequest {
    type Output: DeserializeOwned;

    fn method(&self) -> Method;

    fn path(&self) -> &str;

    fn query(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    fn body(&self) -> Option<Value> {
        None
    }
}

fn page_query(
    page_size: Option<u32>,
    page_token: Option<&str>,
    filter: Option<&str>,
) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(page_size) = page_size {
        query.push(("pageSize", page_size.to_string()));
    }
    if let Some(page_token) = page_token {
        query.push(("pageToken", page_token.to_owned()));
    }
    if let Some(filter) = filter {
        query.push(("filter", filter.to_owned()));
    }
    query
}

// Resource: LogTypes

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListLogTypesRequest {
    pub path: String,
    pub page_size: Option<u32>,
    pub page_token: Option<String>,
}

impl ListLogTypesRequest {
    pub fn new(identity: &ResourceIdentity) -> Self {
        Self {
            path: identity.log_types_path(),
            page_size: None,
            page_token: None,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn with_page_token(mut self, page_token: impl Into<String>) -> Self {
        self.page_token = Some(page_token.into());
        self
    }
}

impl ApiRequest for ListLogTypesRequest {
    type Output = ListLogTypesResult;

    fn method(&self) -> Method {
        Method::GET
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        page_query(self.page_size, self.page_token.as_deref(), None)
    }
}

/// Dry-runs a parser (and optionally an extension) over sample log lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunParserRequest {
    pub path: String,
    pub cbn: String,
    pub cbn_snippet: String,
    pub log: Vec<String>,
    pub statedump_allowed: bool,
}

impl RunParserRequest {
    /// Empty `logs` entries are dropped before encoding.
    pub fn new<I, S>(
        identity: &ResourceIdentity,
        log_type: &str,
        cbn: impl AsRef<[u8]>,
        cbn_snippet: impl AsRef<[u8]>,
        logs: I,
        statedump_allowed: bool,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            path: OperationSuffix::RunParser.apply(identity.log_type_path(log_type)),
            cbn: encode_blob(cbn),
            cbn_snippet: encode_blob(cbn_snippet),
            log: encode_logs(logs),
            statedump_allowed,
        }
    }
}

impl ApiRequest for RunParserRequest {
    type Output = RunParserResult;

    fn method(&self) -> Method {
        Method::POST
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn body(&self) -> Option<Value> {
        let mut body = Map::new();
        body.insert("parser".to_owned(), json!({ "cbn": self.cbn }));
        if !self.cbn_snippet.is_empty() {
            body.insert(
                "parserExtension".to_owned(),
                json!({ "cbnSnippet": self.cbn_snippet }),
            );
        }
        body.insert("log".to_owned(), json!(self.log));
        body.insert(
            "statedumpAllowed".to_owned(),
            Value::Bool(self.statedump_allowed),
        );
        Some(Value::Object(body))
    }
}

// Resource: Parsers

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivateParserRequest {
    pub path: String,
}

impl ActivateParserRequest {
    pub fn new(identity: &ResourceIdentity, log_type: &str, parser_id: &str) -> Self {
        Self {
            path: OperationSuffix::Activate.apply(identity.parser_path(log_type, parser_id)),
        }
    }
}

impl ApiRequest for ActivateParserRequest {
    type Output = Empty;

    fn method(&self) -> Method {
        Method::POST
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn body(&self) -> Option<Value> {
        Some(json!({}))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateParserRequest {
    pub path: String,
    pub cbn: String,
    pub validated_on_empty_logs: bool,
}

impl CreateParserRequest {
    pub fn new(
        identity: &ResourceIdentity,
        log_type: &str,
        cbn: impl AsRef<[u8]>,
        validated_on_empty_logs: bool,
    ) -> Self {
        Self {
            path: identity.parsers_path(log_type),
            cbn: encode_blob(cbn),
            validated_on_empty_logs,
        }
    }
}

impl ApiRequest for CreateParserRequest {
    type Output = Parser;

    fn method(&self) -> Method {
        Method::POST
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        if self.validated_on_empty_logs {
            vec![("validatedOnEmptyLogs", "true".to_owned())]
        } else {
            Vec::new()
        }
    }

    fn body(&self) -> Option<Value> {
        Some(json!({ "cbn": self.cbn }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeactivateParserRequest {
    pub path: String,
}

impl DeactivateParserRequest {
    pub fn new(identity: &ResourceIdentity, log_type: &str, parser_id: &str) -> Self {
        Self {
            path: OperationSuffix::Deactivate.apply(identity.parser_path(log_type, parser_id)),
        }
    }
}

impl ApiRequest for DeactivateParserRequest {
    type Output = Empty;

    fn method(&self) -> Method {
        Method::POST
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn body(&self) -> Option<Value> {
        Some(json!({}))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteParserRequest {
    pub path: String,
    pub force: bool,
}

impl DeleteParserRequest {
    pub fn new(identity: &ResourceIdentity, log_type: &str, parser_id: &str, force: bool) -> Self {
        Self {
            path: identity.parser_path(log_type, parser_id),
            force,
        }
    }
}

impl ApiRequest for DeleteParserRequest {
    type Output = Empty;

    fn method(&self) -> Method {
        Method::DELETE
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        if self.force {
            vec![("force", "true".to_owned())]
        } else {
            Vec::new()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetParserRequest {
    pub path: String,
}

impl GetParserRequest {
    pub fn new(identity: &ResourceIdentity, log_type: &str, parser_id: &str) -> Self {
        Self {
            path: identity.parser_path(log_type, parser_id),
        }
    }
}

impl ApiRequest for GetParserRequest {
    type Output = Parser;

    fn method(&self) -> Method {
        Method::GET
    }

    fn path(&self) -> &str {
        &self.path
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParsersRequest {
    pub path: String,
    pub page_size: Option<u32>,
    pub page_token: Option<String>,
    pub filter: Option<String>,
}

impl ListParsersRequest {
    pub fn new(identity: &ResourceIdentity, log_type: &str) -> Self {
        Self {
            path: identity.parsers_path(log_type),
            page_size: None,
            page_token: None,
            filter: None,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn with_page_token(mut self, page_token: impl Into<String>) -> Self {
        self.page_token = Some(page_token.into());
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }
}

impl ApiRequest for ListParsersRequest {
    type Output = ListParsersResult;

    fn method(&self) -> Method {
        Method::GET
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        page_query(
            self.page_size,
            self.page_token.as_deref(),
            self.filter.as_deref(),
        )
    }
}

// Resource: ParserExtensions

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivateParserExtensionRequest {
    pub path: String,
}

impl ActivateParserExtensionRequest {
    pub fn new(identity: &ResourceIdentity, log_type: &str, extension_id: &str) -> Self {
        Self {
            path: OperationSuffix::Activate
                .apply(identity.parser_extension_path(log_type, extension_id)),
        }
    }
}

impl ApiRequest for ActivateParserExtensionRequest {
    type Output = Empty;

    fn method(&self) -> Method {
        Method::POST
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn body(&self) -> Option<Value> {
        Some(json!({}))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateParserExtensionRequest {
    pub path: String,
    pub cbn_snippet: String,
}

impl CreateParserExtensionRequest {
    pub fn new(identity: &ResourceIdentity, log_type: &str, cbn_snippet: impl AsRef<[u8]>) -> Self {
        Self {
            path: identity.parser_extensions_path(log_type),
            cbn_snippet: encode_blob(cbn_snippet),
        }
    }
}

impl ApiRequest for CreateParserExtensionRequest {
    type Output = ParserExtension;

    fn method(&self) -> Method {
        Method::POST
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn body(&self) -> Option<Value> {
        Some(json!({ "cbnSnippet": self.cbn_snippet }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteParserExtensionRequest {
    pub path: String,
}

impl DeleteParserExtensionRequest {
    // NOTE: addresses the parsers collection, not parserExtensions. Kept until
    // the API owner confirms which collection extensions are deleted from.
    pub fn new(identity: &ResourceIdentity, log_type: &str, extension_id: &str) -> Self {
        Self {
            path: identity.parser_path(log_type, extension_id),
        }
    }
}

impl ApiRequest for DeleteParserExtensionRequest {
    type Output = Empty;

    fn method(&self) -> Method {
        Method::DELETE
    }

    fn path(&self) -> &str {
        &self.path
    }
}
