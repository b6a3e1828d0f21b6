//! Resource path construction for the Chronicle REST API.
//!
//! Paths are built by plain string formatting. Segments are inserted verbatim:
//! nothing is escaped or validated, so callers must pass well-formed ids.

use std::fmt;

const LOG_TYPES: &str = "logTypes";
const PARSERS: &str = "parsers";
const PARSER_EXTENSIONS: &str = "parserExtensions";

/// Identifies a single Chronicle instance: `(project, location, instance)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceIdentity {
    pub project: String,
    pub location: String,
    pub instance: String,
}

impl ResourceIdentity {
    pub fn new(
        project: impl Into<String>,
        location: impl Into<String>,
        instance: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            location: location.into(),
            instance: instance.into(),
        }
    }

    /// `projects/{project}/locations/{location}/instances/{instance}`
    pub fn instance_path(&self) -> String {
        format!(
            "projects/{}/locations/{}/instances/{}",
            self.project, self.location, self.instance
        )
    }

    /// `{instance}/logTypes`
    pub fn log_types_path(&self) -> String {
        format!("{}/{LOG_TYPES}", self.instance_path())
    }

    /// `{instance}/logTypes/{log_type}`
    pub fn log_type_path(&self, log_type: &str) -> String {
        format!("{}/{log_type}", self.log_types_path())
    }

    /// `{instance}/logTypes/{log_type}/parsers`
    pub fn parsers_path(&self, log_type: &str) -> String {
        format!("{}/{PARSERS}", self.log_type_path(log_type))
    }

    /// `{instance}/logTypes/{log_type}/parsers/{parser_id}`
    pub fn parser_path(&self, log_type: &str, parser_id: &str) -> String {
        format!("{}/{parser_id}", self.parsers_path(log_type))
    }

    /// `{instance}/logTypes/{log_type}/parserExtensions`
    pub fn parser_extensions_path(&self, log_type: &str) -> String {
        format!("{}/{PARSER_EXTENSIONS}", self.log_type_path(log_type))
    }

    /// `{instance}/logTypes/{log_type}/parserExtensions/{extension_id}`
    pub fn parser_extension_path(&self, log_type: &str, extension_id: &str) -> String {
        format!("{}/{extension_id}", self.parser_extensions_path(log_type))
    }
}

/// Custom (non-CRUD) method marker appended to a resource path as `:{method}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationSuffix {
    Activate,
    Deactivate,
    RunParser,
}

impl OperationSuffix {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationSuffix::Activate => "activate",
            OperationSuffix::Deactivate => "deactivate",
            OperationSuffix::RunParser => "runParser",
        }
    }

    #[inline]
    pub fn apply(&self, path: impl fmt::Display) -> String {
        format!("{path}:{}", self.as_str())
    }
}

impl fmt::Display for OperationSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
