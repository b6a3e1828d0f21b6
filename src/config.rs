use std::{env, time::Duration};

use derive_builder::Builder;

use crate::error::ChronicleError;
use crate::paths::ResourceIdentity;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const ENDPOINT_DOMAIN: &str = "chronicle.googleapis.com";

const PROJECT_ENV: &str = "CHRONICLE_PROJECT";
const LOCATION_ENV: &str = "CHRONICLE_LOCATION";
const INSTANCE_ENV: &str = "CHRONICLE_INSTANCE";
const ENDPOINT_ENV: &str = "CHRONICLE_ENDPOINT";
const API_VERSION_ENV: &str = "CHRONICLE_API_VERSION";

/// Settings for a [`ChronicleClient`](crate::ChronicleClient).
#[derive(Debug, Clone, Builder)]
#[builder(pattern = "owned", setter(into, strip_option))]
pub struct ClientConfig {
    pub project: String,
    pub location: String,
    pub instance: String,
    /// Overrides the regional `https://{location}-chronicle.googleapis.com` endpoint.
    #[builder(default)]
    pub endpoint: Option<String>,
    /// Version segment placed between the endpoint and the resource path, e.g. `v1alpha`.
    #[builder(default)]
    pub api_version: Option<String>,
    #[builder(default = DEFAULT_TIMEOUT)]
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Reads the configuration from `CHRONICLE_*` environment variables.
    pub fn from_env() -> Result<Self, ChronicleError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Empty values count as unset.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ChronicleError> {
        let optional = |name: &str| lookup(name).filter(|value| !value.is_empty());
        let required = |name: &str| {
            optional(name).ok_or_else(|| ChronicleError::Config(format!("{name} is not set")))
        };

        Ok(Self {
            project: required(PROJECT_ENV)?,
            location: required(LOCATION_ENV)?,
            instance: required(INSTANCE_ENV)?,
            endpoint: optional(ENDPOINT_ENV),
            api_version: optional(API_VERSION_ENV),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn identity(&self) -> ResourceIdentity {
        ResourceIdentity::new(&self.project, &self.location, &self.instance)
    }

    /// Base URL every resource path is appended to.
    pub fn base_url(&self) -> String {
        let endpoint = match self.endpoint {
            Some(ref endpoint) => endpoint.trim_end_matches('/').to_owned(),
            None => format!("https://{}-{ENDPOINT_DOMAIN}", self.location),
        };

        match self.api_version {
            Some(ref version) => format!("{endpoint}/{version}"),
            None => endpoint,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::utils::with_env;

    fn lookup<'a>(vars: &'a HashMap<&str, &str>) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| vars.get(name).map(|value| value.to_string())
    }

    #[test]
    fn test_from_lookup() {
        let vars = HashMap::from([
            (PROJECT_ENV, "testproject"),
            (LOCATION_ENV, "us"),
            (INSTANCE_ENV, "12345"),
            (ENDPOINT_ENV, ""),
            (API_VERSION_ENV, "v1alpha"),
        ]);

        let config = ClientConfig::from_lookup(lookup(&vars)).unwrap();

        assert_eq!(config.identity(), ResourceIdentity::new("testproject", "us", "12345"));
        assert_eq!(config.endpoint, None);
        assert_eq!(config.api_version.as_deref(), Some("v1alpha"));
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_from_lookup_requires_identity() {
        let missing_instance = HashMap::from([(PROJECT_ENV, "testproject"), (LOCATION_ENV, "us")]);
        let empty_project = HashMap::from([
            (PROJECT_ENV, ""),
            (LOCATION_ENV, "us"),
            (INSTANCE_ENV, "12345"),
        ]);

        match ClientConfig::from_lookup(lookup(&missing_instance)) {
            Err(ChronicleError::Config(message)) => {
                assert_eq!(message, "CHRONICLE_INSTANCE is not set")
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(matches!(
            ClientConfig::from_lookup(lookup(&empty_project)),
            Err(ChronicleError::Config(_))
        ));
    }

    #[test]
    fn test_from_env() {
        let config = with_env(
            &[
                (PROJECT_ENV, Some("envproject")),
                (LOCATION_ENV, Some("europe")),
                (INSTANCE_ENV, Some("67890")),
                (ENDPOINT_ENV, Some("")),
                (API_VERSION_ENV, None),
            ],
            ClientConfig::from_env,
        )
        .unwrap();

        assert_eq!(config.base_url(), "https://europe-chronicle.googleapis.com");
        assert_eq!(config.identity(), ResourceIdentity::new("envproject", "europe", "67890"));

        let missing = with_env(
            &[(PROJECT_ENV, None), (LOCATION_ENV, Some("us")), (INSTANCE_ENV, Some("1"))],
            ClientConfig::from_env,
        );
        assert!(matches!(missing, Err(ChronicleError::Config(_))));
    }

    #[test]
    fn test_builder_defaults() {
        let config = ClientConfig::builder()
            .project("testproject")
            .location("us")
            .instance("12345")
            .build()
            .unwrap();

        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.endpoint, None);
        assert_eq!(config.base_url(), "https://us-chronicle.googleapis.com");
        assert_eq!(
            config.identity(),
            ResourceIdentity::new("testproject", "us", "12345")
        );
    }

    #[test]
    fn test_builder_requires_identity() {
        let result = ClientConfig::builder().project("testproject").build();

        assert!(result.is_err());
    }

    #[test]
    fn test_base_url_overrides() {
        let config = ClientConfig::builder()
            .project("testproject")
            .location("europe")
            .instance("12345")
            .endpoint("http://127.0.0.1:8080/")
            .api_version("v1alpha")
            .build()
            .unwrap();

        assert_eq!(config.base_url(), "http://127.0.0.1:8080/v1alpha");

        let config = ClientConfig {
            endpoint: None,
            ..config
        };
        assert_eq!(
            config.base_url(),
            "https://europe-chronicle.googleapis.com/v1alpha"
        );
    }
}
