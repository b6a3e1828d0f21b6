//! Resource and response shapes returned by the Chronicle API.
//!
//! Field names follow the JSON tags of the REST resources. Optional fields are
//! skipped when absent so a decoded value serializes back to the same shape.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_derive::{Deserialize, Serialize};
use serde_json::Value;

/// Response of methods that return `google.protobuf.Empty`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub golden: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLogTypesResult {
    #[serde(default)]
    pub log_types: Vec<LogType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunParserResult {
    #[serde(default)]
    pub run_parser_results: Vec<ParserLogResult>,
}

/// Outcome of running a parser over a single sample log line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParserLogResult {
    /// The base64 encoded log line as it was submitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub statedump_results: Vec<StatedumpResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed_events: Option<ParsedEvents>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Status>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatedumpResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statedump_result: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedEvents {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<ParsedEvent>,
}

/// A UDM event or entity emitted by a parser. The shape is owned by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<Value>,
}

/// `google.rpc.Status`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Status {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<HashMap<String, Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<HashMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changelogs: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parser_extension: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub parser_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_report: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validated_on_empty_logs: Option<bool>,
    /// Base64 encoded parser source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cbn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_code: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_stage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_stage: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParsersResult {
    #[serde(default)]
    pub parsers: Vec<Parser>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParserExtension {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Base64 encoded extension source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cbn_snippet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_list_log_types() {
        let result: ListLogTypesResult = serde_json::from_value(json!({
            "logTypes": [
                {
                    "name": "projects/p/locations/us/instances/i/logTypes/WINEVTLOG",
                    "displayName": "Windows Event Log",
                    "golden": true
                },
                { "name": "projects/p/locations/us/instances/i/logTypes/OKTA" }
            ],
            "nextPageToken": "next"
        }))
        .unwrap();

        assert_eq!(result.log_types.len(), 2);
        assert_eq!(
            result.log_types[0].display_name.as_deref(),
            Some("Windows Event Log")
        );
        assert_eq!(result.log_types[0].golden, Some(true));
        assert_eq!(result.log_types[1].golden, None);
        assert_eq!(result.next_page_token.as_deref(), Some("next"));
    }

    #[test]
    fn test_decode_run_parser_result() {
        let result: RunParserResult = serde_json::from_value(json!({
            "runParserResults": [
                {
                    "log": "bXkgbG9nIG51bWJlciAx",
                    "statedumpResults": [{ "label": "dump", "statedumpResult": "{}" }],
                    "parsedEvents": {
                        "events": [{ "event": { "metadata": { "eventType": "USER_LOGIN" } } }]
                    }
                },
                {
                    "log": "bG9nIG51bWJlciAy",
                    "error": { "code": 3, "message": "failed to parse" }
                }
            ]
        }))
        .unwrap();

        let first = &result.run_parser_results[0];
        let events = &first.parsed_events.as_ref().unwrap().events;
        assert_eq!(
            events[0].event.as_ref().unwrap()["metadata"]["eventType"],
            "USER_LOGIN"
        );
        assert_eq!(first.statedump_results[0].label.as_deref(), Some("dump"));

        let second = &result.run_parser_results[1];
        assert_eq!(second.error.as_ref().unwrap().code, Some(3));
    }

    #[test]
    fn test_decode_parser() {
        let parser: Parser = serde_json::from_value(json!({
            "name": "projects/p/locations/us/instances/i/logTypes/WINEVTLOG/parsers/abc",
            "createTime": "2024-05-01T10:00:00.123456Z",
            "type": "CUSTOM",
            "state": "ACTIVE",
            "cbn": "bXkgY2JuIGZpbGU=",
            "lowCode": { "fields": [] },
            "creator": { "author": "someone" }
        }))
        .unwrap();

        assert_eq!(parser.parser_type.as_deref(), Some("CUSTOM"));
        assert_eq!(
            parser.create_time.unwrap().to_rfc3339(),
            "2024-05-01T10:00:00.123456+00:00"
        );
        assert_eq!(parser.creator.unwrap()["author"], "someone");
        assert!(parser.low_code.is_some());
    }

    #[test]
    fn test_empty_body_decodes_to_empty_lists() {
        let parsers: ListParsersResult = serde_json::from_str("{}").unwrap();
        let log_types: ListLogTypesResult = serde_json::from_str("{}").unwrap();

        assert!(parsers.parsers.is_empty());
        assert!(log_types.log_types.is_empty());
    }

    #[test]
    fn test_absent_fields_are_not_serialized() {
        let value = serde_json::to_value(Parser::default()).unwrap();

        assert_eq!(value, json!({}));
    }
}
