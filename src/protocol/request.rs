use std::time::Duration;

use serde_json::Value;

use super::DATA_PROVIDER_TIMEOUT;

/// Typed query issued through a transport query context.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub query: String,
    pub parameters: Vec<(String, Value)>,
}

/// Tabular command executed on a logical connection.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryCommand {
    pub text: String,
    pub application_tag: String,
    pub parameters: Vec<(String, Value)>,
}

impl QueryCommand {
    pub fn new(text: impl Into<String>, application_tag: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            application_tag: application_tag.into(),
            parameters: Vec::new(),
        }
    }

    pub fn add_parameter(&mut self, name: impl Into<String>, value: Value) {
        self.parameters.push((name.into(), value));
    }
}

/// Per-call provider settings sent alongside a raw document query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub data_provider_timeout: Duration,
    pub application_tag: String,
    /// Ask the service to embed error details in the reply body.
    pub append_errors: bool,
}

impl ProviderSettings {
    pub fn new(application_tag: impl Into<String>) -> Self {
        Self {
            data_provider_timeout: DATA_PROVIDER_TIMEOUT,
            application_tag: application_tag.into(),
            append_errors: true,
        }
    }
}

/// Raw document query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryXmlRequest {
    pub query: String,
    pub parameters: Vec<(String, Value)>,
    pub settings: ProviderSettings,
}
