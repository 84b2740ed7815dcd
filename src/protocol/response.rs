use serde_json::Value;

use crate::error::ServiceFault;

/// XML namespace of the information service contract.
pub const INFO_SERVICE_NAMESPACE: &str = "http://schemas.solarwinds.com/2007/08/informationservice";

/// Reply header signalling that the body carries an `errors` node.
pub const HAS_ERRORS_HEADER: &str = "hasErrors";

#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub name: String,
    pub namespace: String,
    pub value: Value,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Headers(Vec<Header>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, namespace: impl Into<String>, value: Value) {
        self.0.push(Header {
            name: name.into(),
            namespace: namespace.into(),
            value,
        });
    }

    pub fn find(&self, name: &str, namespace: &str) -> Option<&Header> {
        self.0
            .iter()
            .find(|h| h.name == name && h.namespace == namespace)
    }

    /// Reads a boolean header. Absent headers yield `None`; a header holding anything other
    /// than a boolean is a fault.
    pub fn get_bool(&self, name: &str, namespace: &str) -> Result<Option<bool>, ServiceFault> {
        match self.find(name, namespace) {
            None => Ok(None),
            Some(header) => header.value.as_bool().map(Some).ok_or_else(|| {
                ServiceFault::unclassified(format!(
                    "header '{name}' is not a boolean: {}",
                    header.value
                ))
            }),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Header> {
        self.0.iter()
    }
}

/// Reply envelope of a raw document query.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub headers: Headers,
    pub body: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub data_type: String,
}

/// Fully materialized tabular result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTable {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Value>>,
}

/// Tabular result with the execution plan the server produced, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableResult {
    pub table: DataTable,
    pub plan: Option<Value>,
}
