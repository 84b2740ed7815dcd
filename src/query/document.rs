use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::ServiceFault,
    protocol::{Document, HAS_ERRORS_HEADER, INFO_SERVICE_NAMESPACE, Message},
};

const RESULT_PATH: [&str; 2] = ["QueryXmlResponse", "QueryXmlResult"];
const QUERY_RESULT_NODE: &str = "queryResult";
const ERRORS_NODE: &str = "errors";
const QUERY_PLAN_NODE: &str = "queryPlan";

/// Error or warning reported by the service inside a raw document reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ErrorMessage {
    #[serde(rename = "Type")]
    pub error_type: String,
    pub message: String,
    pub context: Option<String>,
    pub code: Option<String>,
}

/// Raw document reply with its embedded plan and error list split out.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentResult {
    /// Reply body without the `errors` and `queryPlan` nodes.
    pub body: Document,
    pub plan: Option<Document>,
    /// Present only when the reply announced errors and carried an `errors` node.
    pub errors: Option<Vec<ErrorMessage>>,
}

/// Splits the plan and error list out of a raw document reply.
///
/// The error list is only looked for when the `hasErrors` header is present and true.
pub(crate) fn split_reply(reply: Message) -> Result<DocumentResult, ServiceFault> {
    let Message { headers, mut body } = reply;

    let has_errors = headers
        .get_bool(HAS_ERRORS_HEADER, INFO_SERVICE_NAMESPACE)?
        .unwrap_or(false);

    let errors = if has_errors {
        take_node(&mut body, &RESULT_PATH, ERRORS_NODE)
            .map(error_messages)
            .transpose()?
    } else {
        None
    };
    if let Some(errors) = &errors {
        debug!("reply carried {} error messages", errors.len());
    }

    let plan_path = [RESULT_PATH[0], RESULT_PATH[1], QUERY_RESULT_NODE];
    let plan = take_node(&mut body, &plan_path, QUERY_PLAN_NODE);

    Ok(DocumentResult { body, plan, errors })
}

/// Removes `name` from the object found at `path`, returning it.
fn take_node(body: &mut Value, path: &[&str], name: &str) -> Option<Value> {
    let mut node = body;
    for segment in path {
        node = node.get_mut(*segment)?;
    }
    node.as_object_mut()?.remove(name)
}

fn error_messages(node: Value) -> Result<Vec<ErrorMessage>, ServiceFault> {
    let children = match node {
        Value::Array(items) => items,
        Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
        Value::Null => Vec::new(),
        other => vec![other],
    };

    children
        .into_iter()
        .filter(|child| !child.is_null())
        .map(|child| serde_json::from_value(child).map_err(ServiceFault::other))
        .collect()
}
