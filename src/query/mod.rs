//! Query execution over an open [`Session`].
//!
//! Three result shapes are supported:
//!
//! - [`Session::query`]: lazy sequence of typed records.
//! - [`Session::query_table`]: materialized table plus the optional execution plan.
//! - [`Session::query_xml`]: raw reply document with its plan and error list split out.
//!
//! Each call first makes sure the session is connected, reconnecting at most once.
//!
//! # Errors
//!
//! The typed and tabular calls return [`ServiceCallError`]; every fault raised while they run
//! goes through [`translate`](crate::error::translate). The raw document call returns the
//! original [`ServiceFault`] so callers can inspect the fault variant.
//!
//! # Example
//! ```rust,no_run
//! # use swql_session::session::Session;
//! # fn run(session: &mut Session) -> Result<(), Box<dyn std::error::Error>> {
//! #[derive(serde::Deserialize)]
//! struct Node {
//!     #[serde(rename = "Caption")]
//!     caption: String,
//! }
//!
//! for node in session.query::<Node>("SELECT Caption FROM Orion.Nodes")? {
//!     println!("{}", node?.caption);
//! }
//!
//! let result = session.query_table("SELECT TOP 10 NodeID FROM Orion.Nodes")?;
//! println!("{} rows", result.table.rows.len());
//! # Ok(())
//! # }
//! ```
use serde::de::DeserializeOwned;

use crate::{
    error::{ServiceCallError, ServiceFault, with_translation},
    protocol::{ProviderSettings, QueryCommand, QueryRequest, QueryXmlRequest, TableResult},
    session::Session,
};

mod document;
mod records;

pub use document::{DocumentResult, ErrorMessage};
pub use records::Records;

impl Session {
    /// Runs `query` and returns its rows as a lazy sequence of `T`.
    pub fn query<T: DeserializeOwned>(
        &mut self,
        query: &str,
    ) -> Result<Records<T>, ServiceCallError> {
        with_translation(|| {
            self.ensure_open()?;

            let request = QueryRequest {
                query: query.to_string(),
                parameters: self.parameters().snapshot(),
            };
            let cursor = self.transport_mut()?.query_rows(&request)?;
            Ok(Records::new(cursor))
        })
    }

    /// Runs `query` with the session parameters and materializes the result table.
    pub fn query_table(&mut self, query: &str) -> Result<TableResult, ServiceCallError> {
        with_translation(|| {
            self.ensure_open()?;

            let mut command = QueryCommand::new(query, self.settings().application_tag.as_str());
            for (name, value) in self.parameters().snapshot() {
                command.add_parameter(name, value);
            }
            self.connection_mut()?.execute(&command)
        })
    }

    /// Runs `query` as a raw document request.
    ///
    /// Faults are returned untranslated.
    pub fn query_xml(&mut self, query: &str) -> Result<DocumentResult, ServiceFault> {
        self.ensure_open()?;

        let request = QueryXmlRequest {
            query: query.to_string(),
            parameters: self.parameters().snapshot(),
            settings: ProviderSettings::new(self.settings().application_tag.as_str()),
        };
        let reply = self.transport_mut()?.query_xml(&request)?;
        document::split_reply(reply)
    }
}
