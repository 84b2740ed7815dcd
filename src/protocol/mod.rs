//! Boundary to the information service connection library.
//!
//! This module declares the collaborators a [`Session`](crate::session::Session) is built on.
//! The wire encoding and security negotiation live behind these traits; the session only
//! drives their lifecycle and interprets what they return.
//!
//! # Overview
//!
//! A [`ServiceProvider`] turns a server address and [`ServiceDescriptor`] into a
//! [`Transport`], the channel handle. A transport walks through the [`ChannelState`] machine
//!
//! ```text
//! Created -> Opening -> Opened -> Closing -> Closed
//!                          \
//!                           -> Faulted
//! ```
//!
//! and only an `Opened` transport carries queries. On top of an open transport a
//! [`LogicalConnection`] scopes tabular commands, a [`RowCursor`] streams typed query rows,
//! and [`Transport::query_xml`] exchanges raw [`Message`] envelopes.
//!
//! A provider may also open a [`NotificationChannel`] used to register an active subscriber
//! endpoint that receives indications pushed by the server.
//!
//! # Key Components
//!
//! - [`Transport`]: channel handle with an observable state.
//! - [`LogicalConnection`]: execution context for tabular commands.
//! - [`QueryXmlRequest`] / [`Message`]: request and response envelope for raw documents.
//! - [`LogHeaderInspector`]: diagnostic inspector attached to every new transport.
//!
//! # See Also
//!
//! - [`error`](crate::error): fault taxonomy every collaborator reports failures with.
use std::{sync::Arc, time::Duration};

use serde_json::Value;

use crate::{catalog::ServiceDescriptor, error::ServiceFault};

mod inspector;
#[cfg(test)]
pub(crate) mod mock;
mod notification;
mod request;
mod response;
mod transport;

pub use inspector::{LogHeaderInspector, MessageInspector};
pub use notification::{Indication, NotificationChannel, NotificationSubscriber};
pub use request::{ProviderSettings, QueryCommand, QueryRequest, QueryXmlRequest};
pub use response::{
    Column, DataTable, HAS_ERRORS_HEADER, Header, Headers, INFO_SERVICE_NAMESPACE, Message,
    TableResult,
};
pub use transport::{ChannelState, ConnectionState, LogicalConnection, RowCursor, Transport};

/// Structured document exchanged with the service (result bodies, plans).
pub type Document = Value;

/// Credentials handed to the provider for every channel it creates.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Factory for channels to an information service endpoint.
pub trait ServiceProvider: Send + Sync {
    /// Creates an unopened transport for `address`.
    fn create_transport(
        &self,
        address: &str,
        descriptor: &ServiceDescriptor,
        credentials: &Credentials,
    ) -> Result<Box<dyn Transport>, ServiceFault>;

    /// Creates an unopened notification delivery channel for `address`.
    fn create_notification_channel(
        &self,
        address: &str,
        descriptor: &ServiceDescriptor,
        credentials: &Credentials,
        subscriber: Option<Arc<dyn NotificationSubscriber>>,
    ) -> Result<Box<dyn NotificationChannel>, ServiceFault>;
}

/// Provider-side timeout applied to raw document queries.
pub const DATA_PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);
