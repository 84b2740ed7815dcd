//! Session lifecycle.
//!
//! A [`Session`] owns the transport to one information service endpoint and the logical
//! connection built on top of it. Transports are created lazily by [`Session::connect`] and
//! replaced once they report a closed or faulted channel; the logical connection is rebuilt
//! on every connect.
//!
//! A session is a single-owner object: every operation takes `&mut self`, so sharing one
//! between threads requires the caller to serialize access (or to hand each worker its own
//! [`Session::copy`]).
//!
//! # Errors
//!
//! [`Session::connect`] and [`Session::ensure_open`] report raw [`ServiceFault`]s. Only the
//! typed and tabular query paths translate failures into
//! [`ServiceCallError`](crate::error::ServiceCallError).
use std::sync::Arc;

use log::{debug, warn};

use crate::{
    catalog::{CatalogError, ServiceDescriptor},
    config::Settings,
    error::ServiceFault,
    protocol::{
        ChannelState, ConnectionState, Credentials, LogHeaderInspector, LogicalConnection,
        NotificationSubscriber, ServiceProvider, Transport,
    },
};

mod parameters;
mod subscriber;

pub use parameters::QueryParameters;
pub use subscriber::{ActiveSubscriberInfo, SUBSCRIBER_DATA_FORMAT, endpoint_address};

use subscriber::ActiveSubscriber;

pub struct Session {
    server: String,
    credentials: Credentials,
    descriptor: ServiceDescriptor,
    provider: Arc<dyn ServiceProvider>,
    settings: Arc<Settings>,
    transport: Option<Box<dyn Transport>>,
    connection: Option<Box<dyn LogicalConnection>>,
    active_subscriber: Option<ActiveSubscriber>,
    notification_subscriber: Option<Arc<dyn NotificationSubscriber>>,
    parameters: QueryParameters,
    can_create_subscription: bool,
}

impl Session {
    pub fn new(
        server: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        server_type: &str,
        provider: Arc<dyn ServiceProvider>,
        settings: Arc<Settings>,
    ) -> Result<Self, CatalogError> {
        let descriptor = ServiceDescriptor::resolve(server_type)?;

        Ok(Self {
            server: server.into(),
            credentials: Credentials {
                username: username.into(),
                password: password.into(),
            },
            descriptor,
            provider,
            settings,
            transport: None,
            connection: None,
            active_subscriber: None,
            notification_subscriber: None,
            parameters: QueryParameters::new(),
            can_create_subscription: false,
        })
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn set_server(&mut self, server: impl Into<String>) {
        self.server = server.into();
    }

    pub fn username(&self) -> &str {
        &self.credentials.username
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.credentials.username = username.into();
    }

    pub fn password(&self) -> &str {
        &self.credentials.password
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.credentials.password = password.into();
    }

    pub fn server_type(&self) -> &'static str {
        self.descriptor.identifier()
    }

    pub fn descriptor(&self) -> &ServiceDescriptor {
        &self.descriptor
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Display title, e.g. `"orion.local : Orion (v3) [admin]"`.
    pub fn title(&self) -> String {
        format!(
            "{} : {} [{}]",
            self.server,
            self.server_type(),
            self.credentials.username
        )
    }

    pub fn can_create_subscription(&self) -> bool {
        self.can_create_subscription
    }

    pub fn set_can_create_subscription(&mut self, value: bool) {
        self.can_create_subscription = value;
    }

    /// Subscriber that receives indications once an active subscriber channel is opened.
    pub fn set_notification_subscriber(&mut self, subscriber: Arc<dyn NotificationSubscriber>) {
        self.notification_subscriber = Some(subscriber);
    }

    pub fn parameters(&self) -> &QueryParameters {
        &self.parameters
    }

    /// State of the current transport, `None` before the first connect or after close.
    pub fn channel_state(&self) -> Option<ChannelState> {
        self.transport.as_ref().map(|t| t.state())
    }

    /// State of the current logical connection, `None` when there is none.
    pub fn connection_state(&self) -> Option<ConnectionState> {
        self.connection.as_ref().map(|c| c.state())
    }

    pub fn active_subscriber_info(&self) -> Option<&ActiveSubscriberInfo> {
        self.active_subscriber.as_ref().map(|s| s.info())
    }

    /// Opens the session.
    ///
    /// The transport is reused unless it is missing or stale, in which case the stale handle
    /// is disposed and a new one opened. A fresh logical connection is built and opened on
    /// every call.
    pub fn connect(&mut self) -> Result<(), ServiceFault> {
        if let Some(mut connection) = self.connection.take() {
            connection.close();
        }

        let current = self.transport.take();
        let transport = self.next_transport(current)?;
        let transport = self.transport.insert(transport);

        let mut connection = transport.create_connection();
        connection.open()?;
        debug!("opened logical connection to {}", self.server);
        self.connection = Some(connection);

        if self.settings.use_active_subscriber
            && self.descriptor.supports_active_subscriber
            && self.active_subscriber.is_none()
        {
            self.register_active_subscriber();
        }

        Ok(())
    }

    /// Reconnect transition: keeps a usable transport, otherwise disposes it and opens a new
    /// one.
    fn next_transport(
        &self,
        current: Option<Box<dyn Transport>>,
    ) -> Result<Box<dyn Transport>, ServiceFault> {
        match current {
            Some(transport) if !transport.state().is_stale() => {
                debug!(
                    "reusing {:?} transport to {}",
                    transport.state(),
                    self.server
                );
                Ok(transport)
            }
            Some(mut stale) => {
                debug!(
                    "replacing {:?} transport to {}",
                    stale.state(),
                    self.server
                );
                stale.dispose();
                self.open_transport()
            }
            None => self.open_transport(),
        }
    }

    fn open_transport(&self) -> Result<Box<dyn Transport>, ServiceFault> {
        debug!(
            "creating transport to {} ({})",
            self.server, self.descriptor
        );
        let mut transport =
            self.provider
                .create_transport(&self.server, &self.descriptor, &self.credentials)?;
        transport.set_operation_timeout(self.settings.operation_timeout());
        transport.add_inspector(Box::new(LogHeaderInspector));

        if let Err(e) = transport.open() {
            transport.dispose();
            return Err(e);
        }
        Ok(transport)
    }

    fn register_active_subscriber(&mut self) {
        match ActiveSubscriber::establish(
            self.provider.as_ref(),
            &self.server,
            &self.descriptor,
            &self.credentials,
            self.notification_subscriber.clone(),
            &self.settings.subscriber_namespace,
        ) {
            Ok(subscriber) => self.active_subscriber = Some(subscriber),
            Err(e) => warn!(
                "active subscriber unavailable for {}: {e}",
                self.server
            ),
        }
    }

    /// Reconnects when the logical connection is missing or no longer open.
    pub fn ensure_open(&mut self) -> Result<(), ServiceFault> {
        match self.connection_state() {
            Some(ConnectionState::Open) => Ok(()),
            state => {
                debug!("connection to {} is {state:?}, reconnecting", self.server);
                self.connect()
            }
        }
    }

    /// Disposes the transport and its logical connection. Safe to call repeatedly.
    pub fn close(&mut self) {
        if let Some(mut connection) = self.connection.take() {
            connection.close();
        }
        if let Some(mut transport) = self.transport.take() {
            debug!("disposing transport to {}", self.server);
            transport.dispose();
        }
    }

    /// Unconnected session to the same endpoint sharing this session's query parameters.
    pub fn copy(&self) -> Session {
        Session {
            server: self.server.clone(),
            credentials: self.credentials.clone(),
            descriptor: self.descriptor.clone(),
            provider: Arc::clone(&self.provider),
            settings: Arc::clone(&self.settings),
            transport: None,
            connection: None,
            active_subscriber: None,
            notification_subscriber: None,
            parameters: self.parameters.clone(),
            can_create_subscription: false,
        }
    }

    pub(crate) fn transport_mut(&mut self) -> Result<&mut dyn Transport, ServiceFault> {
        match self.transport.as_mut() {
            Some(transport) => Ok(&mut **transport),
            None => Err(ServiceFault::unclassified(format!(
                "session to {} is not connected",
                self.server
            ))),
        }
    }

    pub(crate) fn connection_mut(&mut self) -> Result<&mut dyn LogicalConnection, ServiceFault> {
        match self.connection.as_mut() {
            Some(connection) => Ok(&mut **connection),
            None => Err(ServiceFault::unclassified(format!(
                "session to {} has no open connection",
                self.server
            ))),
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("server", &self.server)
            .field("credentials", &self.credentials)
            .field("server_type", &self.server_type())
            .field("channel_state", &self.channel_state())
            .field("connection_state", &self.connection_state())
            .finish()
    }
}
