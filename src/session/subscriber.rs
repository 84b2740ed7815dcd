use std::{process, sync::Arc};

use log::{info, warn};
use serde::Serialize;

use crate::{
    catalog::ServiceDescriptor,
    error::ServiceFault,
    protocol::{Credentials, NotificationChannel, NotificationSubscriber, ServiceProvider},
};

/// Format in which the server delivers indications to the active subscriber.
pub const SUBSCRIBER_DATA_FORMAT: &str = "Xml";

/// Endpoint this client registered to receive pushed indications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveSubscriberInfo {
    pub endpoint_address: String,
    pub opened_successfully: bool,
    pub data_format: String,
}

/// Builds the endpoint address `active://<fqdn>/<namespace>/<pid>`.
pub fn endpoint_address(namespace: &str) -> String {
    format!("active://{}/{}/{}", local_fqdn(), namespace, process::id())
}

fn local_fqdn() -> String {
    hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|e| {
            warn!("failed to resolve local host name: {e}");
            "localhost".to_string()
        })
}

/// Open notification delivery channel registered as an active subscriber.
pub(crate) struct ActiveSubscriber {
    channel: Box<dyn NotificationChannel>,
    info: ActiveSubscriberInfo,
}

impl ActiveSubscriber {
    pub(crate) fn establish(
        provider: &dyn ServiceProvider,
        server: &str,
        descriptor: &ServiceDescriptor,
        credentials: &Credentials,
        subscriber: Option<Arc<dyn NotificationSubscriber>>,
        namespace: &str,
    ) -> Result<Self, ServiceFault> {
        let mut channel =
            provider.create_notification_channel(server, descriptor, credentials, subscriber)?;
        let address = endpoint_address(namespace);

        if let Err(e) = channel
            .open()
            .and_then(|_| channel.receive_indications(&address))
        {
            channel.close();
            return Err(e);
        }

        info!("registered active subscriber {address}");
        Ok(Self {
            channel,
            info: ActiveSubscriberInfo {
                endpoint_address: address,
                opened_successfully: true,
                data_format: SUBSCRIBER_DATA_FORMAT.to_string(),
            },
        })
    }

    pub(crate) fn info(&self) -> &ActiveSubscriberInfo {
        &self.info
    }
}

impl Drop for ActiveSubscriber {
    fn drop(&mut self) {
        self.channel.close();
    }
}
