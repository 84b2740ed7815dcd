use serde_json::Value;

use crate::error::ServiceFault;

/// Indication pushed by the server to an active subscriber.
#[derive(Debug, Clone, PartialEq)]
pub struct Indication {
    pub subscription_id: String,
    pub indication_type: String,
    pub properties: Value,
}

/// Receives indications delivered through a notification channel.
pub trait NotificationSubscriber: Send + Sync {
    fn on_indication(&self, indication: &Indication);
}

/// Secondary channel the server uses to push indications to this client.
pub trait NotificationChannel: Send {
    fn open(&mut self) -> Result<(), ServiceFault>;

    /// Asks the server to route indications for `address` through this channel.
    fn receive_indications(&mut self, address: &str) -> Result<(), ServiceFault>;

    fn close(&mut self);
}
