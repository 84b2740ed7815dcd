use log::{debug, log_enabled, trace, Level};

use super::{Headers, INFO_SERVICE_NAMESPACE};

/// Hook invoked with the headers of every reply a transport receives.
pub trait MessageInspector: Send + Sync {
    fn after_receive_reply(&self, headers: &Headers);
}

/// Logs reply headers for diagnostics. Service headers are logged at debug level, everything
/// else at trace level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogHeaderInspector;

impl MessageInspector for LogHeaderInspector {
    fn after_receive_reply(&self, headers: &Headers) {
        if !log_enabled!(Level::Debug) {
            return;
        }

        for header in headers.iter() {
            if header.namespace == INFO_SERVICE_NAMESPACE {
                debug!("reply header {} = {}", header.name, header.value);
            } else {
                trace!(
                    "reply header {{{}}}{} = {}",
                    header.namespace, header.name, header.value
                );
            }
        }
    }
}
