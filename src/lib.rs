pub mod catalog;
pub mod config;
pub mod error;
pub mod protocol;
pub mod query;
pub mod session;

pub use catalog::{ServerType, ServiceDescriptor, list_server_types};
pub use config::Settings;
pub use error::{ServiceCallError, ServiceFault};
pub use query::{DocumentResult, ErrorMessage, Records};
pub use session::{ActiveSubscriberInfo, QueryParameters, Session};
