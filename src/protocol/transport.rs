use std::time::Duration;

use serde_json::Value;

use crate::error::ServiceFault;

use super::{
    MessageInspector, QueryCommand, QueryRequest, QueryXmlRequest, TableResult,
    response::Message,
};

/// Lifecycle state reported by a transport channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Created,
    Opening,
    Opened,
    Closing,
    Closed,
    Faulted,
}

impl ChannelState {
    /// A closed or faulted channel can never be reopened and has to be replaced.
    pub fn is_stale(self) -> bool {
        matches!(self, ChannelState::Closed | ChannelState::Faulted)
    }
}

/// State of a logical connection built on a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Closed,
    Connecting,
    Open,
    Broken,
}

/// Channel handle to the information service.
pub trait Transport: Send {
    fn state(&self) -> ChannelState;

    fn set_operation_timeout(&mut self, timeout: Duration);

    /// Attaches an inspector that sees the headers of every reply.
    fn add_inspector(&mut self, inspector: Box<dyn MessageInspector>);

    fn open(&mut self) -> Result<(), ServiceFault>;

    /// Releases the channel. Faulted channels are aborted instead of closed gracefully.
    fn dispose(&mut self);

    /// Builds a new, unopened logical connection on this channel.
    fn create_connection(&self) -> Box<dyn LogicalConnection>;

    /// Starts a typed query and returns a cursor over its rows.
    fn query_rows(&mut self, request: &QueryRequest) -> Result<Box<dyn RowCursor>, ServiceFault>;

    /// Sends a raw document query and returns the reply envelope.
    fn query_xml(&mut self, request: &QueryXmlRequest) -> Result<Message, ServiceFault>;
}

/// Execution context for tabular commands.
pub trait LogicalConnection: Send {
    fn state(&self) -> ConnectionState;

    fn open(&mut self) -> Result<(), ServiceFault>;

    fn close(&mut self);

    /// Executes `command`, fully materializing its result table and plan.
    fn execute(&mut self, command: &QueryCommand) -> Result<TableResult, ServiceFault>;
}

/// Forward-only cursor over the rows of a typed query, together with the query context it
/// was opened in.
pub trait RowCursor: Send {
    fn next_row(&mut self) -> Option<Result<Value, ServiceFault>>;

    /// Releases the cursor and its query context.
    fn close(&mut self);
}
