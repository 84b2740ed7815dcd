//! Scripted in-memory provider for unit tests.
use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use serde_json::Value;

use crate::{catalog::ServiceDescriptor, error::ServiceFault};

use super::{
    ChannelState, ConnectionState, Credentials, Headers, LogicalConnection, Message,
    MessageInspector, NotificationChannel, NotificationSubscriber, QueryCommand, QueryRequest,
    QueryXmlRequest, RowCursor, ServiceProvider, TableResult, Transport,
};

#[derive(Default)]
pub(crate) struct MockState {
    pub transports_created: usize,
    pub transports_disposed: usize,
    pub connections_created: usize,
    pub channel_states: Vec<Arc<Mutex<ChannelState>>>,
    pub connection_states: Vec<Arc<Mutex<ConnectionState>>>,
    pub operation_timeouts: Vec<Duration>,
    pub inspectors_attached: usize,

    pub open_fault: Option<ServiceFault>,
    pub execute_fault: Option<ServiceFault>,
    pub subscriber_fault: Option<ServiceFault>,

    pub table: TableResult,
    pub rows: Vec<Value>,
    pub row_fault_at: Option<usize>,
    pub reply: Option<Message>,

    pub commands: Vec<QueryCommand>,
    pub row_requests: Vec<QueryRequest>,
    pub xml_requests: Vec<QueryXmlRequest>,
    pub cursors_closed: usize,

    pub channels_opened: usize,
    pub channels_closed: usize,
    pub registered: Vec<String>,
}

#[derive(Clone, Default)]
pub(crate) struct MockProvider {
    shared: Arc<Mutex<MockState>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.shared.lock().unwrap()
    }

    /// Forces the state of the most recently created transport.
    pub fn set_channel_state(&self, state: ChannelState) {
        let handle = self.state().channel_states.last().cloned().unwrap();
        *handle.lock().unwrap() = state;
    }

    /// Forces the state of the most recently created logical connection.
    pub fn set_connection_state(&self, state: ConnectionState) {
        let handle = self.state().connection_states.last().cloned().unwrap();
        *handle.lock().unwrap() = state;
    }
}

impl ServiceProvider for MockProvider {
    fn create_transport(
        &self,
        _address: &str,
        _descriptor: &ServiceDescriptor,
        _credentials: &Credentials,
    ) -> Result<Box<dyn Transport>, ServiceFault> {
        let state = Arc::new(Mutex::new(ChannelState::Created));
        let mut shared = self.state();
        shared.transports_created += 1;
        shared.channel_states.push(Arc::clone(&state));

        Ok(Box::new(MockTransport {
            state,
            shared: Arc::clone(&self.shared),
            inspectors: Vec::new(),
        }))
    }

    fn create_notification_channel(
        &self,
        _address: &str,
        _descriptor: &ServiceDescriptor,
        _credentials: &Credentials,
        _subscriber: Option<Arc<dyn NotificationSubscriber>>,
    ) -> Result<Box<dyn NotificationChannel>, ServiceFault> {
        Ok(Box::new(MockChannel {
            shared: Arc::clone(&self.shared),
        }))
    }
}

struct MockTransport {
    state: Arc<Mutex<ChannelState>>,
    shared: Arc<Mutex<MockState>>,
    inspectors: Vec<Box<dyn MessageInspector>>,
}

impl MockTransport {
    fn shared(&self) -> MutexGuard<'_, MockState> {
        self.shared.lock().unwrap()
    }

    fn check_opened(&self) -> Result<(), ServiceFault> {
        match self.state() {
            ChannelState::Opened => Ok(()),
            state => Err(ServiceFault::Generic {
                message: format!("channel is {state:?}"),
                inner: None,
            }),
        }
    }
}

impl Transport for MockTransport {
    fn state(&self) -> ChannelState {
        *self.state.lock().unwrap()
    }

    fn set_operation_timeout(&mut self, timeout: Duration) {
        self.shared().operation_timeouts.push(timeout);
    }

    fn add_inspector(&mut self, inspector: Box<dyn MessageInspector>) {
        self.shared().inspectors_attached += 1;
        self.inspectors.push(inspector);
    }

    fn open(&mut self) -> Result<(), ServiceFault> {
        let fault = self.shared().open_fault.take();
        let mut state = self.state.lock().unwrap();
        match fault {
            Some(fault) => {
                *state = ChannelState::Faulted;
                Err(fault)
            }
            None => {
                *state = ChannelState::Opened;
                Ok(())
            }
        }
    }

    fn dispose(&mut self) {
        *self.state.lock().unwrap() = ChannelState::Closed;
        self.shared().transports_disposed += 1;
    }

    fn create_connection(&self) -> Box<dyn LogicalConnection> {
        let state = Arc::new(Mutex::new(ConnectionState::Closed));
        let mut shared = self.shared();
        shared.connections_created += 1;
        shared.connection_states.push(Arc::clone(&state));

        Box::new(MockConnection {
            state,
            shared: Arc::clone(&self.shared),
        })
    }

    fn query_rows(&mut self, request: &QueryRequest) -> Result<Box<dyn RowCursor>, ServiceFault> {
        self.check_opened()?;
        let mut shared = self.shared();
        shared.row_requests.push(request.clone());

        Ok(Box::new(MockCursor {
            rows: shared.rows.clone(),
            fault_at: shared.row_fault_at,
            position: 0,
            shared: Arc::clone(&self.shared),
        }))
    }

    fn query_xml(&mut self, request: &QueryXmlRequest) -> Result<Message, ServiceFault> {
        self.check_opened()?;
        let reply = {
            let mut shared = self.shared();
            shared.xml_requests.push(request.clone());
            shared.reply.clone().unwrap_or(Message {
                headers: Headers::new(),
                body: Value::Null,
            })
        };

        for inspector in &self.inspectors {
            inspector.after_receive_reply(&reply.headers);
        }
        Ok(reply)
    }
}

struct MockConnection {
    state: Arc<Mutex<ConnectionState>>,
    shared: Arc<Mutex<MockState>>,
}

impl LogicalConnection for MockConnection {
    fn state(&self) -> ConnectionState {
        *self.state.lock().unwrap()
    }

    fn open(&mut self) -> Result<(), ServiceFault> {
        *self.state.lock().unwrap() = ConnectionState::Open;
        Ok(())
    }

    fn close(&mut self) {
        *self.state.lock().unwrap() = ConnectionState::Closed;
    }

    fn execute(&mut self, command: &QueryCommand) -> Result<TableResult, ServiceFault> {
        if self.state() != ConnectionState::Open {
            return Err(ServiceFault::unclassified("connection is not open"));
        }

        let mut shared = self.shared.lock().unwrap();
        if let Some(fault) = shared.execute_fault.take() {
            return Err(fault);
        }
        shared.commands.push(command.clone());
        Ok(shared.table.clone())
    }
}

struct MockCursor {
    rows: Vec<Value>,
    fault_at: Option<usize>,
    position: usize,
    shared: Arc<Mutex<MockState>>,
}

impl RowCursor for MockCursor {
    fn next_row(&mut self) -> Option<Result<Value, ServiceFault>> {
        let position = self.position;
        self.position += 1;

        if self.fault_at == Some(position) {
            return Some(Err(ServiceFault::Structured {
                message: "cursor fault".into(),
                detail: crate::error::FaultContract::new("cursor lost"),
            }));
        }
        self.rows.get(position).cloned().map(Ok)
    }

    fn close(&mut self) {
        self.shared.lock().unwrap().cursors_closed += 1;
    }
}

struct MockChannel {
    shared: Arc<Mutex<MockState>>,
}

impl NotificationChannel for MockChannel {
    fn open(&mut self) -> Result<(), ServiceFault> {
        let mut shared = self.shared.lock().unwrap();
        if let Some(fault) = shared.subscriber_fault.take() {
            return Err(fault);
        }
        shared.channels_opened += 1;
        Ok(())
    }

    fn receive_indications(&mut self, address: &str) -> Result<(), ServiceFault> {
        self.shared
            .lock()
            .unwrap()
            .registered
            .push(address.to_string());
        Ok(())
    }

    fn close(&mut self) {
        self.shared.lock().unwrap().channels_closed += 1;
    }
}
