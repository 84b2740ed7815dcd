//! Fault classification and normalization.
//!
//! Every failure raised by a [`Transport`](crate::protocol::Transport) or one of the objects
//! it produces is reported as a [`ServiceFault`], a tagged union describing where the failure
//! originated. Callers above the query boundary never see those variants directly: they are
//! collapsed into a single [`ServiceCallError`] carrying a display message and the preserved
//! cause.
//!
//! # Translation rules
//!
//! | fault | message | cause |
//! |---|---|---|
//! | `Structured` | fault contract message | the fault |
//! | `SecurityNegotiation` | own message | the fault |
//! | `Generic` with inner | inner message | the inner fault |
//! | `Generic` without inner | own message | the fault |
//! | `MessageSecurity` wrapping a service fault | inner message | the inner fault |
//! | `MessageSecurity` otherwise | own message | the fault |
//! | `Unclassified` | own message | the fault |
//!
//! # Example
//! ```rust
//! use swql_session::error::{FaultContract, ServiceCallError, ServiceFault};
//!
//! let fault = ServiceFault::Structured {
//!     message: "The creator of this fault did not specify a Reason.".into(),
//!     detail: FaultContract::new("Column not found"),
//! };
//! let err: ServiceCallError = fault.into();
//! assert_eq!(err.to_string(), "Column not found");
//! ```
use std::error::Error as StdError;

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Detail payload of a fault declared by the information service.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct FaultContract {
    pub message: String,
}

impl FaultContract {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Raw failure reported by the transport or security layer, before translation.
#[derive(Debug, Error)]
pub enum ServiceFault {
    /// Fault declared by the service with a structured contract.
    #[error("{message}")]
    Structured {
        message: String,
        detail: FaultContract,
    },

    /// Security negotiation with the endpoint failed.
    #[error("{message}")]
    SecurityNegotiation { message: String },

    /// Service fault without a contract, optionally wrapping another failure.
    #[error("{message}")]
    Generic {
        message: String,
        #[source]
        inner: Option<Box<ServiceFault>>,
    },

    /// Message-level security check failed.
    #[error("{message}")]
    MessageSecurity {
        message: String,
        #[source]
        inner: Option<Box<ServiceFault>>,
    },

    /// Anything that does not originate from the service channel itself.
    #[error("{message}")]
    Unclassified {
        message: String,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },
}

impl ServiceFault {
    /// Unclassified fault carrying only a message.
    pub fn unclassified(message: impl Into<String>) -> Self {
        ServiceFault::Unclassified {
            message: message.into(),
            source: None,
        }
    }

    /// Unclassified fault wrapping an arbitrary error, keeping its message.
    pub fn other<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        ServiceFault::Unclassified {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// Returns true for faults raised by the service itself (with or without a contract).
    pub fn is_service_fault(&self) -> bool {
        matches!(
            self,
            ServiceFault::Structured { .. } | ServiceFault::Generic { .. }
        )
    }
}

/// Normalized error surfaced to callers of the translated query paths.
///
/// The message is suitable for direct display; the original failure is kept as the
/// [`source`](std::error::Error::source) for diagnostics.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ServiceCallError {
    message: String,
    #[source]
    cause: ServiceFault,
}

impl ServiceCallError {
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> &ServiceFault {
        &self.cause
    }

    pub fn into_cause(self) -> ServiceFault {
        self.cause
    }
}

impl From<ServiceFault> for ServiceCallError {
    fn from(value: ServiceFault) -> Self {
        translate(value)
    }
}

/// Collapses a raw fault into a [`ServiceCallError`].
pub fn translate(fault: ServiceFault) -> ServiceCallError {
    let (message, cause) = match fault {
        ServiceFault::Structured { detail, message } => (
            detail.message.clone(),
            ServiceFault::Structured { message, detail },
        ),
        ServiceFault::Generic {
            inner: Some(inner), ..
        } => (inner.to_string(), *inner),
        ServiceFault::MessageSecurity {
            inner: Some(inner),
            message,
        } => {
            if inner.is_service_fault() {
                (inner.to_string(), *inner)
            } else {
                (
                    message.clone(),
                    ServiceFault::MessageSecurity {
                        message,
                        inner: Some(inner),
                    },
                )
            }
        }
        fault @ (ServiceFault::SecurityNegotiation { .. }
        | ServiceFault::Generic { inner: None, .. }
        | ServiceFault::MessageSecurity { inner: None, .. }
        | ServiceFault::Unclassified { .. }) => (fault.to_string(), fault),
    };

    debug!("translated service fault: {message}");
    ServiceCallError { message, cause }
}

/// Runs `action`, translating any raw fault it returns.
pub fn with_translation<T, F>(action: F) -> Result<T, ServiceCallError>
where
    F: FnOnce() -> Result<T, ServiceFault>,
{
    action().map_err(translate)
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    fn generic(message: &str, inner: Option<ServiceFault>) -> ServiceFault {
        ServiceFault::Generic {
            message: message.into(),
            inner: inner.map(Box::new),
        }
    }

    #[test]
    fn structured_fault_uses_contract_message() {
        let fault = ServiceFault::Structured {
            message: "fault reason".into(),
            detail: FaultContract::new("Column not found"),
        };

        let err = translate(fault);
        assert_eq!(err.message(), "Column not found");
        match err.cause() {
            ServiceFault::Structured { message, detail } => {
                assert_eq!(message, "fault reason");
                assert_eq!(detail.message, "Column not found");
            }
            other => panic!("unexpected cause {other:?}"),
        }
    }

    #[test]
    fn security_negotiation_uses_own_message() {
        let err = translate(ServiceFault::SecurityNegotiation {
            message: "SSPI negotiation failed".into(),
        });

        assert_eq!(err.to_string(), "SSPI negotiation failed");
        assert!(matches!(
            err.cause(),
            ServiceFault::SecurityNegotiation { .. }
        ));
    }

    #[test]
    fn generic_fault_prefers_inner_cause() {
        let inner = ServiceFault::unclassified("entity Orion.Foo does not exist");
        let err = translate(generic("outer", Some(inner)));

        assert_eq!(err.message(), "entity Orion.Foo does not exist");
        assert!(matches!(err.cause(), ServiceFault::Unclassified { .. }));
    }

    #[test]
    fn generic_fault_without_inner_uses_own_message() {
        let err = translate(generic("access denied", None));

        assert_eq!(err.message(), "access denied");
        assert!(matches!(err.cause(), ServiceFault::Generic { .. }));
    }

    #[test]
    fn message_security_unwraps_service_fault() {
        let fault = ServiceFault::MessageSecurity {
            message: "unsecured fault".into(),
            inner: Some(Box::new(generic("bad credentials", None))),
        };

        let err = translate(fault);
        assert_eq!(err.message(), "bad credentials");
        assert!(matches!(err.cause(), ServiceFault::Generic { .. }));
    }

    #[test]
    fn message_security_unwraps_structured_fault_by_its_own_message() {
        let fault = ServiceFault::MessageSecurity {
            message: "unsecured fault".into(),
            inner: Some(Box::new(ServiceFault::Structured {
                message: "structured reason".into(),
                detail: FaultContract::new("contract message"),
            })),
        };

        let err = translate(fault);
        assert_eq!(err.message(), "structured reason");
        assert!(matches!(err.cause(), ServiceFault::Structured { .. }));
    }

    #[test]
    fn message_security_keeps_own_message_for_plain_inner() {
        let fault = ServiceFault::MessageSecurity {
            message: "message security check failed".into(),
            inner: Some(Box::new(ServiceFault::other(io::Error::other(
                "clock skew",
            )))),
        };

        let err = translate(fault);
        assert_eq!(err.message(), "message security check failed");
        match err.cause() {
            ServiceFault::MessageSecurity { inner, .. } => {
                assert_eq!(inner.as_ref().unwrap().to_string(), "clock skew")
            }
            other => panic!("unexpected cause {other:?}"),
        }
    }

    #[test]
    fn message_security_without_inner_uses_own_message() {
        let err = translate(ServiceFault::MessageSecurity {
            message: "signature invalid".into(),
            inner: None,
        });

        assert_eq!(err.message(), "signature invalid");
    }

    #[test]
    fn unclassified_fault_keeps_source() {
        let err = translate(ServiceFault::other(io::Error::other("connection reset")));

        assert_eq!(err.message(), "connection reset");
        let source = err.source().expect("cause should be preserved");
        assert!(source.source().is_some());
    }

    #[test]
    fn with_translation_passes_success_through() {
        let value = with_translation(|| Ok::<_, ServiceFault>(42)).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    #[should_panic(expected = "timed out")]
    fn with_translation_normalizes_failure() {
        with_translation(|| Err::<(), _>(ServiceFault::unclassified("timed out"))).unwrap();
    }
}
