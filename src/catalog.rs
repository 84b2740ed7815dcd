//! Server type catalog.
//!
//! A server type identifier (e.g. `"Orion (v3) over HTTPS"`) selects how a session reaches
//! the information service: protocol generation, transport binding, credential mode and
//! whether the service can push indications back to the client.
//!
//! # Example
//! ```rust
//! use swql_session::catalog::{self, ProtocolVersion, ServiceDescriptor};
//!
//! let types = catalog::list_server_types(false);
//! assert_eq!(types[0].identifier, "Orion (v3)");
//!
//! let descriptor = ServiceDescriptor::resolve("Orion (v2) AD").unwrap();
//! assert_eq!(descriptor.protocol, ProtocolVersion::V2);
//! assert!(!descriptor.supports_active_subscriber);
//! ```
use std::fmt;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("unknown server type '{0}'")]
    UnknownServerType(String),
}

/// Entry of the server type catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServerType {
    pub identifier: &'static str,
    pub requires_authentication: bool,
}

const fn server_type(identifier: &'static str, requires_authentication: bool) -> ServerType {
    ServerType {
        identifier,
        requires_authentication,
    }
}

const SERVER_TYPES: [ServerType; 13] = [
    server_type("Orion (v3)", true),
    server_type("Orion (v3) AD", false),
    server_type("Orion (v3) Certificate", false),
    server_type("Orion (v3) over HTTPS", true),
    server_type("Orion (v2)", true),
    server_type("Orion (v2) AD", false),
    server_type("Orion (v2) Certificate", false),
    server_type("Orion (v2) over HTTPS", true),
    server_type("EOC", true),
    server_type("NCM", true),
    server_type("NCM (Windows Authentication)", false),
    server_type("NCM Integration", true),
    server_type("Java over HTTP", true),
];

const COMPRESSED_SERVER_TYPES: [ServerType; 4] = [
    server_type("Orion (v2) Compressed", true),
    server_type("Orion (v2) AD Compressed", false),
    server_type("Orion (v3) Compressed", true),
    server_type("Orion (v3) AD Compressed", false),
];

/// Lists the known server types in presentation order. Compressed transport variants are
/// appended only when `include_compressed` is set.
pub fn list_server_types(include_compressed: bool) -> Vec<ServerType> {
    let mut types = SERVER_TYPES.to_vec();
    if include_compressed {
        types.extend_from_slice(&COMPRESSED_SERVER_TYPES);
    }
    types
}

/// Looks up a server type by identifier, compressed variants included.
pub fn find_server_type(identifier: &str) -> Option<ServerType> {
    SERVER_TYPES
        .iter()
        .chain(COMPRESSED_SERVER_TYPES.iter())
        .find(|t| t.identifier == identifier)
        .copied()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProtocolVersion {
    V2,
    V3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Binding {
    NetTcp,
    Https,
    Http,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CredentialMode {
    UserName,
    Windows,
    Certificate,
}

/// Connection parameters derived from a server type identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceDescriptor {
    pub server_type: ServerType,
    pub protocol: ProtocolVersion,
    pub binding: Binding,
    pub credentials: CredentialMode,
    pub compressed: bool,
    /// The proxy has to be reopened when the server speaks a different protocol generation.
    pub reopen_on_protocol_mismatch: bool,
    /// The server can route push indications to an active subscriber endpoint.
    pub supports_active_subscriber: bool,
}

impl ServiceDescriptor {
    pub fn resolve(identifier: &str) -> Result<Self, CatalogError> {
        let server_type = find_server_type(identifier)
            .ok_or_else(|| CatalogError::UnknownServerType(identifier.to_string()))?;

        let orion = identifier.starts_with("Orion");
        let protocol = if identifier.starts_with("Orion (v3)") {
            ProtocolVersion::V3
        } else {
            ProtocolVersion::V2
        };

        let binding = if identifier.ends_with("over HTTPS") {
            Binding::Https
        } else if identifier == "Java over HTTP" {
            Binding::Http
        } else {
            Binding::NetTcp
        };

        let credentials = if identifier.contains("Certificate") {
            CredentialMode::Certificate
        } else if server_type.requires_authentication {
            CredentialMode::UserName
        } else {
            CredentialMode::Windows
        };

        Ok(Self {
            server_type,
            protocol,
            binding,
            credentials,
            compressed: identifier.ends_with("Compressed"),
            reopen_on_protocol_mismatch: orion,
            supports_active_subscriber: orion && protocol == ProtocolVersion::V3,
        })
    }

    pub fn identifier(&self) -> &'static str {
        self.server_type.identifier
    }
}

impl fmt::Display for ServiceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:?}, {:?}, {:?} credentials{})",
            self.identifier(),
            self.protocol,
            self.binding,
            self.credentials,
            if self.compressed { ", compressed" } else { "" }
        )
    }
}
