//! RPC backend abstraction.
//!
//! One long-lived `tonic` channel per backend, dialed once at startup and
//! shared by clone. `Channel` is reference-counted internally and safe for
//! concurrent use; reconnection is handled by the transport.

use std::time::Duration;

use tonic::transport::{Channel, Endpoint};

/// Error establishing an RPC channel.
#[derive(Debug, thiserror::Error)]
pub enum RpcDialError {
    #[error("invalid RPC endpoint `{address}`: {source}")]
    Endpoint {
        address: String,
        #[source]
        source: tonic::transport::Error,
    },
    #[error("failed to connect to `{address}`: {source}")]
    Connect {
        address: String,
        #[source]
        source: tonic::transport::Error,
    },
}

/// A connected RPC backend.
#[derive(Debug, Clone)]
pub struct RpcBackend {
    name: String,
    address: String,
    channel: Channel,
}

impl RpcBackend {
    /// Dial the backend, failing if the connection cannot be established
    /// within `connect_timeout`.
    pub async fn connect(
        name: impl Into<String>,
        address: &str,
        connect_timeout: Duration,
    ) -> Result<Self, RpcDialError> {
        let uri = endpoint_uri(address);
        let endpoint = Endpoint::from_shared(uri).map_err(|source| RpcDialError::Endpoint {
            address: address.to_string(),
            source,
        })?;
        let channel = endpoint
            .connect_timeout(connect_timeout)
            .connect()
            .await
            .map_err(|source| RpcDialError::Connect {
                address: address.to_string(),
                source,
            })?;

        Ok(Self::from_channel(name, address, channel))
    }

    /// Wrap an existing channel.
    pub fn from_channel(name: impl Into<String>, address: impl Into<String>, channel: Channel) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            channel,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// A handle to the shared channel.
    pub fn channel(&self) -> Channel {
        self.channel.clone()
    }
}

/// RPC addresses are configured as "host:port"; tonic wants a URI.
fn endpoint_uri(address: &str) -> String {
    if address.contains("://") {
        address.to_string()
    } else {
        format!("http://{address}")
    }
}
