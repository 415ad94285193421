//! TCP transport for driving the executor from a host-side harness

use crate::transport::traits::TransportConnector;
use anyhow::Result;
use async_trait::async_trait;
use tokio::net::TcpStream;

/// TCP connector for connecting to a harness address
pub struct TcpConnector {
    address: String,
}

impl TcpConnector {
    pub fn new(address: String) -> Self {
        Self { address }
    }
}

#[async_trait]
impl TransportConnector for TcpConnector {
    type Stream = TcpStream;

    async fn connect(&self) -> Result<Self::Stream> {
        let stream = TcpStream::connect(&self.address).await?;
        stream.set_nodelay(true)?;
        Ok(stream)
    }

    fn name(&self) -> &'static str {
        "TCP"
    }

    fn target(&self) -> String {
        self.address.clone()
    }
}
