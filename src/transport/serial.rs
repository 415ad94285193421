//! Serial transport (USB CDC-ACM or UART)

use crate::transport::traits::TransportConnector;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio_serial::{SerialPortBuilderExt, SerialStream};

/// Serial connector for a device path and baud rate
pub struct SerialConnector {
    port: String,
    baud: u32,
}

impl SerialConnector {
    pub fn new(port: String, baud: u32) -> Self {
        Self { port, baud }
    }
}

#[async_trait]
impl TransportConnector for SerialConnector {
    type Stream = SerialStream;

    async fn connect(&self) -> Result<Self::Stream> {
        tokio_serial::new(&self.port, self.baud)
            .open_native_async()
            .with_context(|| format!("Failed to open serial port {}", self.port))
    }

    fn name(&self) -> &'static str {
        "Serial"
    }

    fn target(&self) -> String {
        format!("{}@{}", self.port, self.baud)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_target() {
        let serial = SerialConnector::new("/dev/ttyGS0".into(), 115_200);
        assert_eq!(serial.name(), "Serial");
        assert_eq!(serial.target(), "/dev/ttyGS0@115200");
    }

    #[tokio::test]
    async fn test_missing_port_fails() {
        let serial = SerialConnector::new("/dev/hexforge-missing-tty".into(), 115_200);
        assert!(serial.connect().await.is_err());
    }
}
