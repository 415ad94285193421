pub mod serial;
pub mod tcp;
pub mod traits;

pub use serial::SerialConnector;
pub use tcp::TcpConnector;
pub use traits::TransportConnector;
