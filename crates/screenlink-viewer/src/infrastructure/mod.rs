//! Infrastructure layer: everything that touches a socket, the clock, or
//! the file system.

pub mod channel;
pub mod storage;
pub mod transport;

pub use channel::{ChannelManager, ConnectionState};
pub use transport::ws::WsTransport;
