//! Acquisition layer: serial transport, port discovery, rig protocol

pub mod discovery;
pub mod driver;
pub mod protocol;
pub mod transport;

pub use driver::RigDriver;
pub use protocol::Command;
pub use transport::{MockTransport, SerialTransport, Transport};
