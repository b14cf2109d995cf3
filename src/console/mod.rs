//! Line-based stand-in for the reader, button and cloud channel when running
//! on a host.

pub mod command;
pub mod dispatch;
pub mod transport;

pub use command::Command;
pub use dispatch::run_device_loop;
pub use transport::{ConsoleTransport, start_console_transport};
