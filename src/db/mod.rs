pub mod connection;
pub mod functions;
pub mod migrations;

pub use connection::*;
pub use migrations::*;
