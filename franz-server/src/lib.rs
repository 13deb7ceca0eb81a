//! TCP server and request dispatch for the franz broker.

pub mod error;
pub mod server;

mod dispatch;

pub use error::ServerError;
pub use server::Server;
