//! Core types for the bot API client.
//!
//! No HTTP lives here: wire types, the response envelope, the method table,
//! errors, configuration and the `UpdateSource` port. The reqwest adapter
//! and the polling loop live in `tbot-client`.

pub mod config;
pub mod errors;
pub mod logging;
pub mod methods;
pub mod outgoing;
pub mod ports;
pub mod response;
pub mod types;

pub use errors::{Error, Result};
pub use methods::Method;
