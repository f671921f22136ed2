//! klaunch - bootstrap helpers for a local Kafka/MongoDB development stack
//!
//! - [`daemon`]: make sure the container daemon is up, restarting it if needed
//! - [`connector`]: fetch the connector JAR and record its version in `.env`
//! - [`deps`]: install local packages through the system package manager

pub mod config;
pub mod connector;
pub mod daemon;
pub mod deps;
pub mod error;
pub mod utils;

pub use config::Config;
pub use error::{ErrorKind, KlaunchError, Result};
