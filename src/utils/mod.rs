//! Utils module - Utility functions and helpers

pub mod command;
pub mod fs;
pub mod logging;
