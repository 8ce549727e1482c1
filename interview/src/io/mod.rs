//! I/O adapters for interview commands.

pub mod catalogue;
pub mod config;
pub mod init;
pub mod results_store;
pub mod uploads;
