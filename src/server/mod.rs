//! Server module for Cadence
//!
//! # Module Structure
//!
//! - `config`: Configuration structures for all server components
//! - `loader`: Configuration loading from files and environment
//! - `providers`: Generator, executor and pipeline construction
//! - `validation`: Configuration validation
//! - `init`: Server initialization and run loop

pub mod config;
mod init;
mod loader;
mod providers;
mod validation;

pub use init::run;
pub use loader::load_config;
