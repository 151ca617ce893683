//! cred-vault command line interface
//!
//! Argument parsing and the keygen/save/list/get commands on top of
//! `vault-core`.

pub mod cli;
pub mod commands;

pub use cli::{Cli, Command, ConfigAction};
