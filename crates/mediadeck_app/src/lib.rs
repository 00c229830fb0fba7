//! `mediadeck` command-line client.
pub mod cli;
pub mod config;
pub mod render;

mod commands;

pub use commands::{client_config, run};
