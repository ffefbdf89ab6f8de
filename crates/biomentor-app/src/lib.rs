//! Biology Mentor: a chat tutor restricted to biology questions, served as a
//! web widget or a terminal REPL.

pub mod app;
pub mod cli;
pub mod config;
pub mod web;

pub use cli::{Cli, RunMode};
pub use config::{ChatConfig, FileConfig};
