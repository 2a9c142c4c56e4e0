//! Core translation engine module

pub mod client;
pub mod config;
pub mod errors;
pub mod models;
pub mod prompts;
pub mod retry;
pub mod session_cache;
pub mod transport;
