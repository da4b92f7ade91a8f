pub mod cli;
pub mod collectors;
pub mod commands;
pub mod config;
pub mod utils;

// Re-export main API
pub use collectors::*;
