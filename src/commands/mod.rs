pub mod print_config;
pub mod stats;
