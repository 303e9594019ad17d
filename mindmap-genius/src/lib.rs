pub mod cli;
pub mod clipboard;
pub mod export;
pub mod load_config;
pub mod oracle;
pub mod view;

pub use cli::{run, Cli, Commands};
