//! Command-line and REPL surface for the talent-search engine.

pub mod args;
pub mod config;
pub mod render;
pub mod repl;

pub use args::{LogicArg, QueryArgs};
pub use config::{resolve_api_url, resolve_token};
