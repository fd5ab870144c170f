//! CLI subcommands.

pub mod autodl;
pub mod config;
pub mod lang;
