//! CLI module for physverse.
//!
//! All command logic lives here rather than in `main.rs` so it can be
//! tested. The entry point [`run_cli`] takes already-parsed arguments.

mod args;
mod commands;
mod output;

pub use args::{Args, CatalogueFilter, Command, RunOptions};
pub use commands::{list, params, run, run_cli, series};
pub use output::{format_catalogue, format_json, print_help, print_version, version_string};

#[cfg(test)]
mod tests;
