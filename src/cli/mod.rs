//! CLI module
//!
//! Command-line interface for browsing a paginated resource.
//!
//! # Commands
//!
//! - `browse` - Open the resource and replay navigation steps
//! - `pager` - Print pager sections for a page count
//! - `validate` - Check a resource configuration file

mod commands;
mod runner;

pub use commands::{parse_steps, Cli, Commands, OutputFormat, Step};
pub use runner::{render_view, PageView, Runner};
