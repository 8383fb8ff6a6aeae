//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

mod check;
mod completions;
mod convert;
mod utils;

pub use check::handle_check;
pub use completions::handle_completions;
pub use convert::{handle_to_local, handle_to_remote};
