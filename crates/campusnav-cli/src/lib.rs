//! Campus navigation CLI library.
//!
//! Subcommand handlers, output formatting and logging setup for the
//! `campusnav` binary.

pub mod commands;
pub mod logging;
pub mod output;
