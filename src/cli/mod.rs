//! CLI module for promptr - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for response generation,
//! template inspection, and response parsing.

pub mod commands;

pub use commands::Cli;
