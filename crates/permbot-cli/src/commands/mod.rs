//! Subcommand implementations for the `permbot` binary.

pub mod check;
pub mod handle;
pub mod parse;
