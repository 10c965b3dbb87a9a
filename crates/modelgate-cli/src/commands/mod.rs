//! Subcommand implementations

pub mod ask;
pub mod check;
pub mod image;
