//! Input handling
//!
//! The front end is line based: each line typed is parsed into a
//! [`Command`] and applied to the application state.

pub mod command;

pub use command::{parse_command, Command, HELP};
