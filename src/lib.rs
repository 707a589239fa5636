//! glossa - Terminal glossary browser
//!
//! Loads a glossary of terms from a JSON file, lets the user search and page
//! through it, and speaks terms aloud through the platform speech synthesizer.

pub mod error;
pub mod glossary;
pub mod input;
pub mod speech;
pub mod state;
pub mod view;

pub use error::{GlossaError, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "glossa";
