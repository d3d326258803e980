//! Utilities for parsing of Reticulum frames

pub use errors::ParseError;
pub use utils::{Reader, ReaderError};

mod errors;
mod utils;
