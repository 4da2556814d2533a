//! Sink implementations
//!
//! Contains FileSink and ConsoleSink.

mod console;
mod file;

pub use self::console::ConsoleSink;
pub use self::file::{FileSink, FileSinkConfig};
