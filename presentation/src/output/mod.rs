//! Output formatting

pub mod console;
pub mod formatter;

pub use console::EventRenderer;
pub use formatter::ConsoleFormatter;
