//! Presentation layer for atelier
//!
//! The clap CLI definition, request assembly, and console rendering of the
//! event stream and final artifacts. The pipeline itself never depends on
//! this crate.

pub mod cli;
pub mod output;

pub use cli::{Cli, Command, OutputFormat, RequestError, RequestFile, build_request};
pub use output::{ConsoleFormatter, EventRenderer};
