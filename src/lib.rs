//! outchan - a stderr output channel for command-line tools.
//!
//! Status lines, boxed warnings, errors with documentation links, debug
//! traces and a single in-place spinner, all written to stderr so stdout
//! stays free for the tool's actual output.

pub mod cli;
pub mod config;
pub mod error;
pub mod output;

pub use config::Config;
pub use error::{Diagnostic, OutchanError, PrettyError};
pub use output::{Hint, Label, OutputChannel};
