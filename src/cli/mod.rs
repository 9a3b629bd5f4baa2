pub mod commands;
pub mod output;

pub use commands::{normalize_legacy_flags, CliArgs, OutputFormatArg};
pub use output::{OutputFormat, OutputFormatter};
