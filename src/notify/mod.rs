//! Terminal output for the CLI.
//!
//! Colored human-readable reports, or pretty JSON with `--json`.

pub mod console;

pub use console::ConsoleOutput;
