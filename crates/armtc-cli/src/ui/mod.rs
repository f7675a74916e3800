//! Terminal output

pub mod progress;
pub mod reporter;

pub use reporter::ConsoleReporter;
