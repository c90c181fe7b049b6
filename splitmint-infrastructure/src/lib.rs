#![warn(clippy::uninlined_format_args)]

pub mod memory;

pub use memory::InMemoryLedger;
