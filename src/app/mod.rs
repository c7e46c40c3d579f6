//! Application shell: command line parsing, startup wiring and reporting

pub mod cli;
pub mod report;
pub mod startup;
