//! Core services and infrastructure

pub mod config;
pub mod ids;
pub mod logging;
pub mod retry;
pub mod strings;
pub mod version;
