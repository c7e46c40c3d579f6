// Internal modules - all access should go through api module
pub(crate) mod error;
pub(crate) mod executor;
pub(crate) mod manager;
pub(crate) mod memory;
pub(crate) mod traits;
pub(crate) mod types;

// Public API module - the only public interface for the scan system
pub mod api;

#[cfg(test)]
mod tests;
