// Internal modules - all access should go through api module
pub(crate) mod error;
pub(crate) mod filter;
pub(crate) mod github;
pub(crate) mod traits;
pub(crate) mod traverser;
pub(crate) mod types;

// Public API module - the only public interface for the source system
pub mod api;

#[cfg(test)]
mod tests;
