// Internal modules - all access should go through api module
pub(crate) mod aggregator;
pub(crate) mod claude;
pub(crate) mod error;
pub(crate) mod parse;
pub(crate) mod summary;
pub(crate) mod traits;
pub(crate) mod types;

// Public API module - the only public interface for the analysis system
pub mod api;

#[cfg(test)]
mod tests;
