//! Test modules for the analysis system
//!
//! Tests are organized by functional area. Parsing and prompt tests live
//! inline next to their implementations; these suites cover the concurrent
//! aggregator, summary normalization, and the Claude HTTP adapter.

mod aggregator;
