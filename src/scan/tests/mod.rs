//! Test modules for the scan system

mod helpers;
