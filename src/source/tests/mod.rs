//! Test modules for the repository source system

mod traverser;
