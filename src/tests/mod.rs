//! integrated tests
pub mod toolkit;
