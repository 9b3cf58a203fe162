//! Configuration and shared async I/O drivers.

pub mod config;
pub mod runner;
