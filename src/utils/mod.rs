//! Utility modules for common functionality.
//!
//! This module contains utility functions and helpers used throughout
//! the application, including logging configuration and Ctrl-C handling.

pub mod interrupt;
pub mod logger;
