//! Shell execution and process management module.
//!
//! This module runs approved commands through the host shell with a
//! wall-clock limit and captures their output for reporting.

pub mod executor;
mod process_group;

pub use executor::{
    ExecutionConfig, ExecutionEngine, ExecutionResult, Termination, default_shell,
};
