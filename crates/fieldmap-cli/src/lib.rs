//! Command-line runner for fieldmap mapping documents.

#![deny(unsafe_code)]

pub mod builtins;
pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
