//! Library components of the `icd` command line tool.

pub mod commands;
pub mod config;
pub mod logging;
pub mod render;
