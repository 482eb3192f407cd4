//! Parser and panel builder for the HURDAT2 Atlantic hurricane archive.
//!
//! The pipeline reads the archive, recovers each storm's block of data lines
//! from its header, decodes observations, derives intensity and size metrics,
//! and aggregates the result to one row per storm name and calendar month.

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod processors;
pub mod readers;
pub mod utils;
pub mod writers;

pub use error::{ProcessingError, Result};
