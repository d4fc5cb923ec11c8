//! Pipeline filter for idleness traces. Reads (timestamp, idleness) samples
//! from stdin and prints one line per reconstructed idle interval. Intended to
//! sit in a shell pipeline after whatever produces the raw trace.
//!

pub mod cli;
pub mod trace;
pub mod utils;
