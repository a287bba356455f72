//! GE Trader — OSRS Grand Exchange flip finder.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod api;
pub mod config;
pub mod display;
pub mod input;
pub mod pipeline;
pub mod profit;
pub mod rank;
pub mod types;
