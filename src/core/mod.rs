//! Core library components.
//!
//! Env file handling, key generation and the Convex sync logic, independent
//! of the terminal front end.

pub mod config;
pub mod constants;
pub mod env;
pub mod keys;
pub mod probe;
pub mod runner;
pub mod sync;
