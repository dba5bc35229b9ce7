//! CineLite domain logic.
//!
//! Pure building blocks with no HTTP concerns: the movie catalog and its
//! query filter, the deploy webhook's secret check and gate, the command
//! runner capability, and a debounced task scheduler.

pub mod catalog;
pub mod debounce;
pub mod deploy;
pub mod error;
pub mod filter;
pub mod runner;
pub mod types;
