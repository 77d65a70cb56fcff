//! Session statistics module
//!
//! In-memory time-series storage for live flow readings and finalized
//! breath summaries ([`store`]).

pub mod store;
