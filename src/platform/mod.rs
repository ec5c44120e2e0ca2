//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (spawn clock)
//! - Storage (LocalStorage on web, in-memory on native)

pub mod storage;
pub mod time;

pub use time::now_ms;
