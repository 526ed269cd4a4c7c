//! Map draft engine for team matches: who bans, picks or chooses a side next,
//! validation of what they submit, and the match status that follows.

pub mod config;
pub mod draft;
pub mod error;
pub mod lifecycle;
pub mod map_pool;
pub mod models;
pub mod score_report;
pub mod store;
pub mod teams;

pub use error::{Error, Result};
