//! Mood entries: one record per user per UTC calendar day, plus statistics.

pub mod contract;

#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;

pub use contract::model;
