//! Accounts: registration, login, profile and the uploads attached to a user.

pub mod contract;

#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;

pub use contract::model;
