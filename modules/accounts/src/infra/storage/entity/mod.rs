pub mod prescription;
pub mod user;
