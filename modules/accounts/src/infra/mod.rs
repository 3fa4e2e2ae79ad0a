pub mod files;
pub mod security;
pub mod storage;
