#[path = "../common/mod.rs"]
mod common;

pub mod auth;
pub mod store;
