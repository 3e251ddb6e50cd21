// Library root for Content Vault

pub mod api;
pub mod auth;
pub mod config;
pub mod content;
pub mod core;
pub mod store;
