// Core domain: errors, models, credential hashing, tokens and metrics

pub mod errors;
pub mod metrics;
pub mod models;
pub mod password;
pub mod token;
