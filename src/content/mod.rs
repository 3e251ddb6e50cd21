// Owner-scoped content operations

pub mod ownership;

pub use ownership::{parse_content_id, OwnedContent};
