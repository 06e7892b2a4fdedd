/// Domain models and request/response types
pub mod blog;

pub use blog::{Blog, BlogPayload, BlogResponse};
