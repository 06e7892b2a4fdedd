/// HTTP request handlers
pub mod blogs;
