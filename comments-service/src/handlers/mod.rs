/// HTTP request handlers
pub mod comments;
