/// HTTP request handlers
pub mod tokens;
pub mod users;
