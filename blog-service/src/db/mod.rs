/// Database access layer
pub mod blogs;
