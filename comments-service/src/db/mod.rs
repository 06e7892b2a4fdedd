/// Database access layer
pub mod comments;
