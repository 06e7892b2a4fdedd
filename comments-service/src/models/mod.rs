/// Domain models and request/response types
pub mod comment;

pub use comment::{Comment, CommentResponse, CreateCommentRequest};
