/// Database access layer
pub mod users;
