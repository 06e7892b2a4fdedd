/// Domain models and request/response types
pub mod user;

pub use user::{
    RefreshTokenRequest, RegisterRequest, TokenRequest, UpdateUserRequest, User, UserResponse,
    VerifyTokenRequest,
};
