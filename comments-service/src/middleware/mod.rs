/// Remote token verification middleware
pub mod remote_auth;

pub use remote_auth::{BearerToken, RemoteJwtMiddleware};
