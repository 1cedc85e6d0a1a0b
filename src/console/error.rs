use crate::api::RequestError;
use crate::auth::AuthError;
use crate::config::ConfigError;
use crate::workflow::StateError;

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password";

#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error("{}", INVALID_CREDENTIALS_MESSAGE)]
    InvalidCredentials,
    #[error("credential must use the form username:password")]
    MalformedCredential,
    #[error("not signed in; run `login <username:password>` first")]
    NotAuthenticated,
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
