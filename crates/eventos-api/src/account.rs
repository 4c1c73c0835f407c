// Account endpoints
//
// Login and registration. Login is the one call that never carries a
// bearer token (see `auth::LOGIN_PATH`).

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::auth::{LOGIN_PATH, REGISTER_PATH};
use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Ack, Credentials, LoginResponse};

impl ApiClient {
    /// Exchange email and password for a token and user record.
    ///
    /// `POST /auth/login` with `{"email": ..., "password": ...}`
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<LoginResponse, Error> {
        debug!(email, "logging in");
        self.post(
            LOGIN_PATH,
            &Credentials {
                email,
                password: password.expose_secret(),
            },
        )
        .await
    }

    /// Create a new account.
    ///
    /// `POST /auth/register` with `{"email": ..., "password": ...}`
    pub async fn register(&self, email: &str, password: &SecretString) -> Result<Ack, Error> {
        debug!(email, "registering account");
        self.post(
            REGISTER_PATH,
            &Credentials {
                email,
                password: password.expose_secret(),
            },
        )
        .await
    }
}
