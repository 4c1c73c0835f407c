use secrecy::SecretString;

/// Path of the login endpoint. Requests to it never carry a bearer token,
/// so a stale token cannot leak into a fresh authentication attempt.
pub const LOGIN_PATH: &str = "/auth/login";

/// Path of the account registration endpoint.
pub const REGISTER_PATH: &str = "/auth/register";

/// Supplies the bearer token for outbound requests.
///
/// The client asks once per request. Implementations decide where the
/// token comes from: the session store checks memory first and then its
/// durable storage, adopting whatever it finds there.
pub trait BearerSource: Send + Sync {
    fn bearer_token(&self) -> Option<SecretString>;
}

/// A fixed token, handy for scripts and tests.
#[derive(Debug, Clone)]
pub struct StaticBearer(pub SecretString);

impl BearerSource for StaticBearer {
    fn bearer_token(&self) -> Option<SecretString> {
        Some(self.0.clone())
    }
}

/// Whether a request to `path` should carry the `Authorization` header.
pub(crate) fn wants_bearer(path: &str) -> bool {
    path != LOGIN_PATH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_is_the_only_unauthenticated_path() {
        assert!(!wants_bearer(LOGIN_PATH));
        assert!(wants_bearer(REGISTER_PATH));
        assert!(wants_bearer("/eventos/1"));
    }
}
