use std::fmt;

use secrecy::SecretString;

use super::FormModel;
use super::validate::Checks;
use crate::lifecycle::FieldErrors;

/// Validated credentials, ready for `/auth/login` or `/auth/register`.
#[derive(Debug, Clone)]
pub struct AccountPayload {
    pub email: String,
    pub password: SecretString,
}

fn validate_account(email: &str, password: &str) -> Result<AccountPayload, FieldErrors> {
    let mut checks = Checks::new();
    let email = checks.email("email", email);
    let password = checks.password("password", password);
    checks.finish(|| {
        Some(AccountPayload {
            email: email?,
            password: SecretString::from(password?),
        })
    })
}

#[derive(Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl FormModel for LoginForm {
    type Payload = AccountPayload;

    fn validate(&self) -> Result<AccountPayload, FieldErrors> {
        validate_account(&self.email, &self.password)
    }
}

#[derive(Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for RegisterForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterForm")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl FormModel for RegisterForm {
    type Payload = AccountPayload;

    fn validate(&self) -> Result<AccountPayload, FieldErrors> {
        validate_account(&self.email, &self.password)
    }
}
