// User-facing outcome of the last attempt: one error line, one success
// line, or per-field messages. At most one of the three is ever set.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::Failure;

/// Field name → message.
pub type FieldErrors = BTreeMap<String, String>;

/// Shown when local validation stops a submission.
pub const FORM_INVALID: &str = "Please correct the errors in the form";

/// Shown when a gated action is attempted without a session.
pub const SIGN_IN_REQUIRED: &str = "Please sign in";

/// Fallback when the server rejected a request without saying why.
pub const REQUEST_FAILED: &str = "The request could not be completed";

/// Fallback when a fetch failed without a server message.
pub const LOAD_FAILED: &str = "Could not load data";

/// Where server field errors end up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPresentation {
    /// Per-field slots; `error_message` stays empty.
    #[default]
    Inline,
    /// All field messages joined into `error_message`; no per-field slots.
    Summary,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Feedback {
    error_message: String,
    success_message: String,
    field_errors: FieldErrors,
}

impl Feedback {
    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    pub fn success_message(&self) -> &str {
        &self.success_message
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_errors.get(field).map(String::as_str)
    }

    pub fn is_clear(&self) -> bool {
        self.error_message.is_empty()
            && self.success_message.is_empty()
            && self.field_errors.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        *self = Self {
            error_message: message.into(),
            ..Self::default()
        };
    }

    pub fn set_success(&mut self, message: impl Into<String>) {
        *self = Self {
            success_message: message.into(),
            ..Self::default()
        };
    }

    pub fn set_field_errors(&mut self, errors: FieldErrors) {
        *self = Self {
            field_errors: errors,
            ..Self::default()
        };
    }

    /// Fold a failure into feedback.
    pub(crate) fn apply_failure(
        &mut self,
        failure: &Failure,
        presentation: ErrorPresentation,
        fallback: &str,
    ) {
        match failure {
            Failure::LocalValidation(_) => self.set_error(FORM_INVALID),
            Failure::AuthRequired => self.set_error(SIGN_IN_REQUIRED),
            Failure::FieldValidation(errors)
                if presentation == ErrorPresentation::Inline && !errors.is_empty() =>
            {
                self.set_field_errors(errors.clone());
            }
            other => self.set_error(other.message(fallback)),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn two_field_errors() -> FieldErrors {
        FieldErrors::from([
            ("nombre".to_owned(), "El nombre es obligatorio".to_owned()),
            ("fecha_fin".to_owned(), "La fecha de fin es inválida".to_owned()),
        ])
    }

    #[test]
    fn setters_are_mutually_exclusive() {
        let mut feedback = Feedback::default();
        feedback.set_error("boom");
        feedback.set_success("done");
        assert_eq!(feedback.error_message(), "");
        assert_eq!(feedback.success_message(), "done");

        feedback.set_field_errors(two_field_errors());
        assert_eq!(feedback.success_message(), "");
        assert_eq!(feedback.field_errors().len(), 2);

        feedback.set_error("again");
        assert!(feedback.field_errors().is_empty());
        assert_eq!(feedback.error_message(), "again");
    }

    #[test]
    fn inline_keeps_slots() {
        let mut feedback = Feedback::default();
        feedback.apply_failure(
            &Failure::FieldValidation(two_field_errors()),
            ErrorPresentation::Inline,
            REQUEST_FAILED,
        );
        assert_eq!(feedback.error_message(), "");
        assert_eq!(feedback.field_error("nombre"), Some("El nombre es obligatorio"));
    }

    #[test]
    fn summary_joins_messages() {
        let mut feedback = Feedback::default();
        feedback.apply_failure(
            &Failure::FieldValidation(two_field_errors()),
            ErrorPresentation::Summary,
            REQUEST_FAILED,
        );
        assert!(feedback.field_errors().is_empty());
        assert!(feedback.error_message().contains("El nombre es obligatorio"));
        assert!(feedback.error_message().contains("La fecha de fin es inválida"));
    }

    #[test]
    fn fixed_strings() {
        let mut feedback = Feedback::default();
        feedback.apply_failure(&Failure::AuthRequired, ErrorPresentation::Inline, REQUEST_FAILED);
        assert_eq!(feedback.error_message(), SIGN_IN_REQUIRED);

        feedback.apply_failure(
            &Failure::LocalValidation(two_field_errors()),
            ErrorPresentation::Inline,
            REQUEST_FAILED,
        );
        assert_eq!(feedback.error_message(), FORM_INVALID);
        assert!(feedback.field_errors().is_empty());
    }
}
