// Local validation rules. A form runs its fields through a `Checks`
// collector; the first issue per field wins.

use chrono::NaiveDateTime;

use crate::lifecycle::FieldErrors;

/// Shortest password accepted before anything is sent.
pub const MIN_PASSWORD_LEN: usize = 4;

/// Date-time shapes accepted in forms. The first one is what the API
/// itself returns.
pub const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
];

pub const REQUIRED: &str = "This field is required";
pub const INVALID_EMAIL: &str = "Enter a valid email address";
pub const INVALID_CAPACITY: &str = "Capacity must be a positive whole number";
pub const INVALID_ID: &str = "Must be a positive whole number";
pub const INVALID_DATETIME: &str = "Use the format YYYY-MM-DD HH:MM";
pub const END_BEFORE_START: &str = "The end must be after the start";

pub fn password_too_short() -> String {
    format!("Password must be at least {MIN_PASSWORD_LEN} characters")
}

/// `local@domain.tld` with no whitespace and exactly one `@`.
pub fn is_email_shaped(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !value.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

#[derive(Debug, Default)]
pub(crate) struct Checks {
    issues: FieldErrors,
}

impl Checks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn flag(&mut self, field: &str, message: impl Into<String>) {
        self.issues
            .entry(field.to_owned())
            .or_insert_with(|| message.into());
    }

    /// Trimmed value, or an issue when blank.
    pub(crate) fn required(&mut self, field: &str, value: &str) -> Option<String> {
        let value = value.trim();
        if value.is_empty() {
            self.flag(field, REQUIRED);
            None
        } else {
            Some(value.to_owned())
        }
    }

    pub(crate) fn email(&mut self, field: &str, value: &str) -> Option<String> {
        let value = self.required(field, value)?;
        if is_email_shaped(&value) {
            Some(value)
        } else {
            self.flag(field, INVALID_EMAIL);
            None
        }
    }

    /// Passwords are not trimmed.
    pub(crate) fn password(&mut self, field: &str, value: &str) -> Option<String> {
        if value.is_empty() {
            self.flag(field, REQUIRED);
            return None;
        }
        if value.chars().count() < MIN_PASSWORD_LEN {
            self.flag(field, password_too_short());
            return None;
        }
        Some(value.to_owned())
    }

    pub(crate) fn positive_int(&mut self, field: &str, value: &str) -> Option<i64> {
        self.positive(field, value, INVALID_CAPACITY)
    }

    pub(crate) fn identifier(&mut self, field: &str, value: &str) -> Option<i64> {
        self.positive(field, value, INVALID_ID)
    }

    fn positive(&mut self, field: &str, value: &str, message: &str) -> Option<i64> {
        let raw = self.required(field, value)?;
        match raw.parse::<i64>() {
            Ok(n) if n > 0 => Some(n),
            _ => {
                self.flag(field, message);
                None
            }
        }
    }

    /// Trimmed value as typed plus its parsed form. The typed string is
    /// what gets sent.
    pub(crate) fn datetime(&mut self, field: &str, value: &str) -> Option<(String, NaiveDateTime)> {
        let raw = self.required(field, value)?;
        if let Some(parsed) = parse_datetime(&raw) {
            Some((raw, parsed))
        } else {
            self.flag(field, INVALID_DATETIME);
            None
        }
    }

    pub(crate) fn end_after_start(
        &mut self,
        field: &str,
        start: Option<&(String, NaiveDateTime)>,
        end: Option<&(String, NaiveDateTime)>,
    ) {
        if let (Some((_, start)), Some((_, end))) = (start, end) {
            if end <= start {
                self.flag(field, END_BEFORE_START);
            }
        }
    }

    /// `Ok(build())` when nothing was flagged.
    pub(crate) fn finish<P>(self, build: impl FnOnce() -> Option<P>) -> Result<P, FieldErrors> {
        if !self.issues.is_empty() {
            return Err(self.issues);
        }
        // Every getter that returned `None` also flagged an issue.
        build().ok_or(self.issues)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        for ok in ["test@example.com", "a.b+c@sub.example.org"] {
            assert!(is_email_shaped(ok), "{ok}");
        }
        for bad in [
            "",
            "invalid-email",
            "@example.com",
            "a@b",
            "a@@b.com",
            "a b@c.com",
            "a@.com",
            "a@b.",
        ] {
            assert!(!is_email_shaped(bad), "{bad}");
        }
    }

    #[test]
    fn datetime_accepts_api_and_form_shapes() {
        assert!(parse_datetime("2025-06-01T18:00:00").is_some());
        assert!(parse_datetime("2025-06-01 18:00:00").is_some());
        assert!(parse_datetime("2025-06-01T18:00").is_some());
        assert!(parse_datetime(" 2025-06-01 18:00 ").is_some());
        assert!(parse_datetime("2025-06-01").is_none());
        assert!(parse_datetime("mañana").is_none());
    }

    #[test]
    fn first_issue_per_field_wins() {
        let mut checks = Checks::new();
        assert!(checks.email("email", "").is_none());
        assert!(checks.email("email", "nope").is_none());
        let issues = checks.finish(|| Some(())).unwrap_err();
        assert_eq!(issues["email"], REQUIRED);
    }

    #[test]
    fn password_length() {
        let mut checks = Checks::new();
        assert!(checks.password("password", "123").is_none());
        assert!(checks.password("other", "weak").is_some());
        let issues = checks.finish(|| Some(())).unwrap_err();
        assert_eq!(issues["password"], password_too_short());
        assert!(!issues.contains_key("other"));
    }

    #[test]
    fn capacity_must_be_positive() {
        let mut checks = Checks::new();
        assert_eq!(checks.positive_int("a", " 100 "), Some(100));
        assert_eq!(checks.positive_int("b", "0"), None);
        assert_eq!(checks.positive_int("c", "-3"), None);
        assert_eq!(checks.positive_int("d", "1.5"), None);
        let issues = checks.finish(|| Some(())).unwrap_err();
        assert_eq!(issues.len(), 3);
    }

    #[test]
    fn end_must_follow_start() {
        let mut checks = Checks::new();
        let start = checks.datetime("start", "2025-06-01 22:00:00");
        let end = checks.datetime("end", "2025-06-01 18:00:00");
        checks.end_after_start("end", start.as_ref(), end.as_ref());
        let issues = checks.finish(|| Some(())).unwrap_err();
        assert_eq!(issues["end"], END_BEFORE_START);
    }
}
