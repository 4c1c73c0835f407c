//! Shared helpers for command handlers.

use std::fmt::Write as _;

use tracing::debug;

use eventos_core::lifecycle::REQUEST_FAILED;
use eventos_core::{
    AppContext, CONNECTION_FAILED, FORM_INVALID, Failure, FieldErrors, FormController,
    FormModel, GuardDecision, Listing, Navigator, Route,
};

use crate::error::CliError;
use crate::output;

// ── Navigation ──────────────────────────────────────────────────────

/// Screen changes become hints on stderr; a one-shot command has no
/// screen to move to.
#[derive(Debug)]
pub struct TerminalNavigator {
    quiet: bool,
    color: bool,
}

impl TerminalNavigator {
    pub fn new(quiet: bool, color: bool) -> Self {
        Self { quiet, color }
    }
}

impl Navigator for TerminalNavigator {
    fn navigate(&self, route: Route) {
        debug!(%route, "navigate");
        if self.quiet {
            return;
        }
        if route == Route::Login {
            output::hint(self.color, "→ sign in with: eventos login");
        }
    }
}

/// Run the router guard for a protected screen before doing anything.
pub fn require(ctx: &AppContext, target: Route, action: &str) -> Result<(), CliError> {
    match ctx.check(target) {
        GuardDecision::Allow => Ok(()),
        GuardDecision::Redirect(_) => {
            ctx.navigate(target);
            Err(CliError::SignInRequired {
                action: action.into(),
            })
        }
    }
}

// ── Failure mapping ─────────────────────────────────────────────────

/// What a failed command was working on, for not-found errors.
#[derive(Debug, Clone, Copy)]
pub struct Subject<'a> {
    pub kind: &'static str,
    pub id: Option<i64>,
    pub list_command: &'static str,
    pub action: &'a str,
}

/// Render field messages one per line, sorted by field.
pub fn format_field_errors(errors: &FieldErrors) -> String {
    let mut out = String::new();
    for (field, message) in errors {
        if !out.is_empty() {
            out.push('\n');
        }
        let _ = write!(out, "{field}: {message}");
    }
    out
}

/// Turn a view's failure and error line into a CLI error.
pub fn failure_error(
    failure: Option<&Failure>,
    message: &str,
    subject: Subject<'_>,
    ctx: &AppContext,
) -> CliError {
    // Inline presentation leaves the error line empty for field problems.
    let message = match (message, failure) {
        ("", Some(Failure::LocalValidation(_) | Failure::FieldValidation(_))) => {
            FORM_INVALID.to_owned()
        }
        ("", Some(f)) => f.message(REQUEST_FAILED),
        ("", None) => REQUEST_FAILED.to_owned(),
        (m, _) => m.to_owned(),
    };

    match failure {
        Some(Failure::LocalValidation(errors) | Failure::FieldValidation(errors)) => {
            CliError::InvalidForm {
                summary: message,
                details: format_field_errors(errors),
            }
        }
        Some(Failure::AuthRequired) => CliError::SignInRequired {
            action: subject.action.to_owned(),
        },
        Some(Failure::Transport(reason)) => CliError::ConnectionFailed {
            url: ctx.api().base_url().to_string(),
            reason: reason.clone(),
        },
        Some(Failure::Request {
            status: Some(401 | 403),
            ..
        }) => CliError::AuthFailed {
            message,
            profile: "current".into(),
        },
        Some(Failure::Request {
            status: Some(404), ..
        }) => CliError::NotFound {
            resource_type: subject.kind.into(),
            identifier: subject.id.map(|id| id.to_string()).unwrap_or_default(),
            list_command: subject.list_command.into(),
        },
        Some(Failure::Request { status: None, .. }) if message == CONNECTION_FAILED => {
            CliError::ConnectionFailed {
                url: ctx.api().base_url().to_string(),
                reason: message,
            }
        }
        Some(Failure::Request { status, .. }) => CliError::ApiError {
            status: status.map_or_else(|| "-".into(), |s| s.to_string()),
            message,
        },
        None => CliError::ApiError {
            status: "-".into(),
            message,
        },
    }
}

/// Error for a failed form or resource controller.
pub fn form_error<F: FormModel>(
    form: &FormController<F>,
    subject: Subject<'_>,
    ctx: &AppContext,
) -> CliError {
    failure_error(form.last_failure(), form.error_message(), subject, ctx)
}

/// Error for a failed listing load.
pub fn listing_error<T>(listing: &Listing<T>, subject: Subject<'_>, ctx: &AppContext) -> CliError {
    failure_error(listing.last_failure(), listing.error_message(), subject, ctx)
}

// ── Prompts ─────────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool, action: &str) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)
}

/// Ask for a line of text, or use `value` when given.
pub fn text_or_prompt(value: Option<String>, prompt: &str) -> Result<String, CliError> {
    match value {
        Some(v) => Ok(v),
        None => dialoguer::Input::new()
            .with_prompt(prompt)
            .interact_text()
            .map_err(prompt_err),
    }
}
