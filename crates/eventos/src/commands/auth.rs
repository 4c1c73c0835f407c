//! Account command handlers: login, logout, whoami, register.

use secrecy::ExposeSecret;

use eventos_core::{AppContext, CONNECTION_FAILED, Failure, LoginView, RegisterView, User};

use crate::cli::{GlobalOpts, LoginArgs, RegisterArgs};
use crate::config::{self, Resolved};
use crate::error::CliError;
use crate::output;

use super::util::{self, Subject};

const ACCOUNT: Subject<'static> = Subject {
    kind: "user",
    id: None,
    list_command: "whoami",
    action: "Signing in",
};

pub async fn login(
    ctx: &AppContext,
    args: LoginArgs,
    resolved: &Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let email = args.email.or_else(|| resolved.profile.email.clone());
    let email = util::text_or_prompt(email, "Email")?;
    let password = config::resolve_password(args.password, resolved)?;

    let mut view = LoginView::new(ctx.clone());
    view.edit(|form| {
        form.email.clone_from(&email);
        form.password = password.expose_secret().to_owned();
    });

    let spinner = output::spinner(global, "Signing in");
    let signed_in = view.submit().await;
    spinner.finish_and_clear();

    if !signed_in {
        let form = view.controller();
        return Err(match form.last_failure() {
            // A rejected sign-in carries only the server's message.
            Some(Failure::Request { status: None, .. })
                if form.error_message() != CONNECTION_FAILED =>
            {
                CliError::AuthFailed {
                    message: form.error_message().to_owned(),
                    profile: resolved.profile_name.clone(),
                }
            }
            _ => util::form_error(form, ACCOUNT, ctx),
        });
    }

    output::success(global, &format!("Signed in as {email}"));
    Ok(())
}

pub fn logout(ctx: &AppContext, global: &GlobalOpts) -> Result<(), CliError> {
    ctx.logout();
    output::success(global, "Signed out");
    Ok(())
}

pub fn whoami(ctx: &AppContext, global: &GlobalOpts) -> Result<(), CliError> {
    if !ctx.is_authenticated() {
        return Err(CliError::SignInRequired {
            action: "Showing the current user".into(),
        });
    }

    let user = ctx.session().user();
    let out = output::render_single(
        &global.output,
        &user,
        |u: &Option<User>| match u {
            Some(User { id: Some(id), email }) => format!("{email} (id {id})"),
            Some(User { id: None, email }) => email.clone(),
            None => "signed in (user details unavailable)".into(),
        },
        |u| u.as_ref().map(|u| u.email.clone()).unwrap_or_default(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn register(
    ctx: &AppContext,
    args: RegisterArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let email = util::text_or_prompt(args.email, "Email")?;
    let password = match args.password {
        Some(pw) => pw,
        None => prompt_new_password()?,
    };

    let mut view = RegisterView::new(ctx.clone());
    view.edit(|form| {
        form.email = email;
        form.password = password;
    });

    let spinner = output::spinner(global, "Creating account");
    let created = view.submit().await;
    spinner.finish_and_clear();

    if created.is_none() {
        return Err(util::form_error(
            view.controller(),
            Subject {
                action: "Registering",
                ..ACCOUNT
            },
            ctx,
        ));
    }

    output::success(global, view.controller().success_message());
    Ok(())
}

fn prompt_new_password() -> Result<String, CliError> {
    let first = rpassword::prompt_password("Password: ").map_err(util::prompt_err)?;
    let second = rpassword::prompt_password("Confirm password: ").map_err(util::prompt_err)?;
    if first != second {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "passwords do not match".into(),
        });
    }
    Ok(first)
}
