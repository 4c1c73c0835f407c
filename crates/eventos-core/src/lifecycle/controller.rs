// ── View controllers ──
//
// `FormController` drives the validate → submit → reconcile half of the
// cycle for any form. `ResourceController` adds the fetch → view → edit
// half for a record loaded by id. Every transition republishes a
// `ViewState` on a watch channel.
//
// All methods take `&mut self`: one controller runs at most one request
// at a time, so a stale response can never overwrite a newer one.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::context::AppContext;
use crate::error::Failure;
use crate::forms::FormModel;
use crate::navigation::{SIGN_IN_REDIRECT_DELAY, navigate_after};
use crate::routes::Route;

use super::feedback::{ErrorPresentation, FieldErrors, Feedback, LOAD_FAILED, REQUEST_FAILED};
use super::phase::{Phase, ViewState};

// ── FormController ───────────────────────────────────────────────────

pub struct FormController<F: FormModel> {
    form: F,
    phase: Phase,
    loading: bool,
    feedback: Feedback,
    local_issues: FieldErrors,
    last_failure: Option<Failure>,
    presentation: ErrorPresentation,
    state: watch::Sender<ViewState>,
    pending_redirect: Option<JoinHandle<()>>,
}

impl<F: FormModel> std::fmt::Debug for FormController<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormController")
            .field("form", &self.form)
            .field("phase", &self.phase)
            .field("loading", &self.loading)
            .field("feedback", &self.feedback)
            .finish_non_exhaustive()
    }
}

impl<F: FormModel> Default for FormController<F> {
    fn default() -> Self {
        Self::new(F::default())
    }
}

impl<F: FormModel> FormController<F> {
    pub fn new(form: F) -> Self {
        let (state, _) = watch::channel(ViewState::default());
        Self {
            form,
            phase: Phase::Idle,
            loading: false,
            feedback: Feedback::default(),
            local_issues: FieldErrors::new(),
            last_failure: None,
            presentation: ErrorPresentation::default(),
            state,
            pending_redirect: None,
        }
    }

    pub fn with_presentation(mut self, presentation: ErrorPresentation) -> Self {
        self.presentation = presentation;
        self
    }

    // ── Observers ────────────────────────────────────────────────────

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True while a request is in flight. Front ends disable submission
    /// on this and nothing else.
    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    pub fn error_message(&self) -> &str {
        self.feedback.error_message()
    }

    pub fn success_message(&self) -> &str {
        self.feedback.success_message()
    }

    pub fn field_errors(&self) -> &FieldErrors {
        self.feedback.field_errors()
    }

    /// Issues found by the last local validation pass. Kept apart from
    /// server field errors so the two never mix.
    pub fn local_issues(&self) -> &FieldErrors {
        &self.local_issues
    }

    /// Classification of the most recent failure, if the last attempt failed.
    pub fn last_failure(&self) -> Option<&Failure> {
        self.last_failure.as_ref()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    // ── Form editing ─────────────────────────────────────────────────

    /// Apply an edit to the form. Leaves a failed or finished submission
    /// and returns to `Editing`.
    pub fn edit(&mut self, apply: impl FnOnce(&mut F)) {
        apply(&mut self.form);
        if matches!(
            self.phase,
            Phase::Idle | Phase::SubmitFailed | Phase::SubmitSucceeded
        ) {
            self.transition(Phase::Editing, false);
        }
    }

    pub fn reset_form(&mut self) {
        self.form.reset();
        self.local_issues.clear();
        self.publish();
    }

    pub(crate) fn replace_form(&mut self, form: F) {
        self.form = form;
        self.local_issues.clear();
    }

    // ── Submission ───────────────────────────────────────────────────

    /// Validate locally, then hand the payload to `send`.
    ///
    /// Local failure never calls `send`. Server failures are folded into
    /// feedback according to the configured presentation; the form keeps
    /// whatever the user entered. Returns the response on success.
    pub async fn submit<T, E, Fut>(
        &mut self,
        success_message: &str,
        send: impl FnOnce(F::Payload) -> Fut,
    ) -> Option<T>
    where
        Fut: Future<Output = Result<T, E>>,
        Failure: From<E>,
    {
        self.start_attempt();

        let payload = match self.form.validate() {
            Ok(payload) => payload,
            Err(issues) => {
                debug!(fields = ?issues.keys().collect::<Vec<_>>(), "local validation failed");
                self.local_issues.clone_from(&issues);
                self.fail(Failure::LocalValidation(issues), Phase::SubmitFailed, REQUEST_FAILED);
                return None;
            }
        };

        self.transition(Phase::Submitting, true);
        let result = send(payload).await;
        self.loading = false;

        match result {
            Ok(value) => {
                self.feedback.set_success(success_message);
                self.transition(Phase::SubmitSucceeded, false);
                Some(value)
            }
            Err(e) => {
                self.fail(Failure::from(e), Phase::SubmitFailed, REQUEST_FAILED);
                None
            }
        }
    }

    /// [`submit`](Self::submit) for create flows: on success the form is
    /// cleared for the next entry.
    pub async fn submit_create<T, E, Fut>(
        &mut self,
        success_message: &str,
        send: impl FnOnce(F::Payload) -> Fut,
    ) -> Option<T>
    where
        Fut: Future<Output = Result<T, E>>,
        Failure: From<E>,
    {
        let value = self.submit(success_message, send).await?;
        self.reset_form();
        Some(value)
    }

    // ── Gated actions ────────────────────────────────────────────────

    /// Run an action that needs a session (joining an event, deleting a
    /// record). Without a session nothing is sent, the sign-in message is
    /// shown, and a redirect to the login screen is scheduled.
    pub async fn run_action<T, E, Fut>(
        &mut self,
        ctx: &AppContext,
        success_message: &str,
        action: impl FnOnce() -> Fut,
    ) -> Option<T>
    where
        Fut: Future<Output = Result<T, E>>,
        Failure: From<E>,
    {
        self.start_attempt();
        if !self.require_session(ctx) {
            return None;
        }
        self.perform(Some(success_message), action).await
    }

    /// A side request that is not a submission, such as a capacity check.
    /// Success leaves feedback empty; failure sets the error line.
    pub async fn query<T, E, Fut>(&mut self, fetch: impl FnOnce() -> Fut) -> Option<T>
    where
        Fut: Future<Output = Result<T, E>>,
        Failure: From<E>,
    {
        self.start_attempt();
        self.perform(None, fetch).await
    }

    async fn perform<T, E, Fut>(
        &mut self,
        success_message: Option<&str>,
        action: impl FnOnce() -> Fut,
    ) -> Option<T>
    where
        Fut: Future<Output = Result<T, E>>,
        Failure: From<E>,
    {
        let resting = self.phase;
        self.transition(resting, true);
        let result = action().await;
        self.loading = false;

        match result {
            Ok(value) => {
                if let Some(message) = success_message {
                    self.feedback.set_success(message);
                }
                self.transition(resting, false);
                Some(value)
            }
            Err(e) => {
                self.fail(Failure::from(e), resting, REQUEST_FAILED);
                None
            }
        }
    }

    /// False (with feedback set and a redirect scheduled) when signed out.
    pub(crate) fn require_session(&mut self, ctx: &AppContext) -> bool {
        if ctx.session().is_authenticated() {
            return true;
        }
        debug!("gated action blocked without a session");
        let resting = self.phase;
        self.fail(Failure::AuthRequired, resting, REQUEST_FAILED);
        self.pending_redirect = Some(navigate_after(
            Arc::clone(ctx.navigator()),
            Route::Login,
            SIGN_IN_REDIRECT_DELAY,
        ));
        false
    }

    /// Wait for any scheduled redirect to land.
    pub async fn settle(&mut self) {
        if let Some(handle) = self.pending_redirect.take() {
            if let Err(e) = handle.await {
                warn!(error = %e, "scheduled navigation did not run");
            }
        }
    }

    // ── Transitions ──────────────────────────────────────────────────

    fn start_attempt(&mut self) {
        self.feedback.clear();
        self.local_issues.clear();
        self.last_failure = None;
    }

    pub(crate) fn transition(&mut self, phase: Phase, loading: bool) {
        if phase != self.phase {
            debug!(from = %self.phase, to = %phase, "view transition");
        }
        self.phase = phase;
        self.loading = loading;
        self.publish();
    }

    pub(crate) fn fail(&mut self, failure: Failure, phase: Phase, fallback: &str) {
        self.feedback
            .apply_failure(&failure, self.presentation, fallback);
        self.last_failure = Some(failure);
        self.transition(phase, false);
    }

    pub(crate) fn clear_feedback(&mut self) {
        self.start_attempt();
    }

    fn publish(&self) {
        self.state.send_replace(ViewState {
            phase: self.phase,
            loading: self.loading,
            feedback: self.feedback.clone(),
        });
    }
}

// ── ResourceController ───────────────────────────────────────────────

/// A server record that can be edited through a form.
pub trait Resource: Clone + std::fmt::Debug + Send + Sync {
    type Form: FormModel + for<'a> From<&'a Self>;

    /// Fold an accepted update into the local copy when the server does
    /// not echo the record back.
    fn apply(&mut self, payload: &<Self::Form as FormModel>::Payload);
}

pub struct ResourceController<R: Resource> {
    record: Option<R>,
    editing: bool,
    form: FormController<R::Form>,
}

impl<R: Resource> std::fmt::Debug for ResourceController<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceController")
            .field("record", &self.record)
            .field("editing", &self.editing)
            .field("form", &self.form)
            .finish()
    }
}

impl<R: Resource> Default for ResourceController<R> {
    fn default() -> Self {
        Self::new(ErrorPresentation::default())
    }
}

impl<R: Resource> ResourceController<R> {
    pub fn new(presentation: ErrorPresentation) -> Self {
        Self {
            record: None,
            editing: false,
            form: FormController::default().with_presentation(presentation),
        }
    }

    /// The loaded record. `None` until a load succeeds and while one is
    /// in flight.
    pub fn record(&self) -> Option<&R> {
        self.record.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn controller(&self) -> &FormController<R::Form> {
        &self.form
    }

    pub fn controller_mut(&mut self) -> &mut FormController<R::Form> {
        &mut self.form
    }

    pub fn form(&self) -> &R::Form {
        self.form.form()
    }

    pub fn phase(&self) -> Phase {
        self.form.phase()
    }

    pub fn loading(&self) -> bool {
        self.form.loading()
    }

    pub fn feedback(&self) -> &Feedback {
        self.form.feedback()
    }

    pub fn error_message(&self) -> &str {
        self.form.error_message()
    }

    pub fn success_message(&self) -> &str {
        self.form.success_message()
    }

    pub fn field_errors(&self) -> &FieldErrors {
        self.form.field_errors()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.form.subscribe()
    }

    /// Fetch the record. On failure the view stays put with an error
    /// message; there is no navigation.
    pub async fn load<E, Fut>(&mut self, fetch: impl FnOnce() -> Fut) -> bool
    where
        Fut: Future<Output = Result<R, E>>,
        Failure: From<E>,
    {
        self.record = None;
        self.editing = false;
        self.form.clear_feedback();
        self.form.transition(Phase::Loading, true);

        match fetch().await {
            Ok(record) => {
                self.form.replace_form(R::Form::from(&record));
                self.record = Some(record);
                self.form.transition(Phase::Viewing, false);
                true
            }
            Err(e) => {
                let failure = Failure::from(e);
                warn!(message = %failure.message(LOAD_FAILED), "load failed");
                self.form.feedback.set_error(failure.message(LOAD_FAILED));
                self.form.last_failure = Some(failure);
                self.form.transition(Phase::LoadFailed, false);
                false
            }
        }
    }

    /// Enter or leave edit mode. Entering snapshots the record into the
    /// form; leaving discards any edits.
    pub fn toggle_edit(&mut self) {
        if self.editing {
            self.cancel_edit();
        } else {
            self.begin_edit();
        }
    }

    pub fn begin_edit(&mut self) {
        let Some(record) = &self.record else {
            return;
        };
        self.form.replace_form(R::Form::from(record));
        self.editing = true;
        self.form.transition(Phase::Editing, false);
    }

    pub fn cancel_edit(&mut self) {
        let Some(record) = &self.record else {
            return;
        };
        self.form.replace_form(R::Form::from(record));
        self.editing = false;
        self.form.transition(Phase::Viewing, false);
    }

    /// Change the form. Only has an effect while editing.
    pub fn edit(&mut self, apply: impl FnOnce(&mut R::Form)) {
        if self.editing {
            self.form.edit(apply);
        }
    }

    /// Submit the edited form. `send` may return the updated record;
    /// otherwise the accepted payload is applied to the local copy.
    ///
    /// Success returns to `Viewing` with the new record; failure stays in
    /// `Editing` with the entered values and the errors attached.
    pub async fn submit_update<E, Fut>(
        &mut self,
        success_message: &str,
        send: impl FnOnce(<R::Form as FormModel>::Payload) -> Fut,
    ) -> bool
    where
        Fut: Future<Output = Result<Option<R>, E>>,
        Failure: From<E>,
        <R::Form as FormModel>::Payload: Clone,
    {
        if !self.editing || self.record.is_none() {
            return false;
        }

        let mut accepted = None;
        let echoed = self
            .form
            .submit(success_message, |payload| {
                accepted = Some(payload.clone());
                send(payload)
            })
            .await;

        let Some(echoed) = echoed else {
            self.form.transition(Phase::Editing, false);
            return false;
        };

        match (echoed, self.record.as_mut(), accepted) {
            (Some(record), _, _) => self.record = Some(record),
            (None, Some(record), Some(payload)) => record.apply(&payload),
            _ => {}
        }
        self.editing = false;
        if let Some(record) = &self.record {
            self.form.replace_form(R::Form::from(record));
        }
        self.form.transition(Phase::Viewing, false);
        true
    }

    /// See [`FormController::run_action`].
    pub async fn run_action<T, E, Fut>(
        &mut self,
        ctx: &AppContext,
        success_message: &str,
        action: impl FnOnce() -> Fut,
    ) -> Option<T>
    where
        Fut: Future<Output = Result<T, E>>,
        Failure: From<E>,
    {
        self.form.run_action(ctx, success_message, action).await
    }

    /// See [`FormController::query`].
    pub async fn query<T, E, Fut>(&mut self, fetch: impl FnOnce() -> Fut) -> Option<T>
    where
        Fut: Future<Output = Result<T, E>>,
        Failure: From<E>,
    {
        self.form.query(fetch).await
    }

    pub async fn settle(&mut self) {
        self.form.settle().await;
    }

    pub(crate) fn record_mut(&mut self) -> Option<&mut R> {
        self.record.as_mut()
    }
}
