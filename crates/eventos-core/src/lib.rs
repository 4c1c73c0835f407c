//! Application layer between `eventos-api` and front ends (the CLI).
//!
//! - **[`SessionStore`]**: bearer token and signed-in user, restored from
//!   [`DurableStorage`] at startup and read lock-free by every request.
//! - **[`AppContext`]**: session store, API client and [`Navigator`],
//!   built once and cloned into views.
//! - **[`lifecycle`]**: the load → view ⇄ edit → submit → reconcile state
//!   machine ([`FormController`], [`ResourceController`], [`Listing`]),
//!   with [`Feedback`] holding exactly one of error line, success line or
//!   per-field messages.
//! - **[`forms`]**: editable form models and local validation.
//! - **[`routes`]**: the screen table and the [`guard`] deciding whether a
//!   screen needs a session.
//! - **[`views`]**: one controller per screen wired to the API.

pub mod config;
pub mod context;
pub mod error;
pub mod forms;
pub mod lifecycle;
pub mod navigation;
pub mod routes;
pub mod session;
pub mod storage;
pub mod views;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ClientConfig, DEFAULT_API_URL, TlsVerification};
pub use context::AppContext;
pub use error::{CONNECTION_FAILED, CoreError, Failure};
pub use forms::{EventForm, FormModel, LoginForm, RegisterForm, TalkForm};
pub use lifecycle::{
    ErrorPresentation, FORM_INVALID, Feedback, FieldErrors, FormController, Listing, Phase,
    Resource, ResourceController, SIGN_IN_REQUIRED, ViewState,
};
pub use navigation::{NavigationLog, Navigator, SIGN_IN_REDIRECT_DELAY};
pub use routes::{GuardDecision, Route, guard};
pub use session::{LOGIN_FAILED, Session, SessionStore};
pub use storage::{DurableStorage, FileStorage, MemoryStorage, StorageError, TOKEN_KEY, USER_KEY};
pub use views::{
    AttendanceView, EventCreateView, EventDetailView, EventListView, LoginView, ProfileView,
    RegisterView, TalkCreateView, TalkUpdateView,
};

// Wire types callers need alongside the views.
pub use eventos_api::{Attendance, Event, EventQuery, Talk, User};
